use tracing::warn;

/// Observability capability injected into the orchestrator.
///
/// Non-fatal anomalies are recorded through this seam instead of a global
/// log so callers (and tests) can observe them without a reset ritual.
pub trait ClaimEvents: Send + Sync {
    /// A page reported more results but carried no continuation cursor;
    /// iteration stopped early instead of looping.
    fn pagination_halted(&self, stream: &str, context: &str);

    /// A campaign failed during multi-campaign aggregation and was skipped.
    fn campaign_skipped(&self, campaign_id: &str, reason: &str);
}

/// Default implementation that forwards every event to `tracing`.
pub struct TracingEvents;

impl ClaimEvents for TracingEvents {
    fn pagination_halted(&self, stream: &str, context: &str) {
        warn!(
            "Pagination inconsistency on {} stream for {}: more pages reported but no cursor supplied, stopping",
            stream, context
        );
    }

    fn campaign_skipped(&self, campaign_id: &str, reason: &str) {
        warn!("Skipping campaign {}: {}", campaign_id, reason);
    }
}
