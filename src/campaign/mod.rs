pub mod reconcile;
pub mod types;
pub mod validate;

pub use reconcile::{latest_snapshots, reconcile, format_reconciliation};
pub use types::{
    CampaignInfo, ClaimArguments, EligibilityRecord, HistoricalClaim, Page, PageInfo,
    ReconciliationDisplay, ReconciliationResult,
};
pub use validate::{validate_eligibility_records, validate_historical_claims};
