use alloy::primitives::U256;

use crate::error::{ClaimError, Result};

/// Largest power of ten representable in 256 bits is 10^77, so token
/// precision is capped there.
pub const MAX_PRECISION: u32 = 77;

/// Convert a human decimal amount ("1.5") into an integer base-unit string
/// ("1500000" at precision 6).
///
/// Fractional digits beyond `precision` are truncated, never rounded.
/// Leading zeros are stripped from the result, keeping at least "0".
pub fn to_base_units(decimal: &str, precision: u32) -> Result<String> {
    if precision > MAX_PRECISION {
        return Err(ClaimError::Conversion(format!(
            "precision {} out of range 0..={}",
            precision, MAX_PRECISION
        )));
    }

    let trimmed = decimal.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(ClaimError::Conversion(format!(
            "'{}' is not a decimal amount",
            decimal
        )));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClaimError::Conversion(format!(
            "'{}' is not a decimal amount",
            decimal
        )));
    }

    // Truncate or right-pad the fractional part to exactly `precision` digits.
    let mut frac_digits: String = frac.chars().take(precision as usize).collect();
    while (frac_digits.len() as u32) < precision {
        frac_digits.push('0');
    }

    let combined = format!("{}{}", whole, frac_digits);
    let stripped = combined.trim_start_matches('0');
    let stripped = if stripped.is_empty() { "0" } else { stripped };

    let value = parse_base_units(stripped)?;
    Ok(value.to_string())
}

/// Convert an integer base-unit string back into a human decimal amount.
///
/// The input is left-padded to at least `precision + 1` digits, split at
/// `len - precision`, and trailing zero fractional digits are trimmed. A
/// fraction that trims to nothing is omitted entirely. `precision == 0`
/// returns the input unchanged.
pub fn from_base_units(base_units: &str, precision: u32) -> Result<String> {
    if precision > MAX_PRECISION {
        return Err(ClaimError::Conversion(format!(
            "precision {} out of range 0..={}",
            precision, MAX_PRECISION
        )));
    }
    if base_units.is_empty() || !base_units.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClaimError::Conversion(format!(
            "'{}' is not a base-unit amount",
            base_units
        )));
    }
    if precision == 0 {
        return Ok(base_units.to_string());
    }

    let min_len = precision as usize + 1;
    let padded = if base_units.len() < min_len {
        format!("{}{}", "0".repeat(min_len - base_units.len()), base_units)
    } else {
        base_units.to_string()
    };

    let split_at = padded.len() - precision as usize;
    let whole = &padded[..split_at];
    let frac = padded[split_at..].trim_end_matches('0');

    if frac.is_empty() {
        Ok(whole.to_string())
    } else {
        Ok(format!("{}.{}", whole, frac))
    }
}

/// Checked addition of two base-unit strings.
pub fn add_base_units(a: &str, b: &str) -> Result<String> {
    let lhs = parse_base_units(a)?;
    let rhs = parse_base_units(b)?;
    let sum = lhs.checked_add(rhs).ok_or_else(|| {
        ClaimError::Conversion("base-unit sum exceeds the 256-bit range".to_string())
    })?;
    Ok(sum.to_string())
}

/// Subtraction of two base-unit strings, clamped at "0".
pub fn subtract_base_units(a: &str, b: &str) -> Result<String> {
    let lhs = parse_base_units(a)?;
    let rhs = parse_base_units(b)?;
    if rhs >= lhs {
        Ok("0".to_string())
    } else {
        Ok((lhs - rhs).to_string())
    }
}

/// Integer-consistent comparison of two base-unit strings.
pub fn compare_base_units(a: &str, b: &str) -> Result<std::cmp::Ordering> {
    let lhs = parse_base_units(a)?;
    let rhs = parse_base_units(b)?;
    Ok(lhs.cmp(&rhs))
}

/// Check that every amount parses as a non-negative integer within the
/// unsigned 256-bit range. A single violation rejects the whole set.
pub fn validate_amounts_for_onchain<S: AsRef<str>>(amounts: &[S]) -> bool {
    amounts
        .iter()
        .all(|amount| parse_base_units(amount.as_ref()).is_ok())
}

fn parse_base_units(s: &str) -> Result<U256> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClaimError::Conversion(format!(
            "'{}' is not a base-unit amount",
            s
        )));
    }
    U256::from_str_radix(s, 10).map_err(|_| {
        ClaimError::Conversion(format!("'{}' exceeds the 256-bit range", s))
    })
}
