// Display formatting helpers for governance values.
//
// String-in/string-out; anything malformed is returned verbatim (or as "0"
// for amounts) instead of erroring. Amount formatting goes through BigUint
// so 18-digit micro-denomination values render exactly.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::types::ProposalStatus;

/// Micro-denomination scale: 10^6 uvna per VNA.
const MICRO_UNITS_PER_VNA: u64 = 1_000_000;

/// Lowercase human label for a proposal status, e.g. "voting period".
pub fn proposal_status_label(status: ProposalStatus) -> String {
    status.short_name().to_lowercase().replace('_', " ")
}

/// Render an RFC 3339 timestamp as "YYYY-MM-DD HH:MM:SS UTC".
/// Unparseable input comes back verbatim.
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Date part of an RFC 3339 timestamp; verbatim fallback.
pub fn format_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Insert thousands separators into a decimal-integer string.
///
/// Works on the digits directly, so values beyond u64 range group
/// correctly. Anything that is not a plain (optionally negative) decimal
/// integer is returned unchanged.
pub fn group_digits(value: &str) -> String {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return value.to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// Convert a micro-denomination amount (uvna) to a VNA display string with
/// two decimals and digit grouping.
///
/// Exact at any magnitude; rounding is half-up on the third decimal.
/// Malformed input renders as "0".
pub fn format_vna_amount(uvna: &str) -> String {
    let trimmed = uvna.trim();
    let amount = if trimmed.is_empty() {
        BigUint::zero()
    } else {
        match trimmed.parse::<BigUint>() {
            Ok(amount) => amount,
            Err(_) => return "0".to_string(),
        }
    };

    // Round to centi-VNA: uvna / 10^4, half-up
    let centi = (amount + BigUint::from(5_000u64)) / BigUint::from(MICRO_UNITS_PER_VNA / 100);
    let whole = &centi / BigUint::from(100u64);
    let frac = (centi % BigUint::from(100u64)).to_u8().unwrap_or(0);

    format!("{}.{:02}", group_digits(&whole.to_string()), frac)
}
