// Vote tally arithmetic.
//
// Vote buckets and token supplies are decimal-integer strings that routinely
// exceed u64 range at micro-denomination scale, so every sum and ratio here
// runs on `BigUint`. Floats never touch this path: the turnout percentage is
// computed and rounded in integer micro-percent units.

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::warn;

use crate::chain::ChainClient;
use crate::types::{Proposal, TallyResult, VotingSummary};

/// Turnout is computed in micro-percent: `100 * total * 10^6 / bonded`.
const MICRO_PERCENT_DIGITS: u32 = 6;

/// Parse a decimal-integer amount. Empty means zero; anything else that
/// fails to parse is reported by the caller.
fn parse_amount(value: &str) -> Option<BigUint> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(BigUint::zero());
    }
    trimmed.parse::<BigUint>().ok()
}

/// Sum the four vote buckets, missing buckets counting as zero.
///
/// Returns the exact total as a decimal string. A bucket that is present
/// but unparseable is logged and counted as zero rather than failing the
/// whole tally.
pub fn calculate_total_voting_power(tally: &TallyResult) -> String {
    let buckets = [
        ("yes", &tally.yes_count),
        ("no", &tally.no_count),
        ("abstain", &tally.abstain_count),
        ("no_with_veto", &tally.no_with_veto_count),
    ];

    let mut total = BigUint::zero();
    for (label, bucket) in buckets {
        match parse_amount(bucket) {
            Some(value) => total += value,
            None => warn!("unparseable {} vote count {:?}, counting as 0", label, bucket),
        }
    }
    total.to_string()
}

/// Turnout percentage as a formatted string, or "N/A" when bonded tokens
/// are absent, zero, or unparseable.
///
/// Computed as `100 * total / bonded` scaled to micro-percent before the
/// division so sub-percent turnout keeps its precision, then rounded
/// half-up to an adaptive number of decimals: 2 at >= 10%, 3 at >= 1%,
/// 4 below that.
pub fn calculate_turnout_percent(total_voting_power: &str, bonded_tokens: &str) -> String {
    if bonded_tokens.is_empty() || bonded_tokens == "0" {
        return "N/A".to_string();
    }

    let total = match parse_amount(total_voting_power) {
        Some(total) => total,
        None => return "N/A".to_string(),
    };
    let bonded = match parse_amount(bonded_tokens) {
        Some(bonded) if !bonded.is_zero() => bonded,
        _ => return "N/A".to_string(),
    };

    // 100 * 10^6: percent with six fractional digits, all integer
    let scale = BigUint::from(100u32) * BigUint::from(10u64.pow(MICRO_PERCENT_DIGITS));
    let micro_percent = total * scale / bonded;

    let decimals = if micro_percent >= BigUint::from(10_000_000u64) {
        2
    } else if micro_percent >= BigUint::from(1_000_000u64) {
        3
    } else {
        4
    };

    format_micro_percent(&micro_percent, decimals)
}

/// Render a micro-percent value with the given number of decimals,
/// rounding half-up.
fn format_micro_percent(micro_percent: &BigUint, decimals: u32) -> String {
    let drop = MICRO_PERCENT_DIGITS - decimals;
    let divisor = BigUint::from(10u64.pow(drop));
    let half = BigUint::from(5 * 10u64.pow(drop - 1));
    let rounded = (micro_percent + half) / divisor;

    let digits = rounded.to_string();
    let width = decimals as usize;
    if digits.len() <= width {
        format!("0.{:0>width$}", digits, width = width)
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - width);
        format!("{}.{}", int_part, frac_part)
    }
}

/// Build the full voting summary for a proposal, reading bonded supply from
/// the staking pool.
///
/// A failed pool read defaults bonded tokens to "0" (turnout "N/A") instead
/// of propagating; voting data stays available even when the chain does not
/// answer.
pub async fn build_voting_summary(proposal: &Proposal, chain: &dyn ChainClient) -> VotingSummary {
    let tally = &proposal.final_tally_result;
    let or_zero = |s: &String| {
        if s.is_empty() {
            "0".to_string()
        } else {
            s.clone()
        }
    };

    let total_voting_power = calculate_total_voting_power(tally);

    let bonded_tokens = match chain.fetch_staking_pool().await {
        Ok(pool) => pool
            .bonded_tokens
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "0".to_string()),
        Err(err) => {
            warn!("staking pool read failed, turnout unavailable: {}", err);
            "0".to_string()
        }
    };

    let turnout_percent = calculate_turnout_percent(&total_voting_power, &bonded_tokens);

    VotingSummary {
        yes_count: or_zero(&tally.yes_count),
        no_count: or_zero(&tally.no_count),
        abstain_count: or_zero(&tally.abstain_count),
        no_with_veto_count: or_zero(&tally.no_with_veto_count),
        total_voting_power,
        bonded_tokens,
        turnout_percent,
    }
}
