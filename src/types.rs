// Governance data model for upgrade-proposal analysis.
//
// Mirrors the Cosmos SDK gov v1 REST payloads on the input side and the
// shapes the explorer frontend consumes on the output side. Every monetary
// or count value stays a decimal-integer string end to end; nothing in this
// module (or downstream of it) converts token amounts to floats.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical software-upgrade message type identifier.
pub const UPGRADE_MESSAGE_TYPE: &str = "/cosmos.upgrade.v1beta1.MsgSoftwareUpgrade";

/// Canonical cancel-upgrade message type identifier.
pub const CANCEL_UPGRADE_MESSAGE_TYPE: &str = "/cosmos.upgrade.v1beta1.MsgCancelUpgrade";

/// Zero-value plan time sentinel: the upgrade is height-triggered,
/// not time-triggered.
pub const ZERO_PLAN_TIME: &str = "0001-01-01T00:00:00Z";

// =============================================================================
// PROPOSAL STATUS
// =============================================================================

/// Governance proposal status (closed Cosmos gov v1 enumeration).
///
/// Unknown strings deserialize to `Unrecognized` rather than failing the
/// whole proposal decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[serde(rename = "PROPOSAL_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PROPOSAL_STATUS_DEPOSIT_PERIOD")]
    DepositPeriod,
    #[serde(rename = "PROPOSAL_STATUS_VOTING_PERIOD")]
    VotingPeriod,
    #[serde(rename = "PROPOSAL_STATUS_PASSED")]
    Passed,
    #[serde(rename = "PROPOSAL_STATUS_REJECTED")]
    Rejected,
    #[serde(rename = "PROPOSAL_STATUS_FAILED")]
    Failed,
    /// Fallback for status strings this build does not know about.
    #[serde(other)]
    Unrecognized,
}

impl Default for ProposalStatus {
    fn default() -> Self {
        ProposalStatus::Unspecified
    }
}

impl ProposalStatus {
    /// Short form without the `PROPOSAL_STATUS_` prefix, as used in
    /// execution-status messages (e.g. "REJECTED").
    pub fn short_name(&self) -> &'static str {
        match self {
            ProposalStatus::Unspecified => "UNSPECIFIED",
            ProposalStatus::DepositPeriod => "DEPOSIT_PERIOD",
            ProposalStatus::VotingPeriod => "VOTING_PERIOD",
            ProposalStatus::Passed => "PASSED",
            ProposalStatus::Rejected => "REJECTED",
            ProposalStatus::Failed => "FAILED",
            ProposalStatus::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Classification of a proposal message by its `@type` tag.
///
/// Closed set with an explicit unrecognized branch; interpretation is driven
/// by the tag alone, never by sniffing the payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    SoftwareUpgrade,
    CancelUpgrade,
    Unrecognized,
}

impl MessageKind {
    /// Classify a raw `@type` tag.
    ///
    /// A tag qualifies as a software upgrade if it equals the canonical
    /// identifier or contains `MsgSoftwareUpgrade` (some chains namespace
    /// the module path differently).
    pub fn from_type_url(type_url: &str) -> Self {
        if type_url == UPGRADE_MESSAGE_TYPE || type_url.contains("MsgSoftwareUpgrade") {
            MessageKind::SoftwareUpgrade
        } else if type_url == CANCEL_UPGRADE_MESSAGE_TYPE
            || type_url.contains("MsgCancelUpgrade")
        {
            MessageKind::CancelUpgrade
        } else {
            MessageKind::Unrecognized
        }
    }
}

/// A single tagged message inside a proposal.
///
/// Only the fields the engine reads are modeled; everything else in the
/// payload is ignored on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalMessage {
    /// Raw message type tag, e.g. `/cosmos.upgrade.v1beta1.MsgSoftwareUpgrade`.
    #[serde(rename = "@type", default)]
    pub type_url: String,

    /// Module account authorized to execute the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    /// Embedded upgrade plan (software-upgrade messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<RawUpgradePlan>,
}

impl ProposalMessage {
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_type_url(&self.type_url)
    }
}

/// Upgrade plan exactly as delivered on the wire; every field is optional
/// because the payload is not under our control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUpgradePlan {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub upgraded_client_state: Option<Value>,
}

// =============================================================================
// PROPOSAL
// =============================================================================

/// Final vote tally, decimal-integer strings as reported by the chain.
/// Buckets may exceed u64 range; missing buckets mean "0".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyResult {
    #[serde(default)]
    pub yes_count: String,
    #[serde(default)]
    pub no_count: String,
    #[serde(default)]
    pub abstain_count: String,
    #[serde(default)]
    pub no_with_veto_count: String,
}

/// A governance proposal as delivered by `/cosmos/gov/v1/proposals`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub status: ProposalStatus,

    /// Ordered list of tagged messages.
    #[serde(default)]
    pub messages: Vec<ProposalMessage>,

    #[serde(default)]
    pub final_tally_result: TallyResult,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub submit_time: Option<String>,
    #[serde(default)]
    pub deposit_end_time: Option<String>,
    #[serde(default)]
    pub voting_start_time: Option<String>,
    #[serde(default)]
    pub voting_end_time: Option<String>,

    #[serde(default)]
    pub proposer: Option<String>,
}

// =============================================================================
// DERIVED TYPES
// =============================================================================

/// Upgrade plan after extraction: absent wire fields are normalized to
/// empty strings so consumers never deal with double-optionality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub name: String,
    /// Target chain height, decimal-integer string.
    pub height: String,
    /// Scheduled time (RFC 3339); the zero-value sentinel means the upgrade
    /// triggers on height, not time.
    pub time: String,
    /// Free-form info field, conventionally JSON with binary download URLs.
    pub info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgraded_client_state: Option<Value>,
}

impl UpgradePlan {
    /// True when the plan carries a real scheduled time rather than the
    /// zero-value sentinel.
    pub fn is_time_based(&self) -> bool {
        !self.time.is_empty() && self.time != ZERO_PLAN_TIME
    }
}

/// Structured view of the plan's free-form info field. Untrusted input:
/// parsing may fail entirely, and any subset of fields may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPlanInfo {
    /// Platform key (e.g. `linux/amd64`) to download URL. Kept as a JSON map
    /// so non-string values survive untouched; key order is preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binaries: Option<serde_json::Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
}

/// Whether and when a scheduled upgrade took effect on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Executed,
    Pending,
    NotExecuted,
    Unknown,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExecutionStatus::Executed => "executed",
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::NotExecuted => "not_executed",
            ExecutionStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Resolved execution state for a scheduled upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    pub status: ExecutionStatus,

    /// Block header time of the upgrade block, present iff `status` is
    /// `Executed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<String>,

    /// Human-readable explanation of how the status was determined.
    pub message: String,

    /// Target height, decimal-integer string ("0" when no plan applies).
    pub plan_height: String,

    /// Chain height observed while resolving, when one was obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_height: Option<String>,
}

/// Vote buckets plus derived totals. All values are decimal-integer strings
/// except `turnout_percent`, which is a formatted percentage or "N/A".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSummary {
    pub yes_count: String,
    pub no_count: String,
    pub abstain_count: String,
    pub no_with_veto_count: String,
    /// Exact sum of the four buckets.
    pub total_voting_power: String,
    /// Bonded token supply at analysis time; "0" when the staking pool read
    /// failed.
    pub bonded_tokens: String,
    /// `100 * total / bonded` at 2-4 adaptive decimals, or "N/A" when bonded
    /// tokens are absent or zero.
    pub turnout_percent: String,
}

/// Aggregate analysis result for one proposal. Built fresh per call; the
/// engine keeps no state between analyses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeProposalData {
    pub proposal: Proposal,

    pub is_upgrade_proposal: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<UpgradePlan>,

    /// Authority of the analyzed upgrade message, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,

    /// Raw `@type` tag of the analyzed upgrade message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_plan_info: Option<ParsedPlanInfo>,

    pub execution: ExecutionInfo,

    pub voting: VotingSummary,
}
