// Governance upgrade-proposal analysis engine for the Verana network.
// Stateless: every analysis builds a fresh result from the proposal record
// plus at most three chain reads issued through the ChainClient trait.

pub mod aggregator;
pub mod chain;
pub mod classifier;
pub mod execution;
pub mod format;
pub mod plan_info;
pub mod tally;
pub mod types;

pub use aggregator::build_upgrade_proposal_data;
pub use chain::{Block, BlockHeader, ChainClient, ChainError, ChainResult, StakingPool};
pub use types::{
    ExecutionInfo, ExecutionStatus, Proposal, ProposalMessage, ProposalStatus, UpgradePlan,
    UpgradeProposalData, VotingSummary,
};
