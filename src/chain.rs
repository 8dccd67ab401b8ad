// Collaborator boundary for chain reads.
//
// The engine never talks to the network itself; callers hand it something
// implementing `ChainClient`. Retry, backoff, and timeout policy all live
// behind that trait. Inside the engine a failed read is a data condition,
// not an error path: every failure folds into one of the defined output
// states.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for chain collaborator calls.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain query failed: {0}")]
    Query(String),

    #[error("malformed chain response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ChainResult<T> = Result<T, ChainError>;

/// Block header subset the engine needs: the height it was queried at and
/// the consensus timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    #[serde(default)]
    pub height: String,

    /// Consensus time (RFC 3339). Optional because a degraded node can
    /// answer with a partial header.
    #[serde(default)]
    pub time: Option<String>,
}

/// A block as returned by `fetch_block_at_height`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub header: BlockHeader,
}

/// Staking pool totals from `/cosmos/staking/v1beta1/pool`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakingPool {
    /// Total bonded token supply, decimal-integer string.
    #[serde(default)]
    pub bonded_tokens: Option<String>,

    #[serde(default)]
    pub not_bonded_tokens: Option<String>,
}

/// External reads the analysis engine depends on.
///
/// Implementations are expected to be cheap to share (`&self` methods only);
/// the engine issues at most three reads per proposal and never caches.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest chain height as a decimal-integer string.
    async fn fetch_current_height(&self) -> ChainResult<String>;

    /// Block at the given height.
    async fn fetch_block_at_height(&self, height: &str) -> ChainResult<Block>;

    /// Current staking pool totals.
    async fn fetch_staking_pool(&self) -> ChainResult<StakingPool>;
}
