// Upgrade execution resolution.
//
// A small state machine over (proposal status, plan height, chain reads)
// that decides whether a scheduled upgrade took effect and when. At most
// two chain reads happen, and only for passed proposals; every read
// failure lands on a defined terminal state.
//
// Rules, in order:
// 1. Proposal not passed -> not_executed, no reads.
// 2. Current height unavailable -> not_executed (height unknown).
// 3. Either height unparseable -> unknown.
// 4. Plan height reached -> block-at-height read: header time present
//    -> executed at that time; read failed or no time -> unknown.
// 5. Plan height ahead of chain -> pending.

use tracing::{debug, warn};

use crate::chain::ChainClient;
use crate::types::{ExecutionInfo, ExecutionStatus, Proposal, ProposalStatus};

/// Resolve whether the upgrade scheduled at `plan_height` has executed.
pub async fn resolve_execution_status(
    proposal: &Proposal,
    plan_height: &str,
    chain: &dyn ChainClient,
) -> ExecutionInfo {
    // Rule 1: anything but PASSED is terminal without touching the chain
    if proposal.status != ProposalStatus::Passed {
        return ExecutionInfo {
            status: ExecutionStatus::NotExecuted,
            executed_at: None,
            message: format!(
                "Not executed (proposal status: {}; target height {})",
                proposal.status.short_name(),
                plan_height
            ),
            plan_height: plan_height.to_string(),
            current_height: None,
        };
    }

    // Rule 2: current height read
    let current_height = match chain.fetch_current_height().await {
        Ok(height) => height,
        Err(err) => {
            warn!(
                proposal_id = %proposal.id,
                "current height read failed: {}", err
            );
            return ExecutionInfo {
                status: ExecutionStatus::NotExecuted,
                executed_at: None,
                message: format!(
                    "Not executed (target height {}; current height unknown)",
                    plan_height
                ),
                plan_height: plan_height.to_string(),
                current_height: None,
            };
        }
    };

    // Rule 3: both heights must be clean integers to compare
    let (plan_h, current_h) = match (
        plan_height.trim().parse::<u64>(),
        current_height.trim().parse::<u64>(),
    ) {
        (Ok(plan_h), Ok(current_h)) => (plan_h, current_h),
        _ => {
            debug!(
                "unparseable heights: plan {:?}, current {:?}",
                plan_height, current_height
            );
            return ExecutionInfo {
                status: ExecutionStatus::Unknown,
                executed_at: None,
                message: "Unknown (invalid height values)".to_string(),
                plan_height: plan_height.to_string(),
                current_height: Some(current_height),
            };
        }
    };

    // Rule 5: target still ahead of the chain
    if plan_h > current_h {
        return ExecutionInfo {
            status: ExecutionStatus::Pending,
            executed_at: None,
            message: format!(
                "Not executed (target height {}; current height {})",
                plan_height, current_height
            ),
            plan_height: plan_height.to_string(),
            current_height: Some(current_height),
        };
    }

    // Rule 4: height reached; the upgrade block's header time is the
    // execution time
    match chain.fetch_block_at_height(plan_height).await {
        Ok(block) => match block.header.time {
            Some(time) if !time.is_empty() => ExecutionInfo {
                status: ExecutionStatus::Executed,
                executed_at: Some(time),
                message: format!("Executed at block {}", plan_height),
                plan_height: plan_height.to_string(),
                current_height: Some(current_height),
            },
            _ => ExecutionInfo {
                status: ExecutionStatus::Unknown,
                executed_at: None,
                message: "Unknown (block data not available)".to_string(),
                plan_height: plan_height.to_string(),
                current_height: Some(current_height),
            },
        },
        Err(err) => {
            warn!(
                proposal_id = %proposal.id,
                "block read at height {} failed: {}", plan_height, err
            );
            ExecutionInfo {
                status: ExecutionStatus::Unknown,
                executed_at: None,
                message: "Unknown (block not available)".to_string(),
                plan_height: plan_height.to_string(),
                current_height: Some(current_height),
            }
        }
    }
}
