// Composition root: one immutable analysis result per proposal.
//
// Classification, metadata parsing, tally, and execution resolution are all
// pure or read-only; this module wires them together and issues the chain
// reads. The two independent reads (current height for execution, staking
// pool for turnout) run concurrently; the block-at-height read is sequenced
// inside the execution resolver because it depends on the height comparison.

use crate::chain::ChainClient;
use crate::classifier;
use crate::execution::resolve_execution_status;
use crate::plan_info::parse_plan_info;
use crate::tally::build_voting_summary;
use crate::types::{ExecutionInfo, ExecutionStatus, Proposal, UpgradeProposalData};

/// Analyze one proposal.
///
/// The voting summary is always built, whether or not the proposal is an
/// upgrade; the execution resolver only runs for an upgrade proposal whose
/// plan names a target height. Each call is independent and reentrant: the
/// engine holds no cross-call state, so callers may analyze any number of
/// proposals concurrently over one shared client.
pub async fn build_upgrade_proposal_data(
    proposal: Proposal,
    chain: &dyn ChainClient,
) -> UpgradeProposalData {
    let is_upgrade = classifier::is_upgrade_proposal(&proposal);
    let (authority, message_type) = match classifier::upgrade_message(&proposal) {
        Some(msg) => (msg.authority.clone(), Some(msg.type_url.clone())),
        None => (None, None),
    };
    let plan = classifier::extract_upgrade_plan(&proposal);
    let parsed_plan_info = plan
        .as_ref()
        .filter(|p| !p.info.is_empty())
        .and_then(|p| parse_plan_info(&p.info));

    let execution_fut = async {
        match plan.as_ref() {
            Some(p) if is_upgrade && !p.height.is_empty() => {
                resolve_execution_status(&proposal, &p.height, chain).await
            }
            _ => ExecutionInfo {
                status: ExecutionStatus::NotExecuted,
                executed_at: None,
                message: "Not an upgrade proposal".to_string(),
                plan_height: "0".to_string(),
                current_height: None,
            },
        }
    };
    let voting_fut = build_voting_summary(&proposal, chain);

    let (execution, voting) = tokio::join!(execution_fut, voting_fut);

    UpgradeProposalData {
        proposal,
        is_upgrade_proposal: is_upgrade,
        plan,
        authority,
        message_type,
        parsed_plan_info,
        execution,
        voting,
    }
}
