// Upgrade-proposal detection and plan extraction.
//
// A proposal qualifies as an upgrade proposal when any of its messages
// carries the software-upgrade type tag. When several do, only the first is
// analyzed; see `upgrade_message`.

use crate::types::{MessageKind, Proposal, ProposalMessage, UpgradePlan};

/// Check whether any message of the proposal is a software upgrade.
pub fn is_upgrade_proposal(proposal: &Proposal) -> bool {
    proposal
        .messages
        .iter()
        .any(|msg| msg.kind() == MessageKind::SoftwareUpgrade)
}

/// First software-upgrade message of the proposal, if any.
///
/// A proposal carrying more than one upgrade message is ambiguous; the
/// fixed policy here is first-match, so later messages are ignored rather
/// than merged.
pub fn upgrade_message(proposal: &Proposal) -> Option<&ProposalMessage> {
    proposal
        .messages
        .iter()
        .find(|msg| msg.kind() == MessageKind::SoftwareUpgrade)
}

/// Extract the upgrade plan from the first upgrade message.
///
/// Returns `None` when no upgrade message exists or the message lacks a
/// plan payload. Absent sub-fields become empty strings; this never fails
/// on partial payloads.
pub fn extract_upgrade_plan(proposal: &Proposal) -> Option<UpgradePlan> {
    let raw = upgrade_message(proposal)?.plan.as_ref()?;

    Some(UpgradePlan {
        name: raw.name.clone().unwrap_or_default(),
        height: raw.height.clone().unwrap_or_default(),
        time: raw.time.clone().unwrap_or_default(),
        info: raw.info.clone().unwrap_or_default(),
        upgraded_client_state: raw.upgraded_client_state.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawUpgradePlan, UPGRADE_MESSAGE_TYPE};

    fn upgrade_msg(plan: Option<RawUpgradePlan>) -> ProposalMessage {
        ProposalMessage {
            type_url: UPGRADE_MESSAGE_TYPE.to_string(),
            authority: Some("verana1gov".to_string()),
            plan,
        }
    }

    fn unrelated_msg() -> ProposalMessage {
        ProposalMessage {
            type_url: "/cosmos.bank.v1beta1.MsgSend".to_string(),
            authority: None,
            plan: None,
        }
    }

    #[test]
    fn test_no_messages_is_not_upgrade() {
        let proposal = Proposal::default();
        assert!(!is_upgrade_proposal(&proposal));
        assert!(upgrade_message(&proposal).is_none());
    }

    #[test]
    fn test_unrelated_message_is_not_upgrade() {
        let proposal = Proposal {
            messages: vec![unrelated_msg()],
            ..Default::default()
        };
        assert!(!is_upgrade_proposal(&proposal));
    }

    #[test]
    fn test_exact_type_tag_matches() {
        let proposal = Proposal {
            messages: vec![upgrade_msg(None)],
            ..Default::default()
        };
        assert!(is_upgrade_proposal(&proposal));
    }

    #[test]
    fn test_substring_type_tag_matches() {
        let proposal = Proposal {
            messages: vec![ProposalMessage {
                type_url: "/verana.upgrade.v2.MsgSoftwareUpgradeV2".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(is_upgrade_proposal(&proposal));
    }

    #[test]
    fn test_first_upgrade_message_wins() {
        let first = RawUpgradePlan {
            name: Some("first".to_string()),
            ..Default::default()
        };
        let second = RawUpgradePlan {
            name: Some("second".to_string()),
            ..Default::default()
        };
        let proposal = Proposal {
            messages: vec![
                unrelated_msg(),
                upgrade_msg(Some(first)),
                upgrade_msg(Some(second)),
            ],
            ..Default::default()
        };

        let plan = extract_upgrade_plan(&proposal).unwrap();
        assert_eq!(plan.name, "first");
    }

    #[test]
    fn test_missing_plan_yields_none() {
        let proposal = Proposal {
            messages: vec![upgrade_msg(None)],
            ..Default::default()
        };
        assert!(is_upgrade_proposal(&proposal));
        assert!(extract_upgrade_plan(&proposal).is_none());
    }

    #[test]
    fn test_partial_plan_defaults_to_empty_strings() {
        let raw = RawUpgradePlan {
            height: Some("999".to_string()),
            ..Default::default()
        };
        let proposal = Proposal {
            messages: vec![upgrade_msg(Some(raw))],
            ..Default::default()
        };

        let plan = extract_upgrade_plan(&proposal).unwrap();
        assert_eq!(plan.height, "999");
        assert_eq!(plan.name, "");
        assert_eq!(plan.time, "");
        assert_eq!(plan.info, "");
        assert!(plan.upgraded_client_state.is_none());
    }
}
