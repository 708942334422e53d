//! Order stage state machine.
//!
//! Defines the three screens of the ordering flow and the legal moves between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The screen the customer is on.
///
/// - `Chat`: talking to the agent (initial)
/// - `Invoice`: reviewing the quote and choosing to pay
/// - `Success`: payment settled, order confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStage {
    #[default]
    Chat,
    Invoice,
    Success,
}

impl OrderStage {
    /// The stage a back action returns to, if any.
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Chat => None,
            Self::Invoice => Some(Self::Chat),
            Self::Success => Some(Self::Invoice),
        }
    }

    /// Returns true if the chat input is live in this stage.
    pub fn accepts_chat_input(&self) -> bool {
        matches!(self, Self::Chat)
    }

    /// Returns true if payment can be initiated from this stage.
    pub fn accepts_payment(&self) -> bool {
        matches!(self, Self::Invoice)
    }

    /// Returns true if "order more" is offered in this stage.
    pub fn accepts_order_more(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Invoice => "invoice",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for OrderStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStage::*;
        matches!(
            (self, target),
            // Scripted reply delivered, auto-advance
            (Chat, Invoice) |
            // Back from invoice
            (Invoice, Chat) |
            // Payment settled
            (Invoice, Success) |
            // Back from success
            (Success, Invoice) |
            // Order more
            (Success, Chat)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStage::*;
        match self {
            Chat => vec![Invoice],
            Invoice => vec![Chat, Success],
            Success => vec![Invoice, Chat],
        }
    }
}

/// A stage change that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: OrderStage,
    pub to: OrderStage,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStage; 3] = [OrderStage::Chat, OrderStage::Invoice, OrderStage::Success];

    mod definition {
        use super::*;

        #[test]
        fn default_stage_is_chat() {
            assert_eq!(OrderStage::default(), OrderStage::Chat);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&OrderStage::Invoice).unwrap();
            assert_eq!(json, "\"invoice\"");
        }

        #[test]
        fn displays_lowercase() {
            assert_eq!(OrderStage::Success.to_string(), "success");
        }
    }

    mod previous {
        use super::*;

        #[test]
        fn chat_has_no_predecessor() {
            assert_eq!(OrderStage::Chat.previous(), None);
        }

        #[test]
        fn invoice_steps_back_to_chat() {
            assert_eq!(OrderStage::Invoice.previous(), Some(OrderStage::Chat));
        }

        #[test]
        fn success_steps_back_to_invoice() {
            assert_eq!(OrderStage::Success.previous(), Some(OrderStage::Invoice));
        }

        #[test]
        fn every_back_step_is_a_legal_transition() {
            for stage in ALL {
                if let Some(prev) = stage.previous() {
                    assert!(stage.can_transition_to(&prev));
                }
            }
        }
    }

    mod state_machine_trait {
        use super::*;

        #[test]
        fn chat_cannot_skip_to_success() {
            assert!(!OrderStage::Chat.can_transition_to(&OrderStage::Success));
        }

        #[test]
        fn success_can_reset_to_chat() {
            assert_eq!(
                OrderStage::Success.transition_to(OrderStage::Chat),
                Ok(OrderStage::Chat)
            );
        }

        #[test]
        fn self_transitions_are_rejected() {
            for stage in ALL {
                assert!(stage.transition_to(stage).is_err());
            }
        }

        #[test]
        fn no_stage_is_terminal() {
            for stage in ALL {
                assert!(!stage.is_terminal());
            }
        }

        #[test]
        fn valid_transitions_matches_can_transition_to() {
            for from in ALL {
                for to in ALL {
                    assert_eq!(
                        from.valid_transitions().contains(&to),
                        from.can_transition_to(&to),
                        "{:?} -> {:?}",
                        from,
                        to
                    );
                }
            }
        }
    }

    #[test]
    fn each_action_is_offered_in_exactly_one_stage() {
        assert!(OrderStage::Chat.accepts_chat_input());
        assert!(!OrderStage::Invoice.accepts_chat_input());
        assert!(OrderStage::Invoice.accepts_payment());
        assert!(!OrderStage::Success.accepts_payment());
        assert!(OrderStage::Success.accepts_order_more());
        assert!(!OrderStage::Chat.accepts_order_more());
    }
}
