//! Why an action was ignored.
//!
//! Rejections are not user-facing errors: the action simply leaves the session
//! unchanged. They exist so callers and tests can see which guard closed.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::pending::PendingOperation;
use super::stage::OrderStage;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Inbound actions and timed steps that can change a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SubmitMessage,
    DeliverReply,
    AutoAdvance,
    InitiatePayment,
    SettlePayment,
    GoBack,
    ResetToChat,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SubmitMessage => "submit_message",
            Self::DeliverReply => "deliver_reply",
            Self::AutoAdvance => "auto_advance",
            Self::InitiatePayment => "initiate_payment",
            Self::SettlePayment => "settle_payment",
            Self::GoBack => "go_back",
            Self::ResetToChat => "reset_to_chat",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("input is blank")]
    BlankInput,

    #[error("{action} is not available in the {stage} stage")]
    WrongStage { action: Action, stage: OrderStage },

    #[error("{0} is already in flight")]
    OperationPending(PendingOperation),

    #[error("{0} is not in flight")]
    NotPending(PendingOperation),

    #[error("no stage precedes {0}")]
    NoPredecessor(OrderStage),

    #[error("session is closed")]
    SessionClosed,
}

impl From<Rejection> for DomainError {
    fn from(rejection: Rejection) -> Self {
        let code = match &rejection {
            Rejection::BlankInput => ErrorCode::EmptyField,
            Rejection::WrongStage { .. } | Rejection::NoPredecessor(_) => {
                ErrorCode::InvalidStateTransition
            }
            Rejection::OperationPending(_) | Rejection::NotPending(_) => {
                ErrorCode::OperationPending
            }
            Rejection::SessionClosed => ErrorCode::SessionClosed,
        };
        DomainError::new(code, rejection.to_string())
    }
}

/// Result of an inbound action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action changed the session.
    Applied,
    /// A guard closed; the session is unchanged.
    Ignored(Rejection),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied => None,
            Self::Ignored(rejection) => Some(rejection),
        }
    }
}
