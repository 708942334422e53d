//! Choreography events for the presentation layer.
//!
//! The snapshot channel carries state. These events carry moments that are not
//! state, such as "scroll the chat to the newest message now".

use serde::Serialize;

use crate::domain::conversation::Origin;
use crate::domain::foundation::MessageId;
use crate::domain::order::OrderStage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAppended { id: MessageId, origin: Origin },
    ScrollToLatest,
    StageChanged { from: OrderStage, to: OrderStage },
    PaymentStarted,
    PaymentSettled,
    SessionClosed,
}
