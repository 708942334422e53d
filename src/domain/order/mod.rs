//! Order domain module.
//!
//! The stage state machine (`chat -> invoice -> success`), the guards on timed
//! operations, and the session aggregate that ties them to the conversation log.

mod pending;
mod rejection;
mod script;
mod session;
mod snapshot;
mod stage;

pub use pending::{PendingOperation, PendingOperations};
pub use rejection::{Action, ActionOutcome, Rejection};
pub use script::{OrderScript, ResetPolicy, DEFAULT_GREETING, DEFAULT_REPLY};
pub use session::OrderSession;
pub use snapshot::SessionSnapshot;
pub use stage::{OrderStage, Transition};
