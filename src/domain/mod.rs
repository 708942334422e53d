//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `conversation` - Append-only chat log and rich-content template registry
//! - `order` - Stage state machine, pending-operation guards, session aggregate
//! - `pricing` - Catalog item, payment option and the derived quote

pub mod conversation;
pub mod foundation;
pub mod order;
pub mod pricing;
