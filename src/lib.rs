//! Chat Checkout - a scripted conversational-commerce flow
//!
//! A user chats with an agent, is shown an invoice for the recommended item,
//! pays with a simulated crypto payment and lands on a success screen.
//! Every delayed step runs through a [`ports::Scheduler`], so the whole flow can
//! be driven in virtual time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
