//! Application layer for FireflyChat.
//!
//! This crate wires the stores to a local backend and provides the use case
//! that coordinates the conversation and the session list.

pub mod bootstrap;
pub mod chat_usecase;
pub mod local_gateway;

#[cfg(test)]
mod test_support;

pub use bootstrap::{AppContext, bootstrap};
pub use chat_usecase::ChatUseCase;
pub use local_gateway::LocalGateway;
