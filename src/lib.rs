//! Product catalog and routine-advisor chat core.
//!
//! ARCHITECTURE
//! ============
//! catalog → filter → render for browsing; selection (persisted through a
//! key-value store) for the user's chosen products; chat (conversation log,
//! routine prompts, proxy client) for the assistant. [`advisor::Advisor`]
//! owns one of each and is the only entry point front ends need.

pub mod advisor;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod filter;
pub mod render;
pub mod selection;
pub mod storage;

pub use advisor::{Advisor, AdvisorError, FinishedTurn, PendingTurn};
pub use config::AdvisorConfig;
pub use error::ErrorCode;
