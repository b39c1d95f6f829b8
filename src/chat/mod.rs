//! Chat: conversation state, routine prompts and the proxy client.
//!
//! DESIGN
//! ======
//! [`ChatProxy`] is the seam between conversation state and the network.
//! [`ProxyClient`] is the only production implementation; tests substitute
//! scripted proxies.

pub mod conversation;
pub mod proxy;
pub mod routine;
pub mod types;

pub use conversation::{Conversation, DeliveryStatus, EntryKind, TranscriptEntry, TurnOutcome};
pub use proxy::ProxyClient;
pub use routine::RoutineRequest;
pub use types::{ChatProxy, Message, ProxyError, Role};
