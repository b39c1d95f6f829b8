//! Conversation log and transcript for the advisor chat.
//!
//! DESIGN
//! ======
//! Two parallel records are kept:
//!
//! - `log`: the wire context (`system`/`user`/`assistant` messages) sent in
//!   full on every turn. Append-only, never truncated.
//! - `transcript`: what the user sees, with per-message delivery status, the
//!   ephemeral "generating" placeholder and failure notices.
//!
//! A turn is two calls: [`Conversation::submit`] (or
//! [`Conversation::submit_routine`]) moves it to pending and hands back a
//! [`TurnTicket`]; [`Conversation::complete`] applies the proxy result. The
//! network call happens in between, outside this type.
//!
//! TRADE-OFFS
//! ==========
//! A failed turn keeps its user message in the log and is never retried, so
//! the next turn's context still contains the unanswered request. Replies
//! for turns dispatched before [`Conversation::cancel_pending`] are dropped;
//! without a cancel, late replies are appended in arrival order.

use std::time::{SystemTime, UNIX_EPOCH};

use super::routine::{RoutineRequest, SYSTEM_PROMPT};
use super::types::{Message, ProxyError, Role};

pub const CHAT_PLACEHOLDER: &str = "Generating response... Please wait!";
pub const CHAT_FAILURE_NOTICE: &str = "Sorry, I couldn't reach the assistant. Try again later.";
pub const ROUTINE_PLACEHOLDER: &str = "Generating routine...";
pub const ROUTINE_FAILURE_NOTICE: &str = "Could not generate routine right now.";

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// Delivery state shown next to a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sending,
    Delivered,
    Read,
    Failed,
}

impl DeliveryStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sending => "Sending...",
            Self::Delivered => "Delivered",
            Self::Read => "Read",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A user or assistant message.
    Message { role: Role, status: Option<DeliveryStatus> },
    /// Ephemeral "generating" indicator for a pending turn.
    Placeholder,
    /// Failure text left where a placeholder used to be.
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: String,
    pub kind: EntryKind,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl TranscriptEntry {
    fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), kind, text: text.into(), timestamp: now_ms() }
    }

    #[must_use]
    pub fn status(&self) -> Option<DeliveryStatus> {
        match self.kind {
            EntryKind::Message { status, .. } => status,
            EntryKind::Placeholder | EntryKind::Notice => None,
        }
    }
}

// =============================================================================
// TURNS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Chat,
    Routine,
}

impl TurnKind {
    fn placeholder(self) -> &'static str {
        match self {
            Self::Chat => CHAT_PLACEHOLDER,
            Self::Routine => ROUTINE_PLACEHOLDER,
        }
    }

    fn failure_notice(self) -> &'static str {
        match self {
            Self::Chat => CHAT_FAILURE_NOTICE,
            Self::Routine => ROUTINE_FAILURE_NOTICE,
        }
    }
}

/// Handle for a pending turn; must be passed back to [`Conversation::complete`].
#[derive(Debug)]
#[must_use]
pub struct TurnTicket {
    kind: TurnKind,
    user_entry: String,
    placeholder: String,
    generation: u64,
}

impl TurnTicket {
    #[must_use]
    pub fn kind(&self) -> TurnKind {
        self.kind
    }

    /// Transcript id of the user message this turn sent.
    #[must_use]
    pub fn user_entry_id(&self) -> &str {
        &self.user_entry
    }
}

/// How a turn ended.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The reply was appended to the log and transcript.
    Delivered { reply: String },
    /// The proxy call failed; the user message stays in the log.
    Failed(ProxyError),
    /// The turn was cancelled before its result arrived; the result was dropped.
    Superseded,
}

// =============================================================================
// CONVERSATION
// =============================================================================

#[derive(Debug, Clone)]
pub struct Conversation {
    log: Vec<Message>,
    transcript: Vec<TranscriptEntry>,
    generation: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Start a conversation seeded with the advisor [`SYSTEM_PROMPT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_system_prompt(SYSTEM_PROMPT)
    }

    #[must_use]
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self { log: vec![Message::system(prompt)], transcript: Vec::new(), generation: 0 }
    }

    /// The wire context, system message first.
    #[must_use]
    pub fn log(&self) -> &[Message] {
        &self.log
    }

    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&TranscriptEntry> {
        self.transcript.iter().find(|e| e.id == id)
    }

    /// True while any placeholder is showing.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.transcript.iter().any(|e| e.kind == EntryKind::Placeholder)
    }

    /// Submit user text. Whitespace-only input is rejected and changes nothing.
    pub fn submit(&mut self, text: &str) -> Option<TurnTicket> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.begin(TurnKind::Chat, text, text))
    }

    /// Submit a routine request. The transcript shows `request.display` while
    /// the log receives `request.prompt`.
    pub fn submit_routine(&mut self, request: RoutineRequest) -> TurnTicket {
        self.begin(TurnKind::Routine, &request.display, &request.prompt)
    }

    /// Apply the proxy result for `ticket`.
    pub fn complete(&mut self, ticket: TurnTicket, result: Result<String, ProxyError>) -> TurnOutcome {
        if ticket.generation != self.generation {
            self.remove_entry(&ticket.placeholder);
            self.set_status(&ticket.user_entry, DeliveryStatus::Failed);
            tracing::debug!(
                ticket_generation = ticket.generation,
                current = self.generation,
                "dropping reply for cancelled turn"
            );
            return TurnOutcome::Superseded;
        }

        match result {
            Ok(reply) => {
                self.remove_entry(&ticket.placeholder);
                self.set_status(&ticket.user_entry, DeliveryStatus::Delivered);
                self.log.push(Message::assistant(reply.clone()));
                self.transcript.push(TranscriptEntry::new(
                    EntryKind::Message { role: Role::Assistant, status: Some(DeliveryStatus::Delivered) },
                    reply.clone(),
                ));
                self.set_status(&ticket.user_entry, DeliveryStatus::Read);
                TurnOutcome::Delivered { reply }
            }
            Err(err) => {
                if let Some(entry) = self.entry_mut(&ticket.placeholder) {
                    entry.kind = EntryKind::Notice;
                    entry.text = ticket.kind.failure_notice().to_string();
                }
                self.set_status(&ticket.user_entry, DeliveryStatus::Failed);
                TurnOutcome::Failed(err)
            }
        }
    }

    /// Invalidate every outstanding ticket; their results will be dropped.
    /// Open placeholders are removed and their user messages marked failed
    /// right away, so an abandoned call never leaves the transcript waiting.
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
        self.transcript.retain(|e| e.kind != EntryKind::Placeholder);
        for entry in &mut self.transcript {
            if let EntryKind::Message { status, .. } = &mut entry.kind {
                if *status == Some(DeliveryStatus::Sending) {
                    *status = Some(DeliveryStatus::Failed);
                }
            }
        }
    }

    fn begin(&mut self, kind: TurnKind, display: &str, wire: &str) -> TurnTicket {
        self.log.push(Message::user(wire));
        let user = TranscriptEntry::new(
            EntryKind::Message { role: Role::User, status: Some(DeliveryStatus::Sending) },
            display,
        );
        let placeholder = TranscriptEntry::new(EntryKind::Placeholder, kind.placeholder());
        let ticket = TurnTicket {
            kind,
            user_entry: user.id.clone(),
            placeholder: placeholder.id.clone(),
            generation: self.generation,
        };
        self.transcript.push(user);
        self.transcript.push(placeholder);
        ticket
    }

    fn entry_mut(&mut self, id: &str) -> Option<&mut TranscriptEntry> {
        self.transcript.iter_mut().find(|e| e.id == id)
    }

    fn remove_entry(&mut self, id: &str) {
        self.transcript.retain(|e| e.id != id);
    }

    fn set_status(&mut self, id: &str, next: DeliveryStatus) {
        if let Some(TranscriptEntry { kind: EntryKind::Message { status, .. }, .. }) = self.entry_mut(id) {
            *status = Some(next);
            tracing::trace!(entry = id, status = next.label(), "message status updated");
        }
    }
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
