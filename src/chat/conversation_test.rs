use super::*;

fn user_status(conv: &Conversation, ticket_user: &str) -> Option<DeliveryStatus> {
    conv.entry(ticket_user).and_then(TranscriptEntry::status)
}

// =============================================================
// submit
// =============================================================

#[test]
fn new_conversation_starts_with_system_message() {
    let conv = Conversation::new();
    assert_eq!(conv.log().len(), 1);
    assert_eq!(conv.log()[0].role, Role::System);
    assert!(conv.transcript().is_empty());
}

#[test]
fn whitespace_only_submit_is_rejected() {
    let mut conv = Conversation::new();
    assert!(conv.submit("  ").is_none());
    assert!(conv.submit("\n\t").is_none());
    assert_eq!(conv.log().len(), 1);
    assert!(conv.transcript().is_empty());
}

#[test]
fn submit_appends_trimmed_user_message_and_placeholder() {
    let mut conv = Conversation::new();
    let ticket = conv.submit("  what about SPF?  ").unwrap();

    assert_eq!(conv.log().last(), Some(&Message::user("what about SPF?")));
    assert_eq!(conv.transcript().len(), 2);
    assert_eq!(user_status(&conv, ticket.user_entry_id()), Some(DeliveryStatus::Sending));
    assert_eq!(conv.transcript()[1].kind, EntryKind::Placeholder);
    assert_eq!(conv.transcript()[1].text, CHAT_PLACEHOLDER);
    assert!(conv.has_pending());
}

// =============================================================
// complete
// =============================================================

#[test]
fn successful_turn_marks_read_and_appends_reply() {
    let mut conv = Conversation::new();
    let ticket = conv.submit("hello").unwrap();
    let user_id = ticket.user_entry_id().to_string();

    let outcome = conv.complete(ticket, Ok("Step 1: Cleanse.".into()));
    assert!(matches!(outcome, TurnOutcome::Delivered { ref reply } if reply == "Step 1: Cleanse."));

    assert!(!conv.has_pending());
    assert_eq!(user_status(&conv, &user_id), Some(DeliveryStatus::Read));
    let last = conv.transcript().last().unwrap();
    assert_eq!(last.kind, EntryKind::Message { role: Role::Assistant, status: Some(DeliveryStatus::Delivered) });
    assert_eq!(conv.log().len(), 3);
    assert_eq!(conv.log()[2], Message::assistant("Step 1: Cleanse."));
}

#[test]
fn remote_500_marks_failed_and_keeps_user_message() {
    let mut conv = Conversation::new();
    let ticket = conv.submit("hello").unwrap();
    let user_id = ticket.user_entry_id().to_string();

    let outcome = conv.complete(ticket, Err(ProxyError::Remote { status: 500, body: "server error".into() }));
    assert!(matches!(outcome, TurnOutcome::Failed(ProxyError::Remote { status: 500, .. })));

    assert_eq!(user_status(&conv, &user_id), Some(DeliveryStatus::Failed));
    assert_eq!(conv.log().len(), 2);
    assert_eq!(conv.log()[1], Message::user("hello"));
    assert!(conv.log().iter().all(|m| m.role != Role::Assistant));

    let notice = conv.transcript().last().unwrap();
    assert_eq!(notice.kind, EntryKind::Notice);
    assert_eq!(notice.text, CHAT_FAILURE_NOTICE);
    assert!(!conv.has_pending());
}

#[test]
fn failed_turn_stays_in_context_for_next_turn() {
    let mut conv = Conversation::new();
    let first = conv.submit("first").unwrap();
    let _ = conv.complete(first, Err(ProxyError::Network("reset".into())));
    let _second = conv.submit("second").unwrap();

    let users: Vec<&str> = conv
        .log()
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(users, vec!["first", "second"]);
}

#[test]
fn routine_turn_shows_display_text_and_sends_prompt() {
    let mut conv = Conversation::new();
    let request = RoutineRequest { display: "short".into(), prompt: "long prompt".into() };
    let ticket = conv.submit_routine(request);
    assert_eq!(ticket.kind(), TurnKind::Routine);
    assert_eq!(conv.entry(ticket.user_entry_id()).unwrap().text, "short");
    assert_eq!(conv.log().last().unwrap().content, "long prompt");
    assert_eq!(conv.transcript()[1].text, ROUTINE_PLACEHOLDER);

    let _ = conv.complete(ticket, Err(ProxyError::MalformedResponse("x".into())));
    assert_eq!(conv.transcript().last().unwrap().text, ROUTINE_FAILURE_NOTICE);
}

// =============================================================
// stale replies
// =============================================================

#[test]
fn cancelled_turn_reply_is_dropped() {
    let mut conv = Conversation::new();
    let ticket = conv.submit("slow question").unwrap();
    let user_id = ticket.user_entry_id().to_string();
    conv.cancel_pending();

    let outcome = conv.complete(ticket, Ok("late answer".into()));
    assert!(matches!(outcome, TurnOutcome::Superseded));
    assert!(conv.log().iter().all(|m| m.content != "late answer"));
    assert_eq!(user_status(&conv, &user_id), Some(DeliveryStatus::Failed));
    assert!(!conv.has_pending());
}

#[test]
fn cancel_settles_open_turns_without_a_reply() {
    let mut conv = Conversation::new();
    let done = conv.submit("answered").unwrap();
    let done_id = done.user_entry_id().to_string();
    let _ = conv.complete(done, Ok("ok".into()));
    let open = conv.submit("never answered").unwrap();
    let open_id = open.user_entry_id().to_string();
    assert!(conv.has_pending());

    conv.cancel_pending();
    assert!(!conv.has_pending());
    assert_eq!(user_status(&conv, &open_id), Some(DeliveryStatus::Failed));
    assert_eq!(user_status(&conv, &done_id), Some(DeliveryStatus::Read));
    assert!(conv.transcript().iter().all(|e| e.kind != EntryKind::Notice));
    drop(open);
}

#[test]
fn turns_after_cancel_complete_normally() {
    let mut conv = Conversation::new();
    let stale = conv.submit("old").unwrap();
    conv.cancel_pending();
    let fresh = conv.submit("new").unwrap();

    assert!(matches!(conv.complete(fresh, Ok("fresh".into())), TurnOutcome::Delivered { .. }));
    assert!(matches!(conv.complete(stale, Ok("stale".into())), TurnOutcome::Superseded));
    assert_eq!(conv.log().last().unwrap(), &Message::assistant("fresh"));
}

#[test]
fn uncancelled_late_replies_are_appended_in_arrival_order() {
    let mut conv = Conversation::new();
    let a = conv.submit("a").unwrap();
    let b = conv.submit("b").unwrap();
    let _ = conv.complete(b, Ok("reply b".into()));
    let _ = conv.complete(a, Ok("reply a".into()));

    let replies: Vec<&str> = conv
        .log()
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(replies, vec!["reply b", "reply a"]);
}

#[test]
fn status_labels_match_ui_text() {
    assert_eq!(DeliveryStatus::Sending.label(), "Sending...");
    assert_eq!(DeliveryStatus::Failed.label(), "Failed");
}
