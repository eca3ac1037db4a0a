use futures::executor::block_on;

use super::*;
use crate::mock::{Call, MockApi};

fn clock() -> f64 {
    1_700_000_000_000.0
}

fn transcript(session: &ChatSession) -> Vec<(Sender, &str)> {
    session.messages().iter().map(|m| (m.sender, m.content.as_str())).collect()
}

/// The composer's send path: begin, POST, finish. Returns whether a
/// request was started.
fn send(session: &mut ChatSession, api: &MockApi, widget_id: Option<&str>, input: &str) -> bool {
    let Some(pending) = session.begin_send(input, clock()) else {
        return false;
    };
    assert!(session.is_pending());
    let result = block_on(deliver(api, widget_id, &pending));
    session.finish_send(result, clock());
    true
}

// =============================================================
// begin_send / finish_send
// =============================================================

#[test]
fn begin_send_trims_and_appends_user_turn() {
    let mut session = ChatSession::new();
    let pending = session.begin_send("  hello \n", clock()).unwrap();
    assert_eq!(pending.message, "hello");
    assert_eq!(transcript(&session), vec![(Sender::User, "hello")]);
    assert!(session.is_pending());
}

#[test]
fn begin_send_ignores_blank_input() {
    let mut session = ChatSession::new();
    assert!(session.begin_send("", clock()).is_none());
    assert!(session.begin_send(" \t\n ", clock()).is_none());
    assert!(session.messages().is_empty());
    assert!(!session.is_pending());
}

#[test]
fn begin_send_refuses_overlapping_requests() {
    let mut session = ChatSession::new();
    session.begin_send("first", clock()).unwrap();
    assert!(session.begin_send("second", clock()).is_none());
    assert_eq!(session.messages().len(), 1);
}

#[test]
fn finish_send_success_appends_reply_and_clears_pending() {
    let mut session = ChatSession::new();
    session.begin_send("hello", clock());
    let reply = session.finish_send(Ok(ChatResponse { response: Some("hi there".into()) }), clock());
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.content, "hi there");
    assert!(!session.is_pending());
}

#[test]
fn finish_send_without_response_uses_acknowledgement() {
    let mut session = ChatSession::new();
    session.begin_send("hello", clock());
    session.finish_send(Ok(ChatResponse { response: None }), clock());
    session.begin_send("again", clock());
    session.finish_send(Ok(ChatResponse { response: Some("  ".into()) }), clock());
    let bots: Vec<_> = session
        .messages()
        .iter()
        .filter(|m| m.sender == Sender::Bot)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(bots, vec![ACK_REPLY, ACK_REPLY]);
}

#[test]
fn finish_send_failure_uses_apology_and_clears_pending() {
    let mut session = ChatSession::new();
    session.begin_send("hello", clock());
    let reply = session.finish_send(Err(WidgetError::Timeout(15_000)), clock());
    assert_eq!(reply.content, APOLOGY_REPLY);
    assert!(!session.is_pending());
}

#[test]
fn message_ids_increase_in_append_order() {
    let mut session = ChatSession::new();
    session.begin_send("a", 1.0);
    session.finish_send(Ok(ChatResponse::default()), 2.0);
    session.begin_send("b", 3.0);
    let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    let stamps: Vec<f64> = session.messages().iter().map(|m| m.timestamp).collect();
    assert_eq!(stamps, vec![1.0, 2.0, 3.0]);
}

// =============================================================
// begin_send + deliver + finish_send
// =============================================================

#[test]
fn send_success_posts_once_and_grows_by_two() {
    let api = MockApi::new().with_chat(Ok(ChatResponse { response: Some("hi there".into()) }));
    let mut session = ChatSession::new();
    let sent = send(&mut session, &api, Some("w1"), "hello");
    assert!(sent);
    assert_eq!(api.calls(), vec![Call::Chat("w1".into(), "hello".into())]);
    assert_eq!(transcript(&session), vec![(Sender::User, "hello"), (Sender::Bot, "hi there")]);
}

#[test]
fn send_http_500_shows_apology_and_reenables() {
    let api = MockApi::new().with_chat(Err(WidgetError::Status(500)));
    let mut session = ChatSession::new();
    send(&mut session, &api, Some("w1"), "hello");
    assert_eq!(api.calls().len(), 1);
    assert_eq!(transcript(&session), vec![(Sender::User, "hello"), (Sender::Bot, APOLOGY_REPLY)]);
    assert!(!session.is_pending());
}

#[test]
fn send_network_error_grows_by_two() {
    let api = MockApi::new();
    let mut session = ChatSession::new();
    send(&mut session, &api, Some("w1"), "hello");
    assert_eq!(session.messages().len(), 2);
}

#[test]
fn send_blank_makes_no_request() {
    let api = MockApi::new().with_chat(Ok(ChatResponse::default()));
    let mut session = ChatSession::new();
    let sent = send(&mut session, &api, Some("w1"), "   ");
    assert!(!sent);
    assert!(api.calls().is_empty());
    assert!(session.messages().is_empty());
}

#[test]
fn send_without_widget_id_apologizes_without_request() {
    let api = MockApi::new().with_chat(Ok(ChatResponse::default()));
    let mut session = ChatSession::new();
    send(&mut session, &api, None, "hello");
    assert!(api.calls().is_empty());
    assert!(!session.is_pending());
    assert_eq!(transcript(&session), vec![(Sender::User, "hello"), (Sender::Bot, APOLOGY_REPLY)]);
}

#[test]
fn sequential_sends_keep_call_order() {
    let api = MockApi::new().with_chat(Ok(ChatResponse { response: Some("ok".into()) }));
    let mut session = ChatSession::new();
    send(&mut session, &api, Some("w1"), "one");
    send(&mut session, &api, Some("w1"), "two");
    assert_eq!(
        transcript(&session),
        vec![
            (Sender::User, "one"),
            (Sender::Bot, "ok"),
            (Sender::User, "two"),
            (Sender::Bot, "ok"),
        ]
    );
}

#[test]
fn sender_css_classes() {
    assert_eq!(Sender::User.css_class(), "user");
    assert_eq!(Sender::Bot.css_class(), "bot");
}
