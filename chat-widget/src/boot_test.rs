use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll};

use futures::executor::block_on;
use futures::task::noop_waker;
use supportdesk_shared::StatusResponse;

use super::*;
use crate::error::WidgetError;
use crate::mock::{Call, MockApi};

fn embed(pairs: &[(&str, &str)]) -> EmbedSettings {
    let attrs: HashMap<String, String> =
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    EmbedSettings::from_attributes(&attrs, Some("https://shop.example.com/"))
}

fn ids(admitted: &RefCell<Vec<EmbedSettings>>) -> Vec<String> {
    let mut ids: Vec<String> = admitted
        .borrow()
        .iter()
        .filter_map(|s| s.config.widget_id.clone())
        .collect();
    ids.sort();
    ids
}

fn active(is_active: bool) -> Result<StatusResponse, WidgetError> {
    Ok(StatusResponse { is_active })
}

// =============================================================
// activation_gate
// =============================================================

#[test]
fn gate_admits_active_widget() {
    let api = MockApi::new().with_status(active(true));
    assert!(block_on(activation_gate(&api, &embed(&[("data-widget-id", "w1")]))));
    assert_eq!(api.calls(), vec![Call::Status("w1".into())]);
}

#[test]
fn gate_rejects_inactive_widget() {
    let api = MockApi::new().with_status(active(false));
    assert!(!block_on(activation_gate(&api, &embed(&[("data-widget-id", "w2")]))));
}

#[test]
fn gate_fails_closed_on_errors() {
    for err in [
        WidgetError::Network("offline".into()),
        WidgetError::Status(500),
        WidgetError::Decode("not json".into()),
        WidgetError::Timeout(15_000),
    ] {
        let api = MockApi::new().with_status(Err(err));
        assert!(!block_on(activation_gate(&api, &embed(&[("data-widget-id", "w1")]))));
    }
}

#[test]
fn gate_skips_request_when_disabled_by_attribute() {
    let api = MockApi::new().with_status(active(true));
    let settings = embed(&[("data-widget-id", "w1"), ("data-is-active", "false")]);
    assert!(!block_on(activation_gate(&api, &settings)));
    assert!(api.calls().is_empty());
}

#[test]
fn gate_skips_request_for_invalid_id() {
    let api = MockApi::new().with_status(active(true));
    assert!(!block_on(activation_gate(&api, &embed(&[("data-widget-id", "")]))));
    assert!(!block_on(activation_gate(&api, &embed(&[("data-widget-id", "../admin")]))));
    assert!(api.calls().is_empty());
}

// =============================================================
// admit
// =============================================================

#[test]
fn inactive_embed_yields_no_instances() {
    let api = MockApi::new().with_status(active(false));
    let admitted = RefCell::new(Vec::new());
    block_on(admit(vec![embed(&[("data-widget-id", "w2")])], |_| &api, |s| {
        admitted.borrow_mut().push(s);
    }));
    assert!(admitted.borrow().is_empty());
    assert_eq!(api.calls(), vec![Call::Status("w2".into())]);
}

#[test]
fn admit_checks_every_enabled_embed() {
    let api = MockApi::new().with_status(active(true));
    let candidates = vec![
        embed(&[("data-widget-id", "first")]),
        embed(&[("data-widget-id", "second"), ("data-is-active", "false")]),
        embed(&[("data-widget-id", "third")]),
    ];
    let admitted = RefCell::new(Vec::new());
    block_on(admit(candidates, |_| &api, |s| admitted.borrow_mut().push(s)));
    assert_eq!(ids(&admitted), vec!["first", "third"]);
    let mut calls = api.calls();
    calls.sort_by_key(|c| format!("{c:?}"));
    assert_eq!(
        calls,
        vec![Call::Status("first".into()), Call::Status("third".into())]
    );
}

#[test]
fn hung_status_does_not_hold_back_other_embeds() {
    let api = MockApi::new().with_status(active(true)).with_stalled_status("slow");
    let candidates = vec![
        embed(&[("data-widget-id", "slow")]),
        embed(&[("data-widget-id", "fast")]),
    ];
    let admitted = RefCell::new(Vec::new());
    let mut run = pin!(admit(candidates, |_| &api, |s| admitted.borrow_mut().push(s)));

    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    assert!(matches!(run.as_mut().poll(&mut cx), Poll::Pending));

    assert_eq!(ids(&admitted), vec!["fast"]);
    let calls = api.calls();
    assert!(calls.contains(&Call::Status("slow".into())));
    assert!(calls.contains(&Call::Status("fast".into())));
}
