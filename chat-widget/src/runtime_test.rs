use futures::executor::block_on;
use supportdesk_shared::PartialWidgetConfig;

use super::*;
use crate::config::Position;
use crate::consts::DEFAULT_PRODUCT_NAME;
use crate::mock::{Call, MockApi};

fn local(widget_id: Option<&str>) -> WidgetConfig {
    WidgetConfig::resolve(&PartialWidgetConfig {
        widget_id: widget_id.map(str::to_string),
        product_name: Some("Local".into()),
        position: Some("top-left".into()),
        ..Default::default()
    })
}

// =============================================================
// resolve_config
// =============================================================

#[test]
fn remote_config_overwrites_present_fields_only() {
    let api = MockApi::new().with_config(Ok(PartialWidgetConfig {
        product_name: Some("Acme".into()),
        ..Default::default()
    }));
    let config = block_on(resolve_config(&api, local(Some("w1")))).unwrap();
    assert_eq!(config.product_name, "Acme");
    assert_eq!(config.position, Position::TopLeft);
    assert_eq!(api.calls(), vec![Call::Config("w1".into())]);
}

#[test]
fn default_config_takes_remote_product_name() {
    let api = MockApi::new().with_config(Ok(PartialWidgetConfig {
        product_name: Some("Acme".into()),
        ..Default::default()
    }));
    let base = WidgetConfig::resolve(&PartialWidgetConfig {
        widget_id: Some("w1".into()),
        ..Default::default()
    });
    assert_eq!(base.product_name, DEFAULT_PRODUCT_NAME);
    let config = block_on(resolve_config(&api, base)).unwrap();
    assert_eq!(config.product_name, "Acme");
}

#[test]
fn inactive_local_config_makes_no_request() {
    let api = MockApi::new();
    let mut config = local(Some("w1"));
    config.is_active = false;
    assert!(block_on(resolve_config(&api, config)).is_none());
    assert!(api.calls().is_empty());
}

#[test]
fn remote_inactive_suppresses_render() {
    let api = MockApi::new().with_config(Ok(PartialWidgetConfig {
        is_active: Some(false),
        ..Default::default()
    }));
    assert!(block_on(resolve_config(&api, local(Some("w1")))).is_none());
}

#[test]
fn failed_fetch_keeps_local_config() {
    let api = MockApi::new().with_config(Err(WidgetError::Status(404)));
    let config = block_on(resolve_config(&api, local(Some("w1")))).unwrap();
    assert_eq!(config.product_name, "Local");
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn missing_or_invalid_id_skips_fetch() {
    let api = MockApi::new();
    assert!(block_on(resolve_config(&api, local(None))).is_some());
    assert!(block_on(resolve_config(&api, local(Some("bad id/..")))).is_some());
    assert!(api.calls().is_empty());
}

#[test]
fn remote_blank_values_do_not_clobber() {
    let api = MockApi::new().with_config(Ok(PartialWidgetConfig {
        product_name: Some(String::new()),
        primary_color: Some("red;}body{display:none".into()),
        ..Default::default()
    }));
    let config = block_on(resolve_config(&api, local(Some("w1")))).unwrap();
    assert_eq!(config.product_name, "Local");
    assert_eq!(config.primary_color, "#6366F1");
}
