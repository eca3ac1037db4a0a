//! Auto-init: find embeds on the page and start a widget for each one that
//! the server says is active.
//!
//! Script tags go through the activation gate, which fails closed: a widget
//! renders only after a successful status check that says `isActive: true`.
//! A page-level `window.ModernSupportWidgetConfig` object starts one more
//! widget directly; its config resolution still honors `isActive`.

#[cfg(test)]
#[path = "boot_test.rs"]
mod boot_test;

use std::cell::RefCell;

use futures::stream::{FuturesUnordered, StreamExt};
use supportdesk_shared::validate_widget_id;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

use crate::api::{HttpApi, WidgetApi};
use crate::config::EmbedSettings;
use crate::consts::{EMBED_SELECTOR, GLOBAL_CONFIG_NAME};
use crate::runtime::{settings_from_js, ModernSupportWidget};

thread_local! {
    /// Auto-initialized instances live as long as the page.
    static INSTANCES: RefCell<Vec<ModernSupportWidget>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("support widget logging unavailable: {err}").into());
    }
    log::info!("🚀 support widget starting");
    run_when_ready();
}

fn run_when_ready() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.ready_state() != "loading" {
        scan_page();
        return;
    }
    let callback = Closure::once_into_js(scan_page);
    if let Err(err) = document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref()) {
        log::error!("could not wait for DOMContentLoaded: {err:?}");
    }
}

/// Start widgets for every embed tag and the global config object.
pub fn scan_page() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let candidates = embed_tags(&document);
    if !candidates.is_empty() {
        spawn_local(admit(candidates, HttpApi::new, |settings| {
            retain(ModernSupportWidget::spawn(settings));
        }));
    }
    if let Some(settings) = global_settings() {
        retain(ModernSupportWidget::spawn(settings));
    }
}

fn embed_tags(document: &Document) -> Vec<EmbedSettings> {
    let tags = match document.query_selector_all(EMBED_SELECTOR) {
        Ok(tags) => tags,
        Err(err) => {
            log::error!("embed scan failed: {err:?}");
            return Vec::new();
        }
    };
    let page_url = match document.url() {
        Ok(url) => Some(url),
        Err(err) => {
            log::warn!("page url unavailable: {err:?}");
            None
        }
    };
    (0..tags.length())
        .filter_map(|i| tags.item(i))
        .filter_map(|node| {
            node.dyn_ref::<Element>()
                .map(|tag| EmbedSettings::from_attributes(tag, page_url.as_deref()))
        })
        .collect()
}

fn global_settings() -> Option<EmbedSettings> {
    let window = web_sys::window()?;
    let value = match js_sys::Reflect::get(&window, &JsValue::from_str(GLOBAL_CONFIG_NAME)) {
        Ok(value) if value.is_object() => value,
        Ok(_) => return None,
        Err(err) => {
            log::warn!("could not read window.{GLOBAL_CONFIG_NAME}: {err:?}");
            return None;
        }
    };
    match settings_from_js(&value) {
        Ok(settings) => Some(settings),
        Err(err) => {
            log::error!("invalid window.{GLOBAL_CONFIG_NAME}: {err}");
            None
        }
    }
}

fn retain(widget: ModernSupportWidget) {
    INSTANCES.with(|instances| instances.borrow_mut().push(widget));
}

/// Whether an embed may render. Anything but a successful
/// `isActive: true` answer keeps it hidden.
pub async fn activation_gate<A: WidgetApi>(api: &A, settings: &EmbedSettings) -> bool {
    if settings.explicitly_disabled() {
        log::info!("widget {:?} disabled by embed attribute", settings.config.widget_id);
        return false;
    }
    let Some(id) = settings.config.widget_id.as_deref().map(str::trim) else {
        return false;
    };
    if let Err(err) = validate_widget_id(id) {
        log::warn!("embed skipped: {err}");
        return false;
    }
    match api.status(id).await {
        Ok(status) if status.is_active => true,
        Ok(_) => {
            log::info!("widget {id} is inactive");
            false
        }
        Err(err) => {
            log::warn!("status check for widget {id} failed, not rendering: {err}");
            false
        }
    }
}

/// Run every candidate's status check at once and hand each one that
/// passes to `on_admit` as soon as its own answer arrives. A slow server
/// for one embed never holds back another.
pub async fn admit<A: WidgetApi>(
    candidates: Vec<EmbedSettings>,
    api_for: impl Fn(&EmbedSettings) -> A,
    mut on_admit: impl FnMut(EmbedSettings),
) {
    let mut checks: FuturesUnordered<_> = candidates
        .into_iter()
        .map(|settings| {
            let api = api_for(&settings);
            async move {
                let active = activation_gate(&api, &settings).await;
                active.then_some(settings)
            }
        })
        .collect();
    while let Some(outcome) = checks.next().await {
        if let Some(settings) = outcome {
            on_admit(settings);
        }
    }
}
