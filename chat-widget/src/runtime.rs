//! Widget instances: config resolution, mounting, and the JS-facing class.
//!
//! An instance moves through `Pending` (remote config in flight) to
//! `Mounted`, or to `Suppressed` when it resolves inactive. `destroy()` from
//! any state lands in `Destroyed` and tears down everything the instance
//! added to the page: its root element, its stylesheet and its window
//! listeners. Calls made while the instance is not mounted are ignored.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use leptos::prelude::*;
use supportdesk_shared::PartialWidgetConfig;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement};

use crate::api::{HttpApi, WidgetApi};
use crate::config::{EmbedSettings, WidgetConfig};
use crate::consts::ROOT_CLASS;
use crate::error::{js_error, WidgetError};
use crate::styles;
use crate::view_state::View;
use crate::widget::{SupportWidget, WidgetHandles};

static SERIAL: AtomicUsize = AtomicUsize::new(0);

/// Final config for one instance, or `None` if it must not render.
///
/// An inactive local config short-circuits with no request. Otherwise, with
/// a valid widget id, the server copy is fetched once and shallow-overwrites
/// the local one; a failed fetch keeps the local config. The merged result
/// is checked for activity again.
pub async fn resolve_config<A: WidgetApi>(api: &A, mut config: WidgetConfig) -> Option<WidgetConfig> {
    if !config.is_active {
        log::info!("widget disabled by embed settings");
        return None;
    }
    if let Some(id) = config.valid_widget_id().map(str::to_string) {
        match api.config(&id).await {
            Ok(remote) => config.apply(&remote),
            Err(err) => log::warn!("config for widget {id} unavailable, using local settings: {err}"),
        }
    } else if let Some(raw) = &config.widget_id {
        log::warn!("ignoring invalid widget id {raw:?}");
    }
    if !config.is_active {
        log::info!("widget {:?} is inactive", config.widget_id);
        return None;
    }
    Some(config)
}

enum Lifecycle {
    Pending,
    Mounted(Mounted),
    Suppressed,
    Destroyed,
}

/// Everything a mounted instance owns on the page.
struct Mounted {
    handles: WidgetHandles,
    key: String,
    root: HtmlElement,
    /// Dropping the leptos unmount handle removes the rendered view.
    view: Box<dyn Any>,
    listeners: Vec<WindowListenerHandle>,
}

impl Mounted {
    fn teardown(self) {
        for listener in self.listeners {
            listener.remove();
        }
        drop(self.view);
        self.root.remove();
        if let Ok(document) = document() {
            styles::remove(&document, &self.key);
        }
        self.handles.dispose();
        log::debug!("widget {} destroyed", self.key);
    }
}

fn root_class(config: &WidgetConfig) -> String {
    format!("{ROOT_CLASS} msw-{}", config.position.as_str())
}

fn document() -> Result<Document, WidgetError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| WidgetError::Dom("no document".into()))
}

/// Inject styles, create the root element and render into it.
///
/// A missing stylesheet is logged and tolerated; the widget still works
/// unstyled.
fn mount(config: WidgetConfig, api: HttpApi) -> Result<Mounted, WidgetError> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| WidgetError::Dom("document has no <body>".into()))?;
    let key = config.instance_key(SERIAL.fetch_add(1, Ordering::Relaxed));

    if let Err(err) = styles::inject(&document, &key, &styles::stylesheet(&config, &key)) {
        log::warn!("stylesheet for widget {key} not injected: {err}");
    }

    let root: HtmlElement = document
        .create_element("div")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|el| js_error(el.into()))?;
    root.set_class_name(&root_class(&config));
    root.set_attribute("data-widget-key", &key).map_err(js_error)?;
    body.append_child(&root).map_err(js_error)?;

    let handles = WidgetHandles::new(config, api);
    let view = leptos::mount::mount_to(root.clone(), move || view! { <SupportWidget handles=handles /> });
    let listeners = handles.window_listeners(styles::scope_selector(&key));
    log::info!("widget {key} mounted");

    Ok(Mounted {
        handles,
        key,
        root,
        view: Box::new(view),
        listeners,
    })
}

async fn init(state: Rc<RefCell<Lifecycle>>, settings: EmbedSettings) {
    let api = HttpApi::new(&settings);
    let local = WidgetConfig::resolve(&settings.config);
    let resolved = resolve_config(&api, local).await;

    let mut state = state.borrow_mut();
    if matches!(*state, Lifecycle::Destroyed) {
        return;
    }
    *state = match resolved.map(|config| mount(config, api)) {
        Some(Ok(mounted)) => Lifecycle::Mounted(mounted),
        Some(Err(err)) => {
            log::error!("widget construction failed: {err}");
            Lifecycle::Suppressed
        }
        None => Lifecycle::Suppressed,
    };
}

/// Serialize a JS value through `JSON.stringify`.
fn js_json(value: &JsValue) -> Result<String, WidgetError> {
    js_sys::JSON::stringify(value)
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| WidgetError::Decode("value is not JSON-serializable".into()))
}

/// Settings from a constructor argument or the global config object.
/// `undefined` and `null` mean "no settings".
pub(crate) fn settings_from_js(value: &JsValue) -> Result<EmbedSettings, WidgetError> {
    if value.is_undefined() || value.is_null() {
        return Ok(EmbedSettings::default());
    }
    EmbedSettings::from_json(&js_json(value)?)
}

fn partial_from_js(value: &JsValue) -> Result<PartialWidgetConfig, WidgetError> {
    serde_json::from_str(&js_json(value)?).map_err(|e| WidgetError::Decode(e.to_string()))
}

/// A support widget on the page. Exposed to JS as `ModernSupportWidget`.
#[wasm_bindgen(js_name = ModernSupportWidget)]
pub struct ModernSupportWidget {
    state: Rc<RefCell<Lifecycle>>,
}

#[wasm_bindgen(js_class = ModernSupportWidget)]
impl ModernSupportWidget {
    /// `new ModernSupportWidget({ widgetId, productName, apiBase, ... })`.
    /// Construction never throws; a malformed argument falls back to
    /// defaults.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(config: JsValue) -> ModernSupportWidget {
        let settings = settings_from_js(&config).unwrap_or_else(|err| {
            log::error!("invalid widget options, using defaults: {err}");
            EmbedSettings::default()
        });
        Self::spawn(settings)
    }

    pub fn open(&self) {
        self.with_handles(WidgetHandles::open);
    }

    pub fn close(&self) {
        self.with_handles(WidgetHandles::close);
    }

    pub fn toggle(&self) {
        self.with_handles(WidgetHandles::toggle);
    }

    /// `"main"` or `"chat"`; anything else is ignored.
    #[wasm_bindgen(js_name = showView)]
    pub fn show_view(&self, name: &str) {
        match View::parse(name) {
            Some(view) => self.with_handles(|h| h.show_view(view)),
            None => log::warn!("unknown widget view {name:?}"),
        }
    }

    #[wasm_bindgen(js_name = isOpen)]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handles().is_some_and(WidgetHandles::is_open)
    }

    #[wasm_bindgen(js_name = currentView)]
    #[must_use]
    pub fn current_view(&self) -> String {
        self.handles()
            .map_or(View::Main, WidgetHandles::current_view)
            .as_str()
            .to_string()
    }

    /// Shallow-overwrite the live config and regenerate the stylesheet.
    #[wasm_bindgen(js_name = updateAppearance)]
    pub fn update_appearance(&self, partial: JsValue) {
        let partial = match partial_from_js(&partial) {
            Ok(partial) => partial,
            Err(err) => {
                log::error!("invalid appearance update: {err}");
                return;
            }
        };
        let state = self.state.borrow();
        let Lifecycle::Mounted(mounted) = &*state else {
            log::debug!("appearance update ignored: widget not mounted");
            return;
        };
        let Some((css, class)) = mounted.handles.config.try_update(|config| {
            config.apply(&partial);
            (styles::stylesheet(config, &mounted.key), root_class(config))
        }) else {
            return;
        };
        mounted.root.set_class_name(&class);
        let injected = document().and_then(|document| styles::inject(&document, &mounted.key, &css));
        if let Err(err) = injected {
            log::warn!("stylesheet for widget {} not updated: {err}", mounted.key);
        }
    }

    /// Remove the widget from the page. Safe to call more than once, and
    /// before the widget has finished loading.
    pub fn destroy(&self) {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), Lifecycle::Destroyed);
        if let Lifecycle::Mounted(mounted) = previous {
            mounted.teardown();
        }
    }
}

impl ModernSupportWidget {
    /// Start an instance; it mounts once its config has resolved.
    pub(crate) fn spawn(settings: EmbedSettings) -> Self {
        let state = Rc::new(RefCell::new(Lifecycle::Pending));
        spawn_local(init(Rc::clone(&state), settings));
        Self { state }
    }

    fn handles(&self) -> Option<WidgetHandles> {
        match &*self.state.borrow() {
            Lifecycle::Mounted(mounted) => Some(mounted.handles),
            Lifecycle::Pending | Lifecycle::Suppressed | Lifecycle::Destroyed => None,
        }
    }

    fn with_handles(&self, action: impl FnOnce(WidgetHandles)) {
        match self.handles() {
            Some(handles) => action(handles),
            None => log::debug!("widget not mounted; call ignored"),
        }
    }
}
