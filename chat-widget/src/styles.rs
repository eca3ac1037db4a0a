//! Scoped stylesheet generation and injection.
//!
//! Every rule is prefixed with the instance scope
//! `.modern-support-widget[data-widget-key="..."]`, so two widgets on one page
//! never share or clobber rules. Descendants start from `all: unset` and get
//! their layout back explicitly; host-page CSS cannot reach in through
//! inheritance or element selectors of lower specificity.

#[cfg(test)]
#[path = "styles_test.rs"]
mod styles_test;

use web_sys::Document;

use crate::config::{Position, WidgetConfig};
use crate::consts::{ROOT_CLASS, STYLE_ID_PREFIX};
use crate::error::{js_error, WidgetError};

const SCOPE_TOKEN: &str = "%SCOPE%";
const COLOR_TOKEN: &str = "%COLOR%";

const BASE_RULES: &str = r#"
%SCOPE%,
%SCOPE% *,
%SCOPE% *::before,
%SCOPE% *::after {
  all: unset;
  box-sizing: border-box;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
  font-size: 14px;
  line-height: 1.5;
  color: #1f2937;
  -webkit-font-smoothing: antialiased;
}
%SCOPE% div, %SCOPE% p { display: block; }
%SCOPE% img { display: block; max-width: 100%; }
%SCOPE% {
  position: fixed;
  z-index: 2147483000;
  display: block;
}
%SCOPE% .msw-trigger {
  display: flex;
  align-items: center;
  gap: 10px;
  padding: 10px 18px 10px 10px;
  border-radius: 999px;
  background: %COLOR%;
  color: #ffffff;
  cursor: pointer;
  box-shadow: 0 8px 24px rgba(15, 23, 42, 0.18);
  transition: transform 0.2s ease, box-shadow 0.2s ease, filter 0.2s ease;
}
%SCOPE% .msw-trigger:hover { transform: translateY(-2px); box-shadow: 0 12px 28px rgba(15, 23, 42, 0.24); }
%SCOPE% .msw-trigger:active { transform: translateY(0); filter: brightness(0.92); }
%SCOPE% .msw-trigger:focus-visible { outline: 2px solid #ffffff; outline-offset: -4px; }
%SCOPE% .msw-trigger-label { color: #ffffff; font-weight: 600; }
%SCOPE% .msw-avatar {
  display: flex;
  align-items: center;
  justify-content: center;
  flex-shrink: 0;
  width: 36px;
  height: 36px;
  border-radius: 50%;
  background: rgba(255, 255, 255, 0.2);
  color: #ffffff;
  font-size: 18px;
  font-weight: 700;
  overflow: hidden;
}
%SCOPE% .msw-header .msw-avatar { background: %COLOR%; }
%SCOPE% .msw-avatar-img { width: 100%; height: 100%; object-fit: cover; }
%SCOPE% .msw-popup {
  position: absolute;
  display: none;
  flex-direction: column;
  width: 370px;
  height: 560px;
  max-height: calc(100vh - 120px);
  background: #ffffff;
  border-radius: 16px;
  box-shadow: 0 20px 50px rgba(15, 23, 42, 0.25);
  overflow: hidden;
  opacity: 0;
  transform: translateY(20px) scale(0.95);
  transition: opacity 0.3s ease, transform 0.3s ease;
}
%SCOPE% .msw-popup.open { opacity: 1; transform: translateY(0) scale(1); }
%SCOPE% .msw-view { display: none; flex-direction: column; flex: 1; min-height: 0; }
%SCOPE% .msw-view.active { display: flex; }
%SCOPE% .msw-header {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 16px;
  border-bottom: 1px solid #e5e7eb;
}
%SCOPE% .msw-header-text { display: flex; flex-direction: column; flex: 1; min-width: 0; }
%SCOPE% .msw-title { font-size: 16px; font-weight: 700; color: #111827; }
%SCOPE% .msw-subtitle { font-size: 12px; color: #6b7280; }
%SCOPE% .msw-icon-button {
  display: flex;
  align-items: center;
  justify-content: center;
  width: 32px;
  height: 32px;
  border-radius: 8px;
  color: #6b7280;
  font-size: 18px;
  cursor: pointer;
}
%SCOPE% .msw-icon-button:hover { background: #f3f4f6; color: #111827; }
%SCOPE% .msw-body { display: flex; flex-direction: column; gap: 16px; padding: 20px 16px; overflow-y: auto; }
%SCOPE% .msw-welcome { font-size: 15px; color: #374151; }
%SCOPE% .msw-options { display: flex; flex-direction: column; gap: 8px; }
%SCOPE% .msw-option {
  display: flex;
  align-items: center;
  gap: 12px;
  padding: 12px 14px;
  border: 1px solid #e5e7eb;
  border-radius: 12px;
  cursor: pointer;
  transition: border-color 0.2s ease, background 0.2s ease;
}
%SCOPE% .msw-option:hover { border-color: %COLOR%; background: #f9fafb; }
%SCOPE% .msw-option:active { filter: brightness(0.96); }
%SCOPE% .msw-option-icon { font-size: 20px; line-height: 1; }
%SCOPE% .msw-option-text { display: flex; flex-direction: column; }
%SCOPE% .msw-option-label { font-weight: 600; color: #111827; }
%SCOPE% .msw-option-hint { font-size: 12px; color: #6b7280; }
%SCOPE% .msw-messages {
  display: flex;
  flex-direction: column;
  gap: 8px;
  flex: 1;
  padding: 16px;
  overflow-y: auto;
  background: #f9fafb;
}
%SCOPE% .msw-message {
  display: block;
  max-width: 80%;
  padding: 10px 14px;
  border-radius: 14px;
  white-space: pre-wrap;
  overflow-wrap: anywhere;
}
%SCOPE% .msw-message.bot { align-self: flex-start; background: #ffffff; border: 1px solid #e5e7eb; }
%SCOPE% .msw-message.user { align-self: flex-end; background: %COLOR%; color: #ffffff; }
%SCOPE% .msw-typing { display: flex; gap: 4px; align-self: flex-start; padding: 12px 14px; background: #ffffff; border-radius: 14px; }
%SCOPE% .msw-typing span {
  display: block;
  width: 6px;
  height: 6px;
  border-radius: 50%;
  background: #9ca3af;
  animation: msw-typing 1.2s infinite ease-in-out;
}
%SCOPE% .msw-typing span:nth-child(2) { animation-delay: 0.15s; }
%SCOPE% .msw-typing span:nth-child(3) { animation-delay: 0.3s; }
%SCOPE% .msw-composer { display: flex; align-items: flex-end; gap: 8px; padding: 12px; border-top: 1px solid #e5e7eb; }
%SCOPE% .msw-input {
  display: block;
  flex: 1;
  min-height: 40px;
  max-height: 120px;
  padding: 9px 12px;
  border: 1px solid #d1d5db;
  border-radius: 10px;
  white-space: pre-wrap;
  overflow-y: auto;
  resize: none;
  cursor: text;
}
%SCOPE% .msw-input:focus { border-color: %COLOR%; }
%SCOPE% .msw-input::placeholder { color: #9ca3af; }
%SCOPE% .msw-send {
  display: flex;
  align-items: center;
  padding: 0 16px;
  height: 40px;
  border-radius: 10px;
  background: %COLOR%;
  color: #ffffff;
  font-weight: 600;
  cursor: pointer;
}
%SCOPE% .msw-send:hover { filter: brightness(0.92); }
%SCOPE% .msw-send:active { filter: brightness(0.85); }
%SCOPE% .msw-send:disabled { opacity: 0.5; cursor: not-allowed; filter: none; }
@keyframes msw-typing {
  0%, 60%, 100% { transform: translateY(0); opacity: 0.5; }
  30% { transform: translateY(-4px); opacity: 1; }
}
@media (max-width: 480px) {
  %SCOPE% .msw-popup {
    position: fixed;
    left: 8px;
    right: 8px;
    width: auto;
    height: calc(100vh - 96px);
    max-height: none;
  }
  %SCOPE% .msw-trigger-label { display: none; }
  %SCOPE% .msw-trigger { padding: 10px; }
}
"#;

/// Selector that scopes every rule to one widget instance.
#[must_use]
pub fn scope_selector(key: &str) -> String {
    format!(r#".{ROOT_CLASS}[data-widget-key="{key}"]"#)
}

/// Id of the `<style>` element owned by the instance with this key.
#[must_use]
pub fn style_element_id(key: &str) -> String {
    format!("{STYLE_ID_PREFIX}{key}")
}

/// Build the full stylesheet for one instance.
#[must_use]
pub fn stylesheet(config: &WidgetConfig, key: &str) -> String {
    let scope = scope_selector(key);
    let mut css = BASE_RULES
        .replace(SCOPE_TOKEN, &scope)
        .replace(COLOR_TOKEN, &config.primary_color);
    css.push_str(&position_rules(config.position, &scope));
    css
}

fn position_rules(position: Position, scope: &str) -> String {
    let vertical = if position.is_top() { "top" } else { "bottom" };
    let horizontal = if position.is_left() { "left" } else { "right" };
    let origin = format!("{vertical} {horizontal}");
    format!(
        "{scope} {{ {vertical}: 20px; {horizontal}: 20px; }}\n\
         {scope} .msw-popup {{ {vertical}: 64px; {horizontal}: 0; transform-origin: {origin}; }}\n\
         @media (max-width: 480px) {{ {scope} .msw-popup {{ {vertical}: 76px; {horizontal}: 8px; }} }}\n"
    )
}

/// Insert the stylesheet into `<head>`, replacing this instance's previous
/// one if present.
///
/// # Errors
///
/// Returns [`WidgetError::Dom`] if the document has no `<head>` or the
/// element cannot be created.
pub fn inject(document: &Document, key: &str, css: &str) -> Result<(), WidgetError> {
    remove(document, key);
    let head = document
        .head()
        .ok_or_else(|| WidgetError::Dom("document has no <head>".into()))?;
    let style = document.create_element("style").map_err(js_error)?;
    style.set_id(&style_element_id(key));
    style.set_text_content(Some(css));
    head.append_child(&style).map_err(js_error)?;
    Ok(())
}

/// Remove this instance's stylesheet, if any.
pub fn remove(document: &Document, key: &str) {
    if let Some(existing) = document.get_element_by_id(&style_element_id(key)) {
        existing.remove();
    }
}
