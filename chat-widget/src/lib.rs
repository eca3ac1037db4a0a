//! Embeddable customer-support chat widget.
//!
//! This crate is compiled to WebAssembly and loaded by a small script tag on
//! a host page. On start it scans the page for embed tags, asks the API
//! whether each widget is active, and mounts a floating trigger button with
//! a popup (a main menu and a chat view) for every one that is. Host pages
//! can also drive a widget directly through the exported
//! `ModernSupportWidget` class.
//!
//! Everything that does not touch the DOM is plain Rust and tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`boot`] | Auto-init entry point and the activation gate |
//! | [`runtime`] | Instance lifecycle, config resolution, the JS class |
//! | [`widget`] | Leptos view and the handles that drive it |
//! | [`view_state`] | Popup visibility / active view state machine |
//! | [`chat`] | Transcript and the send/receive exchange |
//! | [`api`] | HTTP client with timeouts |
//! | [`config`] | Defaults, shallow overwrite, embed settings |
//! | [`styles`] | Per-instance scoped stylesheet |
//! | [`icon`] | Avatar selection |
//! | [`error`] | [`error::WidgetError`] |
//! | [`consts`] | Defaults, copy, timings, DOM names |

pub mod api;
pub mod boot;
pub mod chat;
pub mod config;
pub mod consts;
pub mod error;
pub mod icon;
pub mod runtime;
pub mod styles;
pub mod view_state;
pub mod widget;

#[cfg(test)]
#[path = "mock_test.rs"]
mod mock;

pub use runtime::ModernSupportWidget;
