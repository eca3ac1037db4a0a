//! The widget's DOM: trigger button, popup, main menu and chat views.
//!
//! All state lives in [`WidgetHandles`], a bundle of `Copy` signal handles
//! shared by the component, the window listeners and the JS-facing
//! [`ModernSupportWidget`](crate::runtime::ModernSupportWidget). Rendering is
//! derived from the [`ViewMachine`] and [`ChatSession`]; the handles turn
//! machine [`Command`]s into timers and focus calls.

use gloo_timers::callback::Timeout;
use leptos::ev;
use leptos::html::{Div, Textarea};
use leptos::prelude::*;
use supportdesk_shared::MAX_MESSAGE_LEN;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, KeyboardEvent, MouseEvent, TransitionEvent};

use crate::api::HttpApi;
use crate::chat::{deliver, ChatMessage, ChatSession};
use crate::config::WidgetConfig;
use crate::consts::{COMPOSER_MAX_HEIGHT_PX, FOCUS_DELAY_MS, OPEN_CLASS_DELAY_MS, TRANSITION_FALLBACK_MS};
use crate::icon::{self, Icon};
use crate::view_state::{Command, View, ViewMachine};

/// One entry in the main menu.
struct MenuOption {
    glyph: &'static str,
    label: &'static str,
    hint: &'static str,
    /// Text placed in an empty composer when the option is chosen.
    starter: Option<&'static str>,
}

static MENU_OPTIONS: [MenuOption; 2] = [
    MenuOption {
        glyph: "💬",
        label: "Start a conversation",
        hint: "Ask us anything",
        starter: None,
    },
    MenuOption {
        glyph: "🛠️",
        label: "Report a problem",
        hint: "Tell us what went wrong",
        starter: Some("I'd like to report a problem: "),
    },
];

/// Reactive state of one mounted widget.
#[derive(Clone, Copy)]
pub struct WidgetHandles {
    pub machine: RwSignal<ViewMachine>,
    pub session: RwSignal<ChatSession>,
    pub config: RwSignal<WidgetConfig>,
    pub draft: RwSignal<String>,
    api: StoredValue<HttpApi>,
    input_ref: NodeRef<Textarea>,
}

impl WidgetHandles {
    #[must_use]
    pub fn new(config: WidgetConfig, api: HttpApi) -> Self {
        Self {
            machine: RwSignal::new(ViewMachine::new()),
            session: RwSignal::new(ChatSession::new()),
            config: RwSignal::new(config),
            draft: RwSignal::new(String::new()),
            api: StoredValue::new(api),
            input_ref: NodeRef::new(),
        }
    }

    // --- View state ---

    pub fn open(self) {
        self.dispatch(ViewMachine::open);
    }

    pub fn close(self) {
        self.dispatch(ViewMachine::close);
    }

    pub fn toggle(self) {
        self.dispatch(ViewMachine::toggle);
    }

    pub fn show_view(self, view: View) {
        self.dispatch(|m| m.show_view(view));
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        self.machine.try_with_untracked(ViewMachine::is_open).unwrap_or(false)
    }

    #[must_use]
    pub fn current_view(self) -> View {
        self.machine
            .try_with_untracked(ViewMachine::current_view)
            .unwrap_or_default()
    }

    /// Run a machine transition and schedule whatever it asks for. A
    /// disposed widget ignores late timers.
    fn dispatch(self, transition: impl FnOnce(&mut ViewMachine) -> Vec<Command>) {
        let commands = self.machine.try_update(transition).unwrap_or_default();
        for command in commands {
            self.schedule(command);
        }
    }

    fn schedule(self, command: Command) {
        match command {
            Command::ScheduleOpenClass { epoch } => {
                Timeout::new(OPEN_CLASS_DELAY_MS, move || {
                    self.dispatch(|m| m.open_class_ready(epoch));
                })
                .forget();
            }
            Command::ArmTransition { epoch } => {
                Timeout::new(TRANSITION_FALLBACK_MS, move || {
                    self.dispatch(|m| m.transition_finished(epoch));
                })
                .forget();
            }
            Command::FocusInput => {
                Timeout::new(FOCUS_DELAY_MS, move || self.focus_input()).forget();
            }
        }
    }

    fn on_transition_end(self, event: &TransitionEvent) {
        if event.property_name() != "opacity" || !target_has_class(event.target(), "msw-popup") {
            return;
        }
        if let Some(epoch) = self.machine.try_with_untracked(ViewMachine::in_flight_epoch).flatten() {
            self.dispatch(|m| m.transition_finished(epoch));
        }
    }

    fn on_window_click(self, event: &MouseEvent, scope: &str) {
        if !self.is_open() {
            return;
        }
        let inside = event.target().is_some_and(|target| {
            target
                .dyn_ref::<Element>()
                .is_some_and(|el| matches!(el.closest(scope), Ok(Some(_))))
        });
        if !inside {
            self.close();
        }
    }

    fn on_window_keydown(self, event: &KeyboardEvent) {
        if event.key() == "Escape" && self.is_open() {
            self.close();
        }
    }

    /// Install the outside-click and Escape listeners. `scope` is the
    /// instance's root selector.
    pub fn window_listeners(self, scope: String) -> Vec<WindowListenerHandle> {
        vec![
            window_event_listener(ev::click, move |event| self.on_window_click(&event, &scope)),
            window_event_listener(ev::keydown, move |event| self.on_window_keydown(&event)),
        ]
    }

    // --- Composer ---

    fn choose_option(self, starter: Option<&'static str>) {
        if let Some(text) = starter {
            if self.draft.with_untracked(|d| d.trim().is_empty()) {
                self.draft.set(text.to_string());
            }
        }
        self.show_view(View::Chat);
    }

    fn focus_input(self) {
        if let Some(input) = self.input_ref.get_untracked() {
            if let Err(err) = input.focus() {
                log::debug!("composer focus failed: {err:?}");
            }
        }
    }

    /// Grow the composer with its content, up to the cap.
    fn autogrow(self) {
        let Some(input) = self.input_ref.get_untracked() else {
            return;
        };
        let style = web_sys::HtmlElement::style(&input);
        if let Err(err) = style.set_property("height", "auto") {
            log::debug!("composer resize failed: {err:?}");
            return;
        }
        let height = input.scroll_height().min(COMPOSER_MAX_HEIGHT_PX);
        if let Err(err) = style.set_property("height", &format!("{height}px")) {
            log::debug!("composer resize failed: {err:?}");
        }
    }

    /// Send the composer text: user turn now, bot turn when the API answers.
    pub fn send(self) {
        let text = self.draft.get_untracked();
        let Some(pending) = self
            .session
            .try_update(|s| s.begin_send(&text, js_sys::Date::now()))
            .flatten()
        else {
            return;
        };
        self.draft.set(String::new());
        self.autogrow();

        let Some(api) = self.api.try_get_value() else {
            return;
        };
        let widget_id = self
            .config
            .with_untracked(|c| c.valid_widget_id().map(str::to_string));
        spawn_local(async move {
            let result = deliver(&api, widget_id.as_deref(), &pending).await;
            let recorded = self
                .session
                .try_update(|s| {
                    s.finish_send(result, js_sys::Date::now());
                })
                .is_some();
            if !recorded {
                log::debug!("widget destroyed before the reply arrived");
            }
        });
    }

    /// Release every signal. Late timers and replies become no-ops.
    pub fn dispose(self) {
        self.machine.dispose();
        self.session.dispose();
        self.config.dispose();
        self.draft.dispose();
        self.api.dispose();
    }
}

fn target_has_class(target: Option<web_sys::EventTarget>, class: &str) -> bool {
    target.is_some_and(|t| t.dyn_ref::<Element>().is_some_and(|el| el.class_list().contains(class)))
}

fn avatar(icon: Icon) -> AnyView {
    match icon {
        Icon::Image(url) => view! {
            <div class="msw-avatar">
                <img class="msw-avatar-img" src=url alt="" />
            </div>
        }
        .into_any(),
        Icon::Emoji(glyph) => view! { <div class="msw-avatar msw-avatar-emoji">{glyph}</div> }.into_any(),
        Icon::Letter(letter) => {
            view! { <div class="msw-avatar msw-avatar-letter">{letter.to_string()}</div> }.into_any()
        }
    }
}

#[component]
pub fn SupportWidget(handles: WidgetHandles) -> impl IntoView {
    let WidgetHandles { machine, session, config, draft, input_ref, .. } = handles;
    let messages_ref: NodeRef<Div> = NodeRef::new();

    let icon = Memo::new(move |_| config.with(icon::for_config));
    let text = move |field: fn(&WidgetConfig) -> &str| move || config.with(|c| field(c).to_string());
    let view_active = move |view: View| move || machine.with(|m| m.current_view() == view);

    // Keep the newest message in view.
    Effect::new(move |_| {
        session.track();
        if let Some(list) = messages_ref.get_untracked() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    let options = MENU_OPTIONS
        .iter()
        .map(|option| {
            let starter = option.starter;
            view! {
                <button class="msw-option" type="button" on:click=move |_| handles.choose_option(starter)>
                    <span class="msw-option-icon">{option.glyph}</span>
                    <span class="msw-option-text">
                        <span class="msw-option-label">{option.label}</span>
                        <span class="msw-option-hint">{option.hint}</span>
                    </span>
                </button>
            }
        })
        .collect_view();

    view! {
        <button
            class="msw-trigger"
            type="button"
            aria-haspopup="dialog"
            aria-expanded=move || machine.with(ViewMachine::is_open).to_string()
            on:click=move |_| handles.toggle()
        >
            {move || avatar(icon.get())}
            <span class="msw-trigger-label">{text(|c| c.widget_title.as_str())}</span>
        </button>

        <div
            class="msw-popup"
            role="dialog"
            aria-label=text(|c| c.widget_title.as_str())
            class:open=move || machine.with(ViewMachine::has_open_class)
            style:display=move || if machine.with(ViewMachine::popup_displayed) { "flex" } else { "none" }
            on:transitionend=move |event| handles.on_transition_end(&event)
        >
            <div class="msw-view widget-main-view" class:active=view_active(View::Main)>
                <div class="msw-header">
                    {move || avatar(icon.get())}
                    <div class="msw-header-text">
                        <div class="msw-title">{text(|c| c.product_name.as_str())}</div>
                        <div class="msw-subtitle">{text(|c| c.description.as_str())}</div>
                    </div>
                    <button class="msw-icon-button msw-close" type="button" aria-label="Close" on:click=move |_| handles.close()>
                        "×"
                    </button>
                </div>
                <div class="msw-body">
                    <p class="msw-welcome">{text(|c| c.welcome_message.as_str())}</p>
                    <div class="msw-options">{options}</div>
                </div>
            </div>

            <div class="msw-view widget-chat-view" class:active=view_active(View::Chat)>
                <div class="msw-header">
                    <button class="msw-icon-button msw-back" type="button" aria-label="Back" on:click=move |_| handles.show_view(View::Main)>
                        "←"
                    </button>
                    <div class="msw-header-text">
                        <div class="msw-title">{text(|c| c.widget_title.as_str())}</div>
                        <div class="msw-subtitle">{text(|c| c.product_name.as_str())}</div>
                    </div>
                    <button class="msw-icon-button msw-close" type="button" aria-label="Close" on:click=move |_| handles.close()>
                        "×"
                    </button>
                </div>
                <div class="msw-messages" node_ref=messages_ref aria-live="polite">
                    <div class="msw-message bot">{text(|c| c.welcome_message.as_str())}</div>
                    <For
                        each=move || session.with(|s| s.messages().to_vec())
                        key=|message| message.id
                        children=move |message: ChatMessage| {
                            let class = format!("msw-message {}", message.sender.css_class());
                            view! { <div class=class>{message.content}</div> }
                        }
                    />
                    <Show when=move || session.with(ChatSession::is_pending)>
                        <div class="msw-typing" aria-label="Typing">
                            <span></span>
                            <span></span>
                            <span></span>
                        </div>
                    </Show>
                </div>
                <div class="msw-composer">
                    <textarea
                        class="msw-input"
                        rows="1"
                        maxlength=MAX_MESSAGE_LEN.to_string()
                        placeholder="Type your message..."
                        node_ref=input_ref
                        prop:value=move || draft.get()
                        on:input=move |event| {
                            draft.set(event_target_value(&event));
                            handles.autogrow();
                        }
                        on:keydown=move |event: KeyboardEvent| {
                            if event.key() == "Enter" && !event.shift_key() && !event.is_composing() {
                                event.prevent_default();
                                handles.send();
                            }
                        }
                    ></textarea>
                    <button
                        class="msw-send"
                        type="button"
                        disabled=move || session.with(ChatSession::is_pending)
                        on:click=move |_| handles.send()
                    >
                        "Send"
                    </button>
                </div>
            </div>
        </div>
    }
}
