//! Popup visibility and active-view state machine.
//!
//! Visibility and the active view are orthogonal. Opening is two-step: the
//! popup is displayed first and the `.open` class is added on a later tick,
//! because a CSS transition never runs on an element that starts at
//! `display: none`. Closing removes the class and hides the popup only when
//! the transition has finished.
//!
//! Every in-flight transition carries an epoch. Completion signals
//! (`transitionend`, the fallback timer, the deferred open-class tick) name
//! the epoch they were armed for, and anything stale is ignored. The host
//! turns returned [`Command`]s into timers and focus calls; everything else
//! is derived from the machine.

#[cfg(test)]
#[path = "view_state_test.rs"]
mod view_state_test;

/// Which panel of the popup is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    Chat,
}

impl View {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "main" => Some(Self::Main),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Chat => "chat",
        }
    }
}

/// Popup visibility, including the two in-flight transition states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Opening {
        epoch: u32,
    },
    Open,
    Closing {
        epoch: u32,
    },
}

/// Side effects the host must schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// On the next tick, call [`ViewMachine::open_class_ready`] with `epoch`.
    ScheduleOpenClass { epoch: u32 },
    /// Wait for the popup's transition to end (or the fallback timer), then
    /// call [`ViewMachine::transition_finished`] with `epoch`.
    ArmTransition { epoch: u32 },
    /// Focus the chat composer after a short delay.
    FocusInput,
}

#[derive(Debug, Clone, Default)]
pub struct ViewMachine {
    visibility: Visibility,
    view: View,
    displayed: bool,
    open_class: bool,
    epoch: u32,
}

impl ViewMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Open or on its way open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.visibility, Visibility::Opening { .. } | Visibility::Open)
    }

    #[must_use]
    pub fn current_view(&self) -> View {
        self.view
    }

    /// Whether the popup should be `display: flex` (otherwise `none`).
    #[must_use]
    pub fn popup_displayed(&self) -> bool {
        self.displayed
    }

    #[must_use]
    pub fn has_open_class(&self) -> bool {
        self.open_class
    }

    /// Epoch of the transition currently in flight, if any.
    #[must_use]
    pub fn in_flight_epoch(&self) -> Option<u32> {
        match self.visibility {
            Visibility::Opening { epoch } | Visibility::Closing { epoch } => Some(epoch),
            Visibility::Closed | Visibility::Open => None,
        }
    }

    // --- Transitions ---

    /// Closed → Opening. No-op from any other state.
    pub fn open(&mut self) -> Vec<Command> {
        if self.visibility != Visibility::Closed {
            return Vec::new();
        }
        let epoch = self.next_epoch();
        self.displayed = true;
        self.visibility = Visibility::Opening { epoch };
        log::debug!("widget opening (epoch {epoch})");
        vec![Command::ScheduleOpenClass { epoch }]
    }

    /// Deferred second half of [`open`](Self::open): add the `.open` class.
    pub fn open_class_ready(&mut self, epoch: u32) -> Vec<Command> {
        if self.visibility != (Visibility::Opening { epoch }) {
            return Vec::new();
        }
        self.open_class = true;
        vec![Command::ArmTransition { epoch }]
    }

    /// Opening/Open → Closing. No-op when already closed or closing.
    pub fn close(&mut self) -> Vec<Command> {
        if !self.is_open() {
            return Vec::new();
        }
        let epoch = self.next_epoch();
        self.open_class = false;
        self.visibility = Visibility::Closing { epoch };
        log::debug!("widget closing (epoch {epoch})");
        vec![Command::ArmTransition { epoch }]
    }

    /// Closed ↔ Open. Ignored while a transition is in flight.
    pub fn toggle(&mut self) -> Vec<Command> {
        match self.visibility {
            Visibility::Closed => self.open(),
            Visibility::Open => self.close(),
            Visibility::Opening { .. } | Visibility::Closing { .. } => Vec::new(),
        }
    }

    /// The transition armed for `epoch` has ended.
    pub fn transition_finished(&mut self, epoch: u32) -> Vec<Command> {
        match self.visibility {
            Visibility::Opening { epoch: current } if current == epoch => {
                self.visibility = Visibility::Open;
            }
            Visibility::Closing { epoch: current } if current == epoch => {
                self.visibility = Visibility::Closed;
                self.displayed = false;
                self.view = View::Main;
            }
            _ => {}
        }
        Vec::new()
    }

    /// Activate a view. Switching to chat asks for the composer to be focused.
    pub fn show_view(&mut self, view: View) -> Vec<Command> {
        self.view = view;
        if view == View::Chat {
            vec![Command::FocusInput]
        } else {
            Vec::new()
        }
    }

    fn next_epoch(&mut self) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }
}
