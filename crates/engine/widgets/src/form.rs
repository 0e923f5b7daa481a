//! Simulated contact-form submission
//!
//! There is no backend: submitting shows a sending label, then a success
//! label, then returns to idle. The owner schedules the two timers.

use effects::{selectors, Surface};
use serde::Serialize;

pub const IDLE_LABEL: &str = "Send Proposal Request";
pub const SENDING_LABEL: &str = "Sending...";
pub const SENT_LABEL: &str = "Sent Successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    #[default]
    Idle,
    Sending,
    Sent,
}

impl FormState {
    pub const fn label(&self) -> &'static str {
        match self {
            FormState::Idle => IDLE_LABEL,
            FormState::Sending => SENDING_LABEL,
            FormState::Sent => SENT_LABEL,
        }
    }
}

/// Timers the form needs after a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTimer {
    /// Sending finished
    Delivered,
    /// Success label shown long enough
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    state: FormState,
    submissions: u32,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Completed submissions so far
    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    /// Start a submission; ignored unless idle
    pub fn submit(&mut self) -> bool {
        if self.state != FormState::Idle {
            tracing::debug!(state = ?self.state, "Ignoring submit while busy");
            return false;
        }
        self.state = FormState::Sending;
        true
    }

    /// Advance on a timer; returns the new state if it changed
    pub fn on_timer(&mut self, timer: FormTimer) -> Option<FormState> {
        let next = match (self.state, timer) {
            (FormState::Sending, FormTimer::Delivered) => {
                self.submissions += 1;
                FormState::Sent
            }
            (FormState::Sent, FormTimer::Reset) => FormState::Idle,
            _ => return None,
        };
        self.state = next;
        Some(next)
    }

    /// Show the current label; clears the inputs once delivered
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let Some(button) = surface.query(selectors::SUBMIT_BUTTON) {
            surface.set_text(button, self.state.label());
        }
        if self.state == FormState::Sent {
            if let Some(form) = surface.query(selectors::CONTACT_FORM) {
                surface.reset_form(form);
            }
        }
    }
}
