// UI module for the Motor Command Panel
//
// This module organizes the UI into separate components:
// - `variant_selector`: Initial form variant selection screen
// - `form_panel`: Position/speed inputs, action buttons and status label
// - `activity_panel`: Table of recently finished requests
// - `status`: Status value and the ordering rules for applying completions
// - `app_state`: Application state management and main update loop

pub mod activity_panel;
pub mod app_state;
pub mod form_panel;
pub mod status;
pub mod variant_selector;

use serde::Deserialize;

use crate::control::{MotorRequest, MoveKind, RequestCompletion, RequestTicket};

pub use app_state::AppState;
pub use status::StatusBoard;

#[derive(Debug)]
pub enum UIRefreshState {
    Alert(String),
    RequestCompleted(RequestCompletion),
}

#[derive(Debug)]
pub enum UICommand {
    /// A form was shown; start polling.
    Mount(FormVariant),
    /// The form was left; stop polling.
    Unmount,
    /// A button was clicked; the ticket was drawn when the click happened.
    Submit(RequestTicket, MotorRequest),
}

/// A button on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Move(MoveKind),
    QuickStop,
}

impl FormAction {
    pub fn label(&self) -> &'static str {
        match self {
            FormAction::Move(kind) => kind.button_label(),
            FormAction::QuickStop => "Emergency Stop",
        }
    }
}

/// The different command forms the panel can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormVariant {
    /// Single "Send command" button against `/run_function`.
    SendCommand,
    /// Absolute move plus emergency stop.
    Absolute,
    /// Absolute and relative moves plus emergency stop.
    AbsoluteRelative,
    /// Positioning move plus emergency stop.
    Positioning,
}

impl FormVariant {
    pub const ALL: [FormVariant; 4] = [
        FormVariant::SendCommand,
        FormVariant::Absolute,
        FormVariant::AbsoluteRelative,
        FormVariant::Positioning,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FormVariant::SendCommand => "Send Command",
            FormVariant::Absolute => "Absolute Move",
            FormVariant::AbsoluteRelative => "Absolute & Relative Move",
            FormVariant::Positioning => "Positioning Move",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FormVariant::SendCommand => "Send a target position and speed to the generic run endpoint.",
            FormVariant::Absolute => "Move to an absolute target position, with an emergency stop.",
            FormVariant::AbsoluteRelative => "Move to an absolute target or by a relative offset, with an emergency stop.",
            FormVariant::Positioning => "Start a positioning movement, with an emergency stop.",
        }
    }

    /// Caption of the position input.
    pub fn position_label(&self) -> &'static str {
        match self {
            FormVariant::SendCommand | FormVariant::Absolute => "Target Position Absolute (0.1deg):",
            FormVariant::AbsoluteRelative | FormVariant::Positioning => "Target Position (0.1deg):",
        }
    }

    /// Buttons shown on this form, left to right.
    pub fn actions(&self) -> &'static [FormAction] {
        match self {
            FormVariant::SendCommand => &[FormAction::Move(MoveKind::Function)],
            FormVariant::Absolute => &[FormAction::Move(MoveKind::Absolute), FormAction::QuickStop],
            FormVariant::AbsoluteRelative => &[
                FormAction::Move(MoveKind::Absolute),
                FormAction::Move(MoveKind::Relative),
                FormAction::QuickStop,
            ],
            FormVariant::Positioning => &[FormAction::Move(MoveKind::Positioning), FormAction::QuickStop],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_one_to_three_buttons() {
        for variant in FormVariant::ALL {
            let count = variant.actions().len();
            assert!((1..=3).contains(&count), "{:?} has {} buttons", variant, count);
        }
    }

    #[test]
    fn test_send_command_variant_uses_run_function() {
        assert_eq!(FormVariant::SendCommand.actions(), &[FormAction::Move(MoveKind::Function)]);
        assert_eq!(FormAction::Move(MoveKind::Function).label(), "Send command");
    }

    #[test]
    fn test_stop_button_label() {
        assert!(FormVariant::AbsoluteRelative.actions().contains(&FormAction::QuickStop));
        assert_eq!(FormAction::QuickStop.label(), "Emergency Stop");
    }
}
