//! # Form Panel - Command Inputs and Status
//!
//! Renders the central panel of a mounted form:
//! - Target position input (0.1 degree units)
//! - Speed input (rpm)
//! - One button per action of the mounted variant
//! - The current motor status label
//!
//! Inputs are plain text and are sent exactly as typed. Buttons stay enabled
//! whatever the displayed status is.

use crate::control::{MotorRequest, MoveKind, MovePayload};
use crate::ui::{AppState, FormAction};
use eframe::egui;

/// Text bound to the two input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub position: String,
    pub speed: String,
}

impl FormInputs {
    /// Build the movement request for the current field contents.
    pub fn move_request(&self, kind: MoveKind) -> MotorRequest {
        MotorRequest::Move {
            kind,
            payload: MovePayload {
                position: self.position.clone(),
                speed: self.speed.clone(),
            },
        }
    }

    /// Request sent when `action` is clicked.
    pub fn request_for(&self, action: FormAction) -> MotorRequest {
        match action {
            FormAction::Move(kind) => self.move_request(kind),
            FormAction::QuickStop => MotorRequest::QuickStop,
        }
    }
}

/// Render the form of the mounted variant.
///
/// # Parameters
///
/// * `ctx` - egui context
/// * `state` - Mutable application state holding inputs and status
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(variant) = state.variant else {
        return;
    };

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Nanotec Motor Control");
        ui.separator();
        ui.add_space(10.0);

        egui::Grid::new("command_inputs").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label(variant.position_label());
            ui.add(egui::TextEdit::singleline(&mut state.inputs.position).desired_width(160.0));
            ui.end_row();

            ui.label("Speed (rpm):");
            ui.add(egui::TextEdit::singleline(&mut state.inputs.speed).desired_width(160.0));
            ui.end_row();
        });

        ui.add_space(12.0);

        let mut clicked = None;
        ui.horizontal(|ui| {
            for action in variant.actions() {
                let text = match action {
                    FormAction::QuickStop => egui::RichText::new(action.label()).strong().color(egui::Color32::WHITE),
                    FormAction::Move(_) => egui::RichText::new(action.label()),
                };
                let mut button = egui::Button::new(text).min_size(egui::vec2(140.0, 28.0));
                if *action == FormAction::QuickStop {
                    button = button.fill(egui::Color32::from_rgb(180, 30, 30));
                }
                if ui.add(button).clicked() {
                    clicked = Some(*action);
                }
            }
        });
        if let Some(action) = clicked {
            state.submit(action);
        }

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            ui.label("Motor status:");
            let status = state.board.status();
            ui.label(egui::RichText::new(status.as_str()).monospace().strong().color(status.color()));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_independent() {
        let mut inputs = FormInputs::default();
        inputs.position.push_str("100");
        assert_eq!(inputs.speed, "");
        inputs.speed.push_str("50");
        assert_eq!(inputs.position, "100");
    }

    #[test]
    fn test_move_request_uses_typed_text() {
        let inputs = FormInputs {
            position: "100".into(),
            speed: "50".into(),
        };
        assert_eq!(
            inputs.request_for(FormAction::Move(MoveKind::Absolute)),
            MotorRequest::Move {
                kind: MoveKind::Absolute,
                payload: MovePayload {
                    position: "100".into(),
                    speed: "50".into(),
                },
            }
        );
    }

    #[test]
    fn test_no_validation_before_sending() {
        let inputs = FormInputs {
            position: "ten degrees".into(),
            speed: String::new(),
        };
        match inputs.request_for(FormAction::Move(MoveKind::Relative)) {
            MotorRequest::Move { kind, payload } => {
                assert_eq!(kind, MoveKind::Relative);
                assert_eq!(payload.position, "ten degrees");
                assert_eq!(payload.speed, "");
            }
            other => panic!("Expected a move request, got {:?}", other),
        }
    }

    #[test]
    fn test_stop_ignores_inputs() {
        let inputs = FormInputs {
            position: "1".into(),
            speed: "2".into(),
        };
        assert_eq!(inputs.request_for(FormAction::QuickStop), MotorRequest::QuickStop);
    }
}
