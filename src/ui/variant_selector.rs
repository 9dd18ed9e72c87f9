//! # Variant Selector Screen
//!
//! Initial screen listing the available command forms:
//!
//! - **Send Command**: one button against the generic run endpoint
//! - **Absolute Move**: absolute move plus emergency stop
//! - **Absolute & Relative Move**: both move kinds plus emergency stop
//! - **Positioning Move**: positioning move plus emergency stop
//!
//! Each form is shown as a panel with its description and an "Open" button.
//! Opening a form mounts it and starts status polling.

use eframe::egui;
use egui::Color32;

use super::{FormAction, FormVariant};

/// Render the selector screen.
/// Returns the variant whose "Open" button was clicked, if any.
pub fn render(ctx: &egui::Context) -> Option<FormVariant> {
    let mut selection = None;
    const PANEL_HEIGHT: f32 = 260.0;
    const PANEL_WIDTH: f32 = 210.0;
    let button_size = egui::vec2(140.0, 30.0);

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            ui.heading(egui::RichText::new("Motor Command Panel").size(28.0));
            ui.add_space(10.0);
            ui.label(egui::RichText::new("Select Form").size(18.0));
            ui.add_space(40.0);
        });

        ui.horizontal(|ui| {
            let spacing = 15.0;
            let count = FormVariant::ALL.len() as f32;
            let total_width = PANEL_WIDTH * count + spacing * (count - 1.0);
            let padding = (ui.available_width() - total_width).max(0.0) / 2.0;

            let original_spacing = ui.spacing().item_spacing.x;
            ui.spacing_mut().item_spacing.x = spacing;
            ui.add_space(padding);

            for variant in FormVariant::ALL {
                ui.group(|ui| {
                    ui.set_width(PANEL_WIDTH);
                    ui.set_min_height(PANEL_HEIGHT);
                    ui.vertical_centered(|ui| {
                        ui.add_space(15.0);
                        ui.heading(egui::RichText::new(variant.title()).size(20.0).color(Color32::WHITE));
                        ui.add_space(10.0);
                        ui.label(egui::RichText::new(variant.description()).size(15.0));
                        ui.add_space(10.0);
                        let buttons = variant.actions().iter().map(FormAction::label).collect::<Vec<_>>().join(" · ");
                        ui.label(egui::RichText::new(buttons).italics().color(Color32::GRAY));
                        ui.add_space(20.0);
                        let button = egui::Button::new(egui::RichText::new("Open").size(15.0).color(Color32::WHITE)).min_size(button_size);
                        if ui.add(button).clicked() {
                            selection = Some(variant);
                        }
                        ui.add_space(15.0);
                    });
                });
            }

            ui.add_space(padding);
            ui.spacing_mut().item_spacing.x = original_spacing;
        });
    });

    selection
}
