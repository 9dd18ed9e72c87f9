//! # Application State Management
//!
//! This module implements the central `AppState` struct which holds all UI state
//! and coordinates rendering. It implements the `eframe::App` trait to integrate
//! with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Holds the mounted form variant, the two text inputs and the status board
//! - Processes completions from the control task via `ui_refresh_rx`
//! - Sends mount/unmount/submit commands to the control task via `ui_command_tx`
//! - Repaints every 50 ms via `request_repaint_after` so completions show up
//!   without user input
//!
//! Nothing is persisted: inputs and status are created on mount and dropped on
//! unmount.

use eframe::egui;
use std::time::Duration;

use super::activity_panel::{self, ActivityLog, ActivityRecord};
use super::form_panel::{self, FormInputs};
use super::{FormAction, FormVariant, StatusBoard, UICommand, UIRefreshState, variant_selector};
use crate::control::{ControlConfig, TicketCounter};

/// Central application state.
pub struct AppState {
    /// Optional alert message to display in a modal dialog.
    pub alert: Option<String>,
    /// Receiver for completions and alerts from the control task.
    pub ui_refresh_rx: crate::UIRefreshQueueReceiver,
    /// Sender for commands from the UI to the control task.
    pub ui_command_tx: crate::UICommandQueueSender,
    /// Ticket source shared with the control task.
    pub tickets: &'static TicketCounter,
    /// Base URL of the motor service, shown in the header.
    pub base_url: String,

    /// Mounted form, or `None` while the selector is shown.
    pub variant: Option<FormVariant>,
    /// Text of the position and speed inputs.
    pub inputs: FormInputs,
    /// Displayed motor status.
    pub board: StatusBoard,
    /// Recently finished requests.
    pub activity: ActivityLog,
}

impl AppState {
    /// Create a new AppState. Mounts `form-variant` right away if configured.
    pub fn new(
        rx: crate::UIRefreshQueueReceiver,
        tx: crate::UICommandQueueSender,
        tickets: &'static TicketCounter,
        config: &ControlConfig,
    ) -> Self {
        let mut state = Self {
            alert: None,
            ui_refresh_rx: rx,
            ui_command_tx: tx,
            tickets,
            base_url: config.base_url.clone(),
            variant: None,
            inputs: FormInputs::default(),
            board: StatusBoard::new(),
            activity: ActivityLog::new(),
        };
        if let Some(variant) = config.form_variant {
            state.mount(variant);
        }
        state
    }

    /// Show a form with empty inputs and start polling.
    pub fn mount(&mut self, variant: FormVariant) {
        log::debug!("Mounting form '{}'", variant.title());
        self.variant = Some(variant);
        self.inputs = FormInputs::default();
        self.board.mount(self.tickets.last_issued());
        self.send_command(UICommand::Mount(variant));
    }

    /// Leave the form and stop polling. In-flight requests still finish but no longer affect the status.
    pub fn unmount(&mut self) {
        if self.variant.take().is_some() {
            log::debug!("Unmounting form");
            self.board.unmount();
            self.inputs = FormInputs::default();
            self.send_command(UICommand::Unmount);
        }
    }

    /// Issue the request behind a clicked button.
    pub fn submit(&mut self, action: FormAction) {
        let request = self.inputs.request_for(action);
        let ticket = self.tickets.next();
        log::debug!("{} {} submitted", ticket, request.describe());
        self.send_command(UICommand::Submit(ticket, request));
    }

    fn send_command(&self, cmd: UICommand) {
        if let Err(e) = self.ui_command_tx.try_send(cmd) {
            log::warn!("UI command queue full, dropping {:?}", e);
        }
    }

    fn process_refresh_queue(&mut self) {
        while let Ok(msg) = self.ui_refresh_rx.try_receive() {
            match msg {
                UIRefreshState::Alert(alert_msg) => {
                    self.alert = Some(alert_msg);
                }
                UIRefreshState::RequestCompleted(completion) => {
                    let applied = self.board.apply(&completion);
                    if !applied {
                        log::debug!("Discarded stale completion {} {}", completion.ticket, completion.request.describe());
                    }
                    self.activity.push(ActivityRecord::from_completion(&completion, applied));
                }
            }
        }
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("form_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⬅ Back").clicked() {
                    self.unmount();
                }
                ui.separator();
                if let Some(variant) = self.variant {
                    ui.label(egui::RichText::new(variant.title()).strong());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&self.base_url).monospace());
                    ui.label("Service:");
                });
            });
        });
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint periodically so background updates are visible without input
        ctx.request_repaint_after(Duration::from_millis(50));

        self.process_refresh_queue();

        if ctx.input(|i| i.viewport().close_requested()) {
            self.unmount();
        }

        if let Some(alert) = self.alert.clone() {
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(alert);
                        ui.add_space(20.0);

                        if ui.button("OK").clicked() {
                            self.alert = None;
                        }
                        ui.add_space(10.0);
                    });
                });
        }

        if self.variant.is_none() {
            if let Some(variant) = variant_selector::render(ctx) {
                self.mount(variant);
            }
            return;
        }

        self.render_header(ctx);
        activity_panel::render(ctx, self);
        form_panel::render(ctx, self);
    }
}
