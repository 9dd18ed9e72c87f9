//! # Activity Panel - Finished Requests
//!
//! Bottom panel listing the most recent finished requests, newest first.
//! Each row shows when the request finished, its ticket, the endpoint and the
//! outcome. Rows whose completion was overtaken by a newer request are greyed
//! out, since they did not change the displayed status.
//!
//! The table uses `egui_extras::TableBuilder`, so only visible rows are built.

use crate::control::{Reply, RequestCompletion, RequestTicket};
use crate::ui::AppState;
use chrono::{DateTime, Local};
use eframe::egui;
use egui::Color32;
use std::collections::VecDeque;

/// Maximum number of rows kept in the activity log.
pub const ACTIVITY_LOG_CAPACITY: usize = 200;

/// One row of the activity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub ticket: RequestTicket,
    pub finished_at: DateTime<Local>,
    pub request: String,
    pub outcome: String,
    pub success: bool,
    /// Whether the completion changed the displayed status.
    pub applied: bool,
}

impl ActivityRecord {
    pub fn from_completion(completion: &RequestCompletion, applied: bool) -> Self {
        let outcome = match &completion.result {
            Ok(Reply::Accepted { message: Some(message) }) => message.clone(),
            Ok(Reply::Accepted { message: None }) => "accepted".to_string(),
            Ok(Reply::Status(status)) => format!("status: {}", status),
            Err(e) => e.clone(),
        };
        Self {
            ticket: completion.ticket,
            finished_at: completion.finished_at,
            request: completion.request.describe(),
            outcome,
            success: completion.result.is_ok(),
            applied,
        }
    }
}

/// Bounded history of finished requests.
#[derive(Debug, Default)]
pub struct ActivityLog {
    records: VecDeque<ActivityRecord>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, dropping the oldest one when full.
    pub fn push(&mut self, record: ActivityRecord) {
        if self.records.len() >= ACTIVITY_LOG_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index` counted from the newest entry.
    pub fn newest_first(&self, index: usize) -> Option<&ActivityRecord> {
        let len = self.records.len();
        if index >= len {
            return None;
        }
        self.records.get(len - 1 - index)
    }
}

/// Render the activity panel at the bottom of the window.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("activity_log").resizable(true).default_height(180.0).show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Activity");
            if ui.button("Clear").clicked() {
                state.activity.clear();
            }
        });
        ui.separator();

        if state.activity.is_empty() {
            ui.label("No requests finished yet.");
            return;
        }

        use egui_extras::{Column, TableBuilder};

        let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.3;
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(80.0).at_least(60.0)) // Time
            .column(Column::initial(60.0).at_least(40.0)) // Ticket
            .column(Column::initial(220.0).at_least(120.0)) // Request
            .column(Column::remainder()) // Result
            .header(row_height, |mut header| {
                header.col(|ui| {
                    ui.strong("Time");
                });
                header.col(|ui| {
                    ui.strong("Ticket");
                });
                header.col(|ui| {
                    ui.strong("Request");
                });
                header.col(|ui| {
                    ui.strong("Result");
                });
            })
            .body(|body| {
                let row_count = state.activity.len();
                body.rows(row_height, row_count, |mut row| {
                    let Some(record) = state.activity.newest_first(row.index()) else {
                        return;
                    };
                    let color = match (record.success, record.applied) {
                        (_, false) => Color32::GRAY,
                        (true, true) => Color32::LIGHT_GREEN,
                        (false, true) => Color32::RED,
                    };
                    row.col(|ui| {
                        ui.colored_label(color, record.finished_at.format("%H:%M:%S").to_string());
                    });
                    row.col(|ui| {
                        ui.colored_label(color, record.ticket.to_string());
                    });
                    row.col(|ui| {
                        ui.colored_label(color, &record.request);
                    });
                    row.col(|ui| {
                        ui.colored_label(color, &record.outcome);
                    });
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::MotorRequest;

    fn record(ticket: u64) -> ActivityRecord {
        let completion = RequestCompletion {
            ticket: RequestTicket(ticket),
            request: MotorRequest::PollStatus,
            result: Ok(Reply::Status("idle".into())),
            finished_at: Local::now(),
        };
        ActivityRecord::from_completion(&completion, true)
    }

    #[test]
    fn test_outcome_text() {
        let stop = RequestCompletion {
            ticket: RequestTicket(1),
            request: MotorRequest::QuickStop,
            result: Ok(Reply::Accepted {
                message: Some("Emergency stop sent".into()),
            }),
            finished_at: Local::now(),
        };
        let row = ActivityRecord::from_completion(&stop, true);
        assert_eq!(row.request, "POST /quickstop");
        assert_eq!(row.outcome, "Emergency stop sent");
        assert!(row.success);

        let failed = RequestCompletion {
            result: Err("HTTP 500".into()),
            ..stop
        };
        let row = ActivityRecord::from_completion(&failed, false);
        assert_eq!(row.outcome, "HTTP 500");
        assert!(!row.success);
        assert!(!row.applied);

        assert_eq!(record(2).outcome, "status: idle");
    }

    #[test]
    fn test_newest_first_order() {
        let mut log = ActivityLog::new();
        log.push(record(1));
        log.push(record(2));
        assert_eq!(log.newest_first(0).unwrap().ticket, RequestTicket(2));
        assert_eq!(log.newest_first(1).unwrap().ticket, RequestTicket(1));
        assert!(log.newest_first(2).is_none());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = ActivityLog::new();
        for ticket in 1..=(ACTIVITY_LOG_CAPACITY as u64 + 5) {
            log.push(record(ticket));
        }
        assert_eq!(log.len(), ACTIVITY_LOG_CAPACITY);
        assert_eq!(log.newest_first(ACTIVITY_LOG_CAPACITY - 1).unwrap().ticket, RequestTicket(6));
    }
}
