//! Request type definitions for the control module.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Movement endpoints exposed by the motor service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Generic "run" entry point used by the first version of the form.
    Function,
    Absolute,
    Relative,
    Positioning,
}

impl MoveKind {
    /// Path of the endpoint that starts this movement.
    pub fn endpoint(&self) -> &'static str {
        match self {
            MoveKind::Function => "/run_function",
            MoveKind::Absolute => "/run_abs_movement",
            MoveKind::Relative => "/run_rel_movement",
            MoveKind::Positioning => "/run_positioning_movement",
        }
    }

    /// Caption of the button that submits this movement.
    pub fn button_label(&self) -> &'static str {
        match self {
            MoveKind::Function => "Send command",
            MoveKind::Absolute => "Move Absolute",
            MoveKind::Relative => "Move Relative",
            MoveKind::Positioning => "Start Positioning",
        }
    }
}

/// JSON body of every movement request.
///
/// Both fields are forwarded exactly as typed; the service does the parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovePayload {
    pub position: String,
    pub speed: String,
}

/// Requests the client can issue against the motor service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotorRequest {
    /// Start a movement with the given target position and speed.
    Move { kind: MoveKind, payload: MovePayload },
    /// Emergency stop. Sent without a body.
    QuickStop,
    /// Read the current motor status.
    PollStatus,
}

impl MotorRequest {
    pub fn path(&self) -> &'static str {
        match self {
            MotorRequest::Move { kind, .. } => kind.endpoint(),
            MotorRequest::QuickStop => "/quickstop",
            MotorRequest::PollStatus => "/motor_status",
        }
    }

    pub fn method(&self) -> reqwest::Method {
        match self {
            MotorRequest::PollStatus => reqwest::Method::GET,
            MotorRequest::Move { .. } | MotorRequest::QuickStop => reqwest::Method::POST,
        }
    }

    /// True for user-triggered commands, false for the periodic status read.
    pub fn is_action(&self) -> bool {
        !matches!(self, MotorRequest::PollStatus)
    }

    /// Short human readable description used in logs and the activity table.
    pub fn describe(&self) -> String {
        format!("{} {}", self.method(), self.path())
    }
}

/// Issue-order number attached to every request.
///
/// Tickets come from one shared [`TicketCounter`] in the order requests are
/// issued, so a larger ticket always means a more recent request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

impl std::fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing tickets.
///
/// Shared between the UI thread, which tickets submitted actions, and the
/// control task, which tickets status polls.
#[derive(Debug, Default)]
pub struct TicketCounter {
    last: AtomicU64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestTicket {
        RequestTicket(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued ticket, or `RequestTicket(0)` if none was issued yet.
    pub fn last_issued(&self) -> RequestTicket {
        RequestTicket(self.last.load(Ordering::SeqCst))
    }
}
