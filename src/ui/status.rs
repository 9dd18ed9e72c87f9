//! Motor status shown on the form and the rules for updating it.
//!
//! Every finished request maps to a status: accepted movements read
//! `moving`, an accepted quickstop reads `stopped`, a status poll shows
//! whatever the service reported, and any failure reads `error`.
//!
//! Completions can arrive in any order because requests run concurrently.
//! [`StatusBoard`] applies a completion only when it was issued after the
//! last applied one, so a slow poll can no longer overwrite the result of a
//! button clicked after the poll went out. Completions that arrive while no
//! form is mounted, or that were issued before the current mount, are ignored.

use egui::Color32;

use crate::control::{MotorRequest, Reply, RequestCompletion, RequestTicket};

/// Status text displayed on the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MotorStatus {
    #[default]
    Idle,
    Moving,
    Stopped,
    Error,
    /// Any other string reported by the service, kept verbatim.
    Reported(String),
}

impl MotorStatus {
    /// Map a string reported by `/motor_status` onto a status.
    pub fn from_reported(status: &str) -> Self {
        match status {
            "idle" => MotorStatus::Idle,
            "moving" => MotorStatus::Moving,
            "stopped" => MotorStatus::Stopped,
            "error" => MotorStatus::Error,
            other => MotorStatus::Reported(other.to_string()),
        }
    }

    /// Status resulting from a finished request.
    pub fn after(completion: &RequestCompletion) -> Self {
        match (&completion.request, &completion.result) {
            (_, Err(_)) => MotorStatus::Error,
            (MotorRequest::Move { .. }, Ok(_)) => MotorStatus::Moving,
            (MotorRequest::QuickStop, Ok(_)) => MotorStatus::Stopped,
            (MotorRequest::PollStatus, Ok(Reply::Status(status))) => MotorStatus::from_reported(status),
            // A poll always answers with Reply::Status
            (MotorRequest::PollStatus, Ok(Reply::Accepted { .. })) => MotorStatus::Error,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MotorStatus::Idle => "idle",
            MotorStatus::Moving => "moving",
            MotorStatus::Stopped => "stopped",
            MotorStatus::Error => "error",
            MotorStatus::Reported(s) => s,
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            MotorStatus::Idle => Color32::LIGHT_GRAY,
            MotorStatus::Moving => Color32::from_rgb(0, 128, 255),
            MotorStatus::Stopped => Color32::YELLOW,
            MotorStatus::Error => Color32::RED,
            MotorStatus::Reported(_) => Color32::WHITE,
        }
    }
}

impl std::fmt::Display for MotorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the displayed status of the mounted form.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    status: MotorStatus,
    mounted: bool,
    /// Completions with a ticket at or below this value belong to an earlier mount.
    mount_floor: RequestTicket,
    last_applied: Option<RequestTicket>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh form. `last_issued` is the newest ticket handed out so far.
    pub fn mount(&mut self, last_issued: RequestTicket) {
        self.status = MotorStatus::Idle;
        self.mounted = true;
        self.mount_floor = last_issued;
        self.last_applied = None;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn status(&self) -> &MotorStatus {
        &self.status
    }

    /// Apply a finished request. Returns false if it was discarded as stale.
    pub fn apply(&mut self, completion: &RequestCompletion) -> bool {
        if !self.mounted || completion.ticket <= self.mount_floor {
            return false;
        }
        if self.last_applied.is_some_and(|last| completion.ticket < last) {
            return false;
        }
        self.status = MotorStatus::after(completion);
        self.last_applied = Some(completion.ticket);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{MoveKind, MovePayload};
    use chrono::Local;

    fn completion(ticket: u64, request: MotorRequest, result: Result<Reply, String>) -> RequestCompletion {
        RequestCompletion {
            ticket: RequestTicket(ticket),
            request,
            result,
            finished_at: Local::now(),
        }
    }

    fn abs_move() -> MotorRequest {
        MotorRequest::Move {
            kind: MoveKind::Absolute,
            payload: MovePayload {
                position: "100".into(),
                speed: "50".into(),
            },
        }
    }

    fn accepted() -> Result<Reply, String> {
        Ok(Reply::Accepted { message: None })
    }

    fn mounted_board() -> StatusBoard {
        let mut board = StatusBoard::new();
        board.mount(RequestTicket(0));
        board
    }

    #[test]
    fn test_from_reported() {
        assert_eq!(MotorStatus::from_reported("idle"), MotorStatus::Idle);
        assert_eq!(MotorStatus::from_reported("stopped"), MotorStatus::Stopped);
        assert_eq!(MotorStatus::from_reported("done"), MotorStatus::Reported("done".into()));
        assert_eq!(MotorStatus::from_reported("fault: 0x5").as_str(), "fault: 0x5");
        assert_eq!(MotorStatus::from_reported("").as_str(), "");
    }

    #[test]
    fn test_successful_actions() {
        let mut board = mounted_board();
        assert!(board.apply(&completion(1, abs_move(), accepted())));
        assert_eq!(board.status(), &MotorStatus::Moving);
        assert!(board.apply(&completion(2, MotorRequest::QuickStop, accepted())));
        assert_eq!(board.status(), &MotorStatus::Stopped);
    }

    #[test]
    fn test_failures_read_error() {
        let mut board = mounted_board();
        assert!(board.apply(&completion(1, abs_move(), Err("HTTP 500".into()))));
        assert_eq!(board.status(), &MotorStatus::Error);

        let mut board = mounted_board();
        assert!(board.apply(&completion(1, MotorRequest::PollStatus, Err("refused".into()))));
        assert_eq!(board.status().to_string(), "error");
    }

    #[test]
    fn test_poll_status_is_verbatim() {
        let mut board = mounted_board();
        assert!(board.apply(&completion(1, MotorRequest::PollStatus, Ok(Reply::Status("idle".into())))));
        assert_eq!(board.status(), &MotorStatus::Idle);
        assert!(board.apply(&completion(2, MotorRequest::PollStatus, Ok(Reply::Status("done".into())))));
        assert_eq!(board.status().as_str(), "done");
    }

    #[test]
    fn test_late_poll_does_not_overwrite_newer_stop() {
        let mut board = mounted_board();
        // Poll #1 went out before the stop click (#2) but answered after it
        assert!(board.apply(&completion(2, MotorRequest::QuickStop, accepted())));
        assert!(!board.apply(&completion(1, MotorRequest::PollStatus, Ok(Reply::Status("moving".into())))));
        assert_eq!(board.status(), &MotorStatus::Stopped);

        // A poll issued after the stop still reflects the service
        assert!(board.apply(&completion(3, MotorRequest::PollStatus, Ok(Reply::Status("idle".into())))));
        assert_eq!(board.status(), &MotorStatus::Idle);
    }

    #[test]
    fn test_ignored_while_unmounted() {
        let mut board = StatusBoard::new();
        assert!(!board.apply(&completion(1, abs_move(), accepted())));

        let mut board = mounted_board();
        board.unmount();
        assert!(!board.apply(&completion(1, abs_move(), accepted())));
        assert_eq!(board.status(), &MotorStatus::Idle);
    }

    #[test]
    fn test_remount_drops_earlier_requests() {
        let mut board = mounted_board();
        assert!(board.apply(&completion(3, abs_move(), accepted())));
        board.unmount();
        board.mount(RequestTicket(5));
        assert_eq!(board.status(), &MotorStatus::Idle);

        // Issued during the previous mount, finished after the new one
        assert!(!board.apply(&completion(4, MotorRequest::QuickStop, accepted())));
        assert!(board.apply(&completion(6, MotorRequest::QuickStop, accepted())));
        assert_eq!(board.status(), &MotorStatus::Stopped);
    }
}
