//! Control task bridging the form and the motor service.
//!
//! Runs on the Embassy executor and coordinates:
//! - UI commands (mount, unmount, submitted requests)
//! - The periodic status poll while a form is mounted
//! - Handing each request to a detached worker thread
//!
//! Requests never wait for each other. Every request carries a ticket from
//! the shared counter and the worker reports back with that ticket, which lets
//! the form discard completions that were overtaken by a newer request.

use chrono::{DateTime, Local};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Timer};
use std::thread;

use super::client::{MotorClient, Reply};
use super::command::{MotorRequest, RequestTicket, TicketCounter};
use super::config::ControlConfig;
use super::poller::StatusPoller;
use crate::ui::{UICommand, UIRefreshState};
use crate::{UICommandQueueReceiver, UIRefreshQueueSender};

/// How long the task sleeps when no poll is scheduled before re-checking.
const IDLE_WAKE_INTERVAL: Duration = Duration::from_secs(60);

/// Result of one finished request, sent back to the UI.
#[derive(Debug, Clone)]
pub struct RequestCompletion {
    pub ticket: RequestTicket,
    pub request: MotorRequest,
    /// Reply on success, error text on failure.
    pub result: Result<Reply, String>,
    pub finished_at: DateTime<Local>,
}

/// Main control task that runs on the Embassy executor.
///
/// # Parameters
///
/// * `config` - Service location, poll interval and timeout
/// * `ui_refresh_tx` - Channel for reporting completions and alerts to the UI
/// * `ui_command_rx` - Channel for receiving UI commands
/// * `tickets` - Counter shared with the UI, used to ticket status polls
#[embassy_executor::task]
pub async fn control_task(
    config: ControlConfig,
    ui_refresh_tx: UIRefreshQueueSender,
    ui_command_rx: UICommandQueueReceiver,
    tickets: &'static TicketCounter,
) {
    log::info!("Control task started, motor service at {}", config.base_url);

    let client = match MotorClient::new(config.clone()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            let _ = ui_refresh_tx.send(UIRefreshState::Alert(e.to_string())).await;
            return;
        }
    };

    let mut poller = StatusPoller::new(Duration::from_millis(config.poll_interval_ms));

    loop {
        let deadline = poller.next_due().unwrap_or_else(|| Instant::now() + IDLE_WAKE_INTERVAL);

        match select(ui_command_rx.receive(), Timer::at(deadline)).await {
            Either::First(cmd) => match cmd {
                UICommand::Mount(variant) => {
                    log::info!("Form '{}' mounted, polling every {} ms", variant.title(), config.poll_interval_ms);
                    poller.start(Instant::now());
                }
                UICommand::Unmount => {
                    if poller.is_running() {
                        log::info!("Form unmounted, polling stopped");
                    }
                    poller.stop();
                }
                UICommand::Submit(ticket, request) => {
                    dispatch(&client, ticket, request, ui_refresh_tx);
                }
            },
            Either::Second(()) => {
                if poller.fire(Instant::now()) {
                    dispatch(&client, tickets.next(), MotorRequest::PollStatus, ui_refresh_tx);
                }
            }
        }
    }
}

/// Run a request on a detached worker thread and report the outcome.
fn dispatch(client: &MotorClient, ticket: RequestTicket, request: MotorRequest, ui_refresh_tx: UIRefreshQueueSender) {
    let worker_client = client.clone();
    let worker_request = request.clone();
    let spawned = thread::Builder::new()
        .name(format!("motor-request-{}", ticket.0))
        .spawn(move || {
            let result = worker_client.send(&worker_request).map_err(|e| e.to_string());
            report(ui_refresh_tx, ticket, worker_request, result);
        });

    if let Err(e) = spawned {
        log::error!("Failed to spawn worker for {}: {}", request.describe(), e);
        report(ui_refresh_tx, ticket, request, Err(format!("Failed to start request: {}", e)));
    }
}

fn report(ui_refresh_tx: UIRefreshQueueSender, ticket: RequestTicket, request: MotorRequest, result: Result<Reply, String>) {
    if let Err(e) = &result {
        log::warn!("{} {} failed: {}", ticket, request.describe(), e);
    }
    let completion = RequestCompletion {
        ticket,
        request,
        result,
        finished_at: Local::now(),
    };
    if ui_refresh_tx.try_send(UIRefreshState::RequestCompleted(completion)).is_err() {
        log::warn!("UI refresh queue full, dropping completion {}", ticket);
    }
}
