//! # Motor Command Panel
//!
//! Desktop client for a motor-control HTTP service. The window offers a small
//! set of command forms (absolute, relative and positioning moves plus an
//! emergency stop), sends each click as a REST call and polls `/motor_status`
//! once per second while a form is shown.
//!
//! ## Threads
//!
//! - **Main thread**: egui/eframe UI (required on macOS)
//! - **Embassy executor thread**: control task owning the poll schedule and
//!   turning UI commands into requests
//! - **Worker threads**: one short-lived thread per HTTP request
//!
//! The UI and the control task talk over two bounded embassy-sync channels.

use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::thread;

mod control;
mod time_driver;
mod ui;

use control::{ControlConfig, TicketCounter};
use ui::{AppState, UICommand, UIRefreshState};

const UI_REFRESH_QUEUE_SIZE: usize = 64;
type UIRefreshQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
pub type UIRefreshQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
pub type UIRefreshQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;

const UI_COMMAND_QUEUE_SIZE: usize = 32;
type UICommandQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;
pub type UICommandQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;
pub type UICommandQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;

fn embassy_init(
    spawner: Spawner,
    config: ControlConfig,
    ui_refresh_tx: UIRefreshQueueSender,
    ui_command_rx: UICommandQueueReceiver,
    tickets: &'static TicketCounter,
) {
    let _ = spawner.spawn(control::control_task(config, ui_refresh_tx, ui_command_rx, tickets));
}

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("motor_command_panel"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Starting up");

    let config = ControlConfig::load_or_default(&ControlConfig::config_path())?;

    // Leaked so the channels and counter live for the whole process, as the executor requires
    let ui_refresh_queue: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));
    let ui_command_queue: &'static UICommandQueue = Box::leak(Box::new(UICommandQueue::new()));
    let tickets: &'static TicketCounter = Box::leak(Box::new(TicketCounter::new()));

    let ui_refresh_tx = ui_refresh_queue.sender();
    let ui_refresh_rx = ui_refresh_queue.receiver();
    let ui_command_tx = ui_command_queue.sender();
    let ui_command_rx = ui_command_queue.receiver();

    // Spawn Embassy executor on a dedicated background thread
    let task_config = config.clone();
    thread::Builder::new()
        .name("embassy-executor".to_string())
        .spawn(move || {
            // Leak the executor to satisfy the 'static lifetime required by run()
            let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
            executor.run(|spawner| embassy_init(spawner, task_config, ui_refresh_tx, ui_command_rx, tickets));
        })?;

    // Start the GUI on the main thread (required on macOS)
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Motor Command Panel",
        native_options,
        Box::new(move |_cc| Ok(Box::new(AppState::new(ui_refresh_rx, ui_command_tx, tickets, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated with an error: {}", e))?;

    info!("Shutting down");
    Ok(())
}
