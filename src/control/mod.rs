//! Control module for sending commands to the motor service.
//!
//! Holds the request types, the blocking HTTP client, the configuration file
//! and the executor task that issues requests and polls `/motor_status`.

pub mod client;
pub mod command;
pub mod config;
pub mod poller;
pub mod task;

pub use client::Reply;
pub use command::{MotorRequest, MoveKind, MovePayload, RequestTicket, TicketCounter};
pub use config::ControlConfig;
pub use task::{RequestCompletion, control_task};
