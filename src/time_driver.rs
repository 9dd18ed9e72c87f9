//! Wall-clock time driver for embassy-time on the host.
//!
//! Ticks count real time since the first use of the driver. Wakers are kept in
//! a deadline-ordered queue and woken by a dedicated scheduler thread, which is
//! what lets `Timer::at` in the control task sleep until the next status poll.

use core::task::Waker;
use embassy_time_driver::{Driver, TICK_HZ, time_driver_impl};
use std::collections::BTreeMap;
use std::sync::{Condvar, Mutex, OnceLock};
use std::time::{Duration, Instant as StdInstant};

#[derive(Default)]
struct SchedulerState {
    // Map of tick deadline -> wakers due at that tick
    queue: BTreeMap<u64, Vec<Waker>>,
}

static ORIGIN: OnceLock<StdInstant> = OnceLock::new();
static SCHED: OnceLock<Mutex<SchedulerState>> = OnceLock::new();
static CV: OnceLock<Condvar> = OnceLock::new();
static SCHEDULER_STARTED: OnceLock<()> = OnceLock::new();

fn origin() -> StdInstant {
    *ORIGIN.get_or_init(StdInstant::now)
}

fn sched() -> &'static Mutex<SchedulerState> {
    SCHED.get_or_init(|| Mutex::new(SchedulerState::default()))
}

fn cv() -> &'static Condvar {
    CV.get_or_init(Condvar::new)
}

fn tick_hz() -> u64 {
    TICK_HZ as u64
}

/// Convert a host instant to driver ticks.
fn real_to_ticks(r: StdInstant) -> u64 {
    let dt = r.saturating_duration_since(origin());
    let ticks = dt.as_nanos() * tick_hz() as u128 / 1_000_000_000u128;
    ticks.min(u64::MAX as u128) as u64
}

/// Convert driver ticks to a host instant.
///
/// Deadlines too far in the future to represent are clamped to one day ahead,
/// which the scheduler simply re-evaluates later.
fn ticks_to_real(ticks: u64) -> StdInstant {
    let ns = (ticks as u128) * 1_000_000_000u128 / (tick_hz() as u128);
    let ns = ns.min(u64::MAX as u128) as u64;
    origin()
        .checked_add(Duration::from_nanos(ns))
        .unwrap_or_else(|| StdInstant::now() + Duration::from_secs(24 * 60 * 60))
}

fn ensure_scheduler_thread() {
    SCHEDULER_STARTED.get_or_init(|| {
        if let Err(e) = std::thread::Builder::new()
            .name("embassy-time-scheduler".into())
            .spawn(scheduler_thread)
        {
            log::error!("Failed to start embassy-time scheduler thread: {}", e);
        }
    });
}

fn lock_sched() -> std::sync::MutexGuard<'static, SchedulerState> {
    // A panicking waker must not take timekeeping down with it
    sched().lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn scheduler_thread() {
    loop {
        let mut guard = lock_sched();

        let Some(next_at) = guard.queue.keys().next().copied() else {
            drop(cv().wait(guard).unwrap_or_else(|poisoned| poisoned.into_inner()));
            continue;
        };

        let now = StdInstant::now();
        let target = ticks_to_real(next_at);
        if target > now {
            drop(cv().wait_timeout(guard, target - now).unwrap_or_else(|poisoned| poisoned.into_inner()));
            continue;
        }

        let now_ticks = real_to_ticks(now);
        let pending = guard.queue.split_off(&(now_ticks.saturating_add(1)));
        let due = std::mem::replace(&mut guard.queue, pending);
        drop(guard);

        // Wake outside the lock
        for waker in due.into_values().flatten() {
            waker.wake();
        }
    }
}

struct WallClockDriver;

impl Driver for WallClockDriver {
    fn now(&self) -> u64 {
        real_to_ticks(StdInstant::now())
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        ensure_scheduler_thread();
        let mut guard = lock_sched();
        let wakers = guard.queue.entry(at).or_default();
        if !wakers.iter().any(|w| w.will_wake(waker)) {
            wakers.push(waker.clone());
        }
        drop(guard);
        cv().notify_all();
    }
}

// Register as the global time driver for embassy-time
time_driver_impl!(static DRIVER: WallClockDriver = WallClockDriver);
