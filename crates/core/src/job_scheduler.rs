use crate::reminders::SendAppointmentRemindersUseCase;
use crate::shared::usecase::execute;
use randevu_reminders_infra::RandevuContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, sleep};
use tracing::warn;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Flips the single flight guard to running. Returns false when a cycle
/// already holds it.
fn try_begin_cycle(running: &AtomicBool) -> bool {
    running
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
}

pub fn start_send_reminders_job(ctx: RandevuContext) {
    tokio::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        sleep(Duration::from_secs(secs_to_next_run as u64)).await;

        let mut minutely_interval =
            interval(Duration::from_secs(ctx.config.reminder_interval_secs));
        // Two overlapping cycles could both see an appointment under the
        // reminder cap and double dispatch, so a tick that fires while the
        // previous cycle is still running is dropped.
        let running = Arc::new(AtomicBool::new(false));
        loop {
            minutely_interval.tick().await;
            if !try_begin_cycle(&running) {
                warn!("Previous reminder scan cycle is still running, skipping this tick");
                continue;
            }
            let context = ctx.clone();
            let guard = running.clone();
            tokio::spawn(async move {
                let _ = execute(SendAppointmentRemindersUseCase, &context).await;
                guard.store(false, Ordering::SeqCst);
            });
        }
    });
}
