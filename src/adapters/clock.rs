//! Wall-clock pacing between units

use std::time::Duration;

use log::info;

use crate::core::ports::Pacer;

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, delay: Duration) {
        info!("Waiting {}s before next unit", delay.as_secs());
        std::thread::sleep(delay);
    }
}
