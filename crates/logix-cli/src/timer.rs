//! Wall-clock timing of compile phases.

use std::time::{Duration, Instant};

use logix_log::debug;

/// Accumulates time spent in named phases.
///
/// Starting a phase that already ran adds to its total, so per-file work
/// (`load`, `parse`) sums up across the session.
#[derive(Debug, Default)]
pub struct PhaseTimer {
    phases: Vec<(&'static str, Duration)>,
    running: Option<(&'static str, Instant)>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing `name`, ending the running phase first.
    pub fn start(&mut self, name: &'static str) {
        self.end();
        self.running = Some((name, Instant::now()));
    }

    /// Ends the running phase and returns how long this run of it took.
    pub fn end(&mut self) -> Option<Duration> {
        let (name, started) = self.running.take()?;
        let elapsed = started.elapsed();
        match self.phases.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += elapsed,
            None => self.phases.push((name, elapsed)),
        }
        Some(elapsed)
    }

    /// Finished phases in the order they first ran.
    pub fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    pub fn total(&self) -> Duration {
        self.phases.iter().map(|(_, d)| *d).sum()
    }

    /// Logs every phase and the total at `Debug` level.
    pub fn report(&self) {
        for (name, duration) in self.phases() {
            debug!("{name:<10} {duration:?}");
        }
        debug!("{:<10} {:?}", "total", self.total());
    }
}
