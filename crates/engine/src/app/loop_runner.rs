use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::metrics::TickMetricsAccumulator;

pub const MIN_TICK_DELTA: Duration = Duration::from_nanos(1_000_000_000 / 90);
pub const MAX_TICK_DELTA: Duration = Duration::from_nanos(1_000_000_000 / 30);

/// Per-tick timing handed to every system. `elapsed` only ever accumulates clamped deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTime {
    delta: Duration,
    elapsed: Duration,
}

impl GameTime {
    pub fn new(delta: Duration, elapsed: Duration) -> Self {
        Self { delta, elapsed }
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

pub trait Updatable {
    fn update(&mut self, time: &GameTime);
}

impl<T: Updatable + ?Sized> Updatable for &mut T {
    fn update(&mut self, time: &GameTime) {
        (**self).update(time);
    }
}

pub trait LoopClock {
    fn now(&self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl LoopClock for SystemClock {
    fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub min_delta: Duration,
    pub max_delta: Duration,
    pub run_for: Option<Duration>,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            min_delta: MIN_TICK_DELTA,
            max_delta: MAX_TICK_DELTA,
            run_for: None,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExitReason {
    Cancelled,
    RunForElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub skipped_samples: u64,
    pub clamped_ticks: u64,
    pub elapsed: Duration,
    pub exit_reason: LoopExitReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPlan {
    Wait(Duration),
    Run { delta: Duration, clamped: bool },
}

pub fn plan_tick(raw_dt: Duration, min_delta: Duration, max_delta: Duration) -> TickPlan {
    if raw_dt < min_delta {
        return TickPlan::Wait(min_delta - raw_dt);
    }
    if raw_dt > max_delta {
        return TickPlan::Run {
            delta: max_delta,
            clamped: true,
        };
    }
    TickPlan::Run {
        delta: raw_dt,
        clamped: false,
    }
}

/// Runs its systems in registration order. Systems may borrow state that outlives the
/// scheduler, so the caller gets it back once `run` returns.
pub struct Scheduler<'a> {
    config: LoopConfig,
    systems: Vec<Box<dyn Updatable + 'a>>,
}

impl<'a> Scheduler<'a> {
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            systems: Vec::new(),
        }
    }

    pub fn add_system(&mut self, system: Box<dyn Updatable + 'a>) {
        self.systems.push(system);
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn run(&mut self, cancel: &CancelToken) -> LoopSummary {
        let mut clock = SystemClock::default();
        self.run_with_clock(&mut clock, cancel)
    }

    pub fn run_with_clock(
        &mut self,
        clock: &mut dyn LoopClock,
        cancel: &CancelToken,
    ) -> LoopSummary {
        let min_delta = self.config.min_delta;
        let max_delta = self.config.max_delta.max(min_delta);
        info!(
            min_delta_ms = min_delta.as_secs_f64() * 1000.0,
            max_delta_ms = max_delta.as_secs_f64() * 1000.0,
            run_for_ms = self.config.run_for.map(|limit| limit.as_millis() as u64),
            systems = self.systems.len(),
            "loop_config"
        );

        let mut metrics =
            TickMetricsAccumulator::new(clock.now(), self.config.metrics_log_interval);
        let mut last_sample = clock.now();
        let mut elapsed = Duration::ZERO;
        let mut ticks = 0u64;
        let mut skipped_samples = 0u64;
        let mut clamped_ticks = 0u64;

        let exit_reason = loop {
            if cancel.is_cancelled() {
                break LoopExitReason::Cancelled;
            }

            let now = clock.now();
            let raw_dt = now.saturating_sub(last_sample);
            let (delta, clamped) = match plan_tick(raw_dt, min_delta, max_delta) {
                TickPlan::Wait(remaining) => {
                    skipped_samples = skipped_samples.saturating_add(1);
                    clock.sleep(remaining);
                    continue;
                }
                TickPlan::Run { delta, clamped } => (delta, clamped),
            };
            last_sample = now;
            if clamped {
                clamped_ticks = clamped_ticks.saturating_add(1);
                debug!(raw_dt_ms = raw_dt.as_millis() as u64, "tick_delta_clamped");
            }

            elapsed = elapsed.saturating_add(delta);
            let time = GameTime::new(delta, elapsed);
            for system in &mut self.systems {
                system.update(&time);
            }
            ticks = ticks.saturating_add(1);
            metrics.record_tick(delta);
            if let Some(snapshot) = metrics.maybe_snapshot(clock.now()) {
                debug!(
                    tps = snapshot.tps,
                    avg_tick_ms = snapshot.avg_tick_ms,
                    "loop_metrics"
                );
            }

            if matches!(self.config.run_for, Some(limit) if elapsed >= limit) {
                break LoopExitReason::RunForElapsed;
            }
        };

        let summary = LoopSummary {
            ticks,
            skipped_samples,
            clamped_ticks,
            elapsed,
            exit_reason,
        };
        info!(
            ticks,
            skipped_samples,
            clamped_ticks,
            elapsed_s = elapsed.as_secs_f64(),
            reason = ?exit_reason,
            "loop_exit"
        );
        summary
    }
}
