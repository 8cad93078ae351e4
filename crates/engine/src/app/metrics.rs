use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct LoopMetricsSnapshot {
    pub(crate) tps: f32,
    pub(crate) avg_tick_ms: f32,
}

#[derive(Debug)]
pub(crate) struct TickMetricsAccumulator {
    interval_start: Duration,
    interval: Duration,
    ticks: u32,
    tick_delta_sum: Duration,
}

impl TickMetricsAccumulator {
    pub(crate) fn new(now: Duration, interval: Duration) -> Self {
        Self {
            interval_start: now,
            interval: if interval.is_zero() {
                Duration::from_secs(1)
            } else {
                interval
            },
            ticks: 0,
            tick_delta_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_tick(&mut self, delta: Duration) {
        self.ticks = self.ticks.saturating_add(1);
        self.tick_delta_sum = self.tick_delta_sum.saturating_add(delta);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Duration) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_sub(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let avg_tick_ms = if self.ticks == 0 {
            0.0
        } else {
            (self.tick_delta_sum.as_secs_f32() / self.ticks as f32) * 1000.0
        };

        let snapshot = LoopMetricsSnapshot {
            tps: self.ticks as f32 / elapsed_seconds,
            avg_tick_ms,
        };

        self.interval_start = now;
        self.ticks = 0;
        self.tick_delta_sum = Duration::ZERO;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_computes_expected_values() {
        let mut accumulator = TickMetricsAccumulator::new(Duration::ZERO, Duration::from_secs(1));

        for _ in 0..4 {
            accumulator.record_tick(Duration::from_millis(16));
        }

        let snapshot = accumulator
            .maybe_snapshot(Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.tps - 4.0).abs() < 0.05);
        assert!((snapshot.avg_tick_ms - 16.0).abs() < 0.001);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let mut accumulator = TickMetricsAccumulator::new(Duration::ZERO, Duration::from_secs(1));
        accumulator.record_tick(Duration::from_millis(16));

        assert!(accumulator
            .maybe_snapshot(Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn snapshot_resets_interval_counters() {
        let mut accumulator = TickMetricsAccumulator::new(Duration::ZERO, Duration::from_secs(1));
        accumulator.record_tick(Duration::from_millis(20));
        let _ = accumulator.maybe_snapshot(Duration::from_secs(1));

        let next = accumulator
            .maybe_snapshot(Duration::from_secs(2))
            .expect("second snapshot");
        assert_eq!(next.tps, 0.0);
        assert_eq!(next.avg_tick_ms, 0.0);
    }
}
