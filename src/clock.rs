/// Longest frame step fed to the simulation, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.033;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DELTA]`.
    pub delta: f32,
}

/// Frame clock fed with millisecond timestamps (`performance.now()`).
#[derive(Clone, Debug)]
pub struct Clock {
    start_ms: f64,
    last_ms: f64,
}

impl Clock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            start_ms: now_ms,
            last_ms: now_ms,
        }
    }

    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let delta = ((now_ms - self.last_ms) / 1000.0) as f32;
        self.last_ms = self.last_ms.max(now_ms);
        FrameTime {
            elapsed: ((self.last_ms - self.start_ms) / 1000.0) as f32,
            delta: delta.clamp(0.0, MAX_FRAME_DELTA),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_pauses_are_clamped() {
        let mut clock = Clock::new(1000.0);
        let frame = clock.tick(3000.0);
        assert_eq!(frame.delta, MAX_FRAME_DELTA);
        assert!((frame.elapsed - 2.0).abs() < 1e-6);
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut clock = Clock::new(0.0);
        clock.tick(16.0);
        let frame = clock.tick(10.0);
        assert_eq!(frame.delta, 0.0);
        assert!((frame.elapsed - 0.016).abs() < 1e-6);
    }
}
