use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous frame began, clamped.
    pub dt: Duration,

    /// Monotonic timestamp taken when this frame began.
    pub begin: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}

/// Per-window frame clock.
///
/// `begin_frame` marks the start of a frame and yields the delta to the
/// previous start; `frame_duration` measures how long the current frame has
/// taken so far. Deltas are clamped so that stalls (debugger, minimized
/// window) do not produce huge steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_begin: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last_begin: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        self.last_begin = Instant::now();
    }

    pub fn begin_frame(&mut self) -> FrameTime {
        self.begin_frame_at(Instant::now())
    }

    fn begin_frame_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last_begin)
            .clamp(self.dt_min, self.dt_max);

        self.last_begin = now;
        let time = FrameTime { dt, begin: now, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }

    /// Time since the current frame began.
    pub fn frame_duration(&self) -> Duration {
        self.last_begin.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
