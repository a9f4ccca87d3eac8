// Fixed-interval gate for frame advances.

/// Fires at most once per `delta` seconds of world time.
///
/// Time is fed in step by step with [`advance`](Self::advance), using
/// [`WorldTime::delta`](crate::resources::worldtime::WorldTime), and
/// accumulated since the last fire or restart. A step of exactly `delta`
/// seconds always fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimer {
    pub delta: f32,
    pub elapsed: f32,
}

impl FrameTimer {
    pub fn new(delta: f32) -> Self {
        FrameTimer {
            delta,
            elapsed: 0.0,
        }
    }

    /// Interval for a frame rate. Zero never fires.
    pub fn interval_for_fps(fps: f32) -> f32 {
        if fps == 0.0 {
            f32::INFINITY
        } else {
            1.0 / fps.abs()
        }
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.delta = Self::interval_for_fps(fps);
    }

    /// Add one step's worth of time.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// True once the interval has elapsed since the last reset; resets the
    /// clock when it fires.
    pub fn done(&mut self) -> bool {
        if self.elapsed >= self.delta {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }
}
