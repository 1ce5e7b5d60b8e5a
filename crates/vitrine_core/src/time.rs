use std::time::Instant;

/// Step rate used when a requested rate is unusable.
pub const DEFAULT_FPS: f32 = 60.0;

/// Longest wall-clock step handed to the animation in one frame.
pub const MAX_FRAME_DT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Constant step per frame, independent of wall-clock time.
    Fixed { step: f32 },
    /// Measured wall-clock delta, clamped to `max_dt`.
    Realtime { max_dt: f32 },
}

/// Produces the `dt` fed to the viewer once per frame.
///
/// ```
/// use vitrine_core::FrameClock;
///
/// let mut clock = FrameClock::fixed_rate(30.0);
/// assert!((clock.tick() - 1.0 / 30.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    last_tick: Option<Instant>,
    elapsed: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Steps by `1 / fps` each frame. Non-finite or non-positive rates use
    /// [`DEFAULT_FPS`].
    #[must_use]
    pub fn fixed_rate(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            log::warn!("Invalid frame rate {fps}, using {DEFAULT_FPS}");
            DEFAULT_FPS
        };
        Self::with_mode(ClockMode::Fixed { step: 1.0 / fps })
    }

    /// Follows wall-clock time. The first tick yields zero.
    #[must_use]
    pub fn realtime() -> Self {
        Self::with_mode(ClockMode::Realtime {
            max_dt: MAX_FRAME_DT,
        })
    }

    fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            last_tick: None,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Seconds handed out so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Advances one frame and returns its step in seconds.
    pub fn tick(&mut self) -> f32 {
        let dt = match self.mode {
            ClockMode::Fixed { step } => step,
            ClockMode::Realtime { max_dt } => {
                let now = Instant::now();
                let measured = self
                    .last_tick
                    .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
                self.last_tick = Some(now);
                measured.min(max_dt)
            }
        };

        self.elapsed += dt;
        self.frame_count += 1;
        dt
    }
}
