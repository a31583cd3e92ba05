use crate::skin_error::SkinError;

/// Wraps `time` into `[0, duration)`. Non-finite time restarts the clip, as
/// does a duration that is not finite and positive.
#[must_use]
pub fn wrap(time: f32, duration: f32) -> f32 {
    if !time.is_finite() || !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    if (0.0..duration).contains(&time) {
        return time;
    }
    let t = time.rem_euclid(duration);
    // Rounding can give exactly `duration` for tiny negative input
    if t >= duration {
        0.0
    } else {
        t
    }
}

/// Looping playback position within one clip
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    time: f32,
    duration: f32,
    scalar: f32,
}

impl AnimationClock {
    /// # Errors
    /// Returns `SkinError::InvalidDuration` unless `duration` is finite and
    /// positive
    pub fn new(duration: f32, scalar: f32) -> Result<Self, SkinError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SkinError::InvalidDuration(duration));
        }
        Ok(Self {
            time: 0.0,
            duration,
            scalar,
        })
    }

    /// Moves the clock on by `scalar * delta` and returns the wrapped time
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.time = wrap(self.time + self.scalar * delta, self.duration);
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = wrap(time, self.duration);
    }

    pub fn set_scalar(&mut self, scalar: f32) {
        self.scalar = scalar;
    }

    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub const fn scalar(&self) -> f32 {
        self.scalar
    }
}
