use crate::values::Interpolatable;

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the interval used by the previous sample so that monotonic
/// playback finds the next interval in O(1).
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// A time → value keyframe sequence with linear interpolation.
///
/// `times` is non-decreasing and `values.len() == times.len()`.
/// Sampling never extrapolates: queries before the first key return the
/// first value, queries after the last key return the last value.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Creates a track from already-structured samples.
    ///
    /// Returns `None` when the arrays disagree in length or the times are
    /// not finite and non-decreasing.
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Option<Self> {
        if times.len() != values.len() || !times_are_valid(&times) {
            return None;
        }
        Some(Self { times, values })
    }

    /// Creates a track from a flat component array of `T::ARITY * times.len()` floats.
    #[must_use]
    pub fn from_flat(times: Vec<f32>, flat: &[f32]) -> Option<Self> {
        if flat.len() != T::ARITY * times.len() {
            return None;
        }
        let values = flat.chunks_exact(T::ARITY).map(T::from_components).collect();
        Self::new(times, values)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last key, or `0.0` for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples without a cursor. `None` means the track holds no data.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let mut cursor = KeyframeCursor::default();
        self.sample_with_cursor(time, &mut cursor)
    }

    /// Samples the track, reusing and updating `cursor`.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        match len {
            0 => return None,
            1 => return Some(self.values[0]),
            _ => {}
        }

        // NaN fails every comparison below; pin it to the first key.
        if time.is_nan() || time <= self.times[0] {
            cursor.last_index = 0;
            return Some(self.values[0]);
        }
        if time >= self.times[len - 1] {
            return Some(self.values[len - 1]);
        }

        // Here times[0] < time < times[len - 1], so some interval
        // (times[i], times[i + 1]] contains it.
        let index = self
            .scan_from(cursor.last_index, time)
            .unwrap_or_else(|| self.times.partition_point(|&t| t < time) - 1);
        cursor.last_index = index;

        Some(self.interpolate(index, time))
    }

    fn contains(&self, index: usize, time: f32) -> bool {
        self.times[index] < time && time <= self.times[index + 1]
    }

    /// Local search around the cached interval.
    fn scan_from(&self, start: usize, time: f32) -> Option<usize> {
        let last_interval = self.times.len() - 2;
        let start = start.min(last_interval);

        if time > self.times[start] {
            (start..=last_interval)
                .take(MAX_SCAN_OFFSET + 1)
                .find(|&i| self.contains(i, time))
        } else {
            (0..start)
                .rev()
                .take(MAX_SCAN_OFFSET)
                .find(|&i| self.contains(i, time))
        }
    }

    fn interpolate(&self, index: usize, time: f32) -> T {
        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;

        // Duplicate keys collapse onto the left value.
        let k = if dt > 0.0 { ((time - t0) / dt).clamp(0.0, 1.0) } else { 0.0 };

        T::interpolate_linear(self.values[index], self.values[index + 1], k)
    }
}

fn times_are_valid(times: &[f32]) -> bool {
    times.iter().all(|t| t.is_finite()) && times.windows(2).all(|w| w[0] <= w[1])
}
