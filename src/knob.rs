//! Knob channels and exponential smoothing.

/// Blends a raw reading with the previous smoothed value.
///
/// Computes `raw + factor * (previous - raw)` and truncates toward zero. The
/// result always lies between `raw` and `previous` inclusive; a factor of 0
/// returns `raw`, a factor of 1 returns `previous`.
#[inline]
pub fn smooth(previous: u16, raw: u16, factor: f32) -> u16 {
    let raw_f = raw as f32;
    (raw_f + factor * (previous as f32 - raw_f)) as u16
}

/// One analog knob: its expander pin plus the last two smoothed readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnobChannel {
    pin: u8,
    value: u16,
    previous: u16,
}

impl KnobChannel {
    /// Creates a channel reading zero.
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            value: 0,
            previous: 0,
        }
    }

    /// Folds a raw reading into the channel and returns the new value.
    ///
    /// The value before this update becomes `previous`.
    pub fn update(&mut self, raw: u16, factor: f32) -> u16 {
        self.previous = self.value;
        self.value = smooth(self.previous, raw, factor);
        self.value
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Latest smoothed value.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Smoothed value before the latest update.
    pub fn previous(&self) -> u16 {
        self.previous
    }

    /// True when the latest update changed the smoothed value.
    pub fn moved(&self) -> bool {
        self.value != self.previous
    }

    /// LED wheel position for this knob: the 10-bit reading scaled to a byte.
    ///
    /// Readings above 1023 wrap around the wheel.
    pub fn wheel_position(&self) -> u8 {
        (self.value / 4) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_shifts_previous() {
        let mut knob = KnobChannel::new(7);
        assert_eq!(knob.update(100, 0.5), 50);
        assert_eq!(knob.previous(), 0);
        assert_eq!(knob.update(100, 0.5), 75);
        assert_eq!(knob.previous(), 50);
        assert!(knob.moved());
    }

    #[test]
    fn smoothed_value_stays_between_raw_and_previous() {
        let values = [0u16, 1, 100, 512, 1023, 40000, 65535];
        let factors = [0.0f32, 0.1, 0.3, 0.5, 0.999, 1.0];

        for &previous in &values {
            for &raw in &values {
                for &factor in &factors {
                    let result = smooth(previous, raw, factor);
                    assert!(
                        result >= previous.min(raw) && result <= previous.max(raw),
                        "smooth({}, {}, {}) = {}",
                        previous,
                        raw,
                        factor,
                        result
                    );
                }
                assert_eq!(smooth(previous, raw, 0.0), raw);
                assert_eq!(smooth(previous, raw, 1.0), previous);
            }
        }
    }

    #[test]
    fn falling_reading_truncates_toward_zero() {
        // 100 + 0.5 * (301 - 100) = 200.5
        assert_eq!(smooth(301, 100, 0.5), 200);
        let mut knob = KnobChannel::new(0);
        knob.update(1000, 0.0);
        assert_eq!(knob.update(0, 0.5), 500);
        assert_eq!(knob.previous(), 1000);
    }

    #[test]
    fn full_scale_reading_maps_to_last_wheel_position() {
        let mut knob = KnobChannel::new(0);
        knob.update(1023, 0.0);
        assert_eq!(knob.wheel_position(), 255);
    }
}
