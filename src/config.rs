//! Fixed acquisition configuration.

/// Knob pins of the reference seeknobs board, in panel order.
pub const SEEKNOBS_KNOB_PINS: [u8; 8] = [7, 6, 3, 2, 1, 0, 19, 18];

/// Button pins of the reference seeknobs board, in panel order.
pub const SEEKNOBS_BUTTON_PINS: [u8; 4] = [5, 9, 13, 14];

/// Smoothing factor used by the reference firmware.
pub const DEFAULT_SMOOTHING: f32 = 0.3;

/// Number of pins addressable by a bulk digital read.
pub const BULK_PINS: u8 = 32;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Smoothing factor outside `[0, 1]` or not a number.
    SmoothingOutOfRange(f32),

    /// Knob pin is not an expander pin.
    KnobPinOutOfRange(u8),

    /// Button pin cannot be represented in the bulk-read bitfield.
    ButtonPinOutOfRange(u8),

    /// Two buttons share a pin.
    DuplicateButtonPin(u8),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::SmoothingOutOfRange(factor) => {
                write!(f, "smoothing factor {} is outside [0, 1]", factor)
            }
            ConfigError::KnobPinOutOfRange(pin) => {
                write!(f, "knob pin {} exceeds the {} expander pins", pin, BULK_PINS)
            }
            ConfigError::ButtonPinOutOfRange(pin) => {
                write!(f, "button pin {} exceeds the {}-bit bulk read", pin, BULK_PINS)
            }
            ConfigError::DuplicateButtonPin(pin) => {
                write!(f, "button pin {} is assigned more than once", pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Pin assignment and smoothing for `KNOBS` knobs and `BUTTONS` buttons.
///
/// Supplied once at startup and never altered by the acquisition core.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config<const KNOBS: usize, const BUTTONS: usize> {
    knob_pins: [u8; KNOBS],
    button_pins: [u8; BUTTONS],
    button_mask: u32,
    smoothing: f32,
    led_feedback: bool,
}

impl<const KNOBS: usize, const BUTTONS: usize> Config<KNOBS, BUTTONS> {
    /// Creates and validates a configuration. LED feedback is enabled.
    ///
    /// `smoothing` weighs the previous reading against the new one: 0 follows
    /// the raw value instantly, values close to 1 lag heavily.
    ///
    /// # Errors
    /// * `SmoothingOutOfRange` - `smoothing` is not within `[0, 1]`
    /// * `KnobPinOutOfRange` - A knob pin is 32 or above
    /// * `ButtonPinOutOfRange` - A button pin is 32 or above
    /// * `DuplicateButtonPin` - A button pin appears twice
    pub fn new(
        knob_pins: [u8; KNOBS],
        button_pins: [u8; BUTTONS],
        smoothing: f32,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&smoothing) {
            return Err(ConfigError::SmoothingOutOfRange(smoothing));
        }

        if let Some(&pin) = knob_pins.iter().find(|&&pin| pin >= BULK_PINS) {
            return Err(ConfigError::KnobPinOutOfRange(pin));
        }

        for (i, &pin) in button_pins.iter().enumerate() {
            if pin >= BULK_PINS {
                return Err(ConfigError::ButtonPinOutOfRange(pin));
            }
            if button_pins[..i].contains(&pin) {
                return Err(ConfigError::DuplicateButtonPin(pin));
            }
        }

        Ok(Self {
            knob_pins,
            button_pins,
            button_mask: pin_mask(&button_pins),
            smoothing,
            led_feedback: true,
        })
    }

    /// Enables or disables the per-sweep LED refresh.
    pub fn with_led_feedback(mut self, enabled: bool) -> Self {
        self.led_feedback = enabled;
        self
    }

    pub fn knob_pins(&self) -> &[u8; KNOBS] {
        &self.knob_pins
    }

    pub fn button_pins(&self) -> &[u8; BUTTONS] {
        &self.button_pins
    }

    /// Bitfield with one bit set per button pin, as passed to bulk reads.
    pub fn button_mask(&self) -> u32 {
        self.button_mask
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn led_feedback(&self) -> bool {
        self.led_feedback
    }
}

impl Config<8, 4> {
    /// Pinout of the seeknobs board: eight knobs, four buttons.
    pub fn seeknobs() -> Self {
        Self {
            knob_pins: SEEKNOBS_KNOB_PINS,
            button_pins: SEEKNOBS_BUTTON_PINS,
            button_mask: pin_mask(&SEEKNOBS_BUTTON_PINS),
            smoothing: DEFAULT_SMOOTHING,
            led_feedback: true,
        }
    }
}

/// One bit per pin. Pins must already be below [`BULK_PINS`].
const fn pin_mask(pins: &[u8]) -> u32 {
    let mut mask = 0u32;
    let mut i = 0;
    while i < pins.len() {
        mask |= 1 << pins[i];
        i += 1;
    }
    mask
}
