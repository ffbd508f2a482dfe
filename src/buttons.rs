//! Active-low button bitfields and edge detection.
//!
//! A bulk read yields one bit per expander pin. Buttons pull their pin low
//! when pressed, so a clear bit means pressed. Bits are only ever inspected
//! through the predicates below.

/// Returns true when the button on `pin` reads pressed in `bits`.
///
/// Pins beyond the bitfield never read pressed.
#[inline]
pub fn is_pressed(bits: u32, pin: u8) -> bool {
    match 1u32.checked_shl(pin as u32) {
        Some(bit) => bits & bit == 0,
        None => false,
    }
}

/// Returns true when the button on `pin` went down between the two snapshots.
#[inline]
pub fn just_pressed(current: u32, previous: u32, pin: u8) -> bool {
    let pressed = is_pressed(current, pin);
    pressed && pressed != is_pressed(previous, pin)
}

/// Returns true when the button on `pin` came up between the two snapshots.
#[inline]
pub fn just_released(current: u32, previous: u32, pin: u8) -> bool {
    let pressed = is_pressed(current, pin);
    !pressed && pressed != is_pressed(previous, pin)
}

/// Current and previous raw snapshots of the button pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonBank {
    current: u32,
    previous: u32,
}

impl ButtonBank {
    /// Creates a bank with every button released.
    pub const fn new() -> Self {
        Self {
            current: u32::MAX,
            previous: u32::MAX,
        }
    }

    /// Stores a fresh bulk read, keeping the prior one as `previous`.
    pub fn update(&mut self, raw: u32) {
        self.previous = self.current;
        self.current = raw;
    }

    pub fn is_pressed(&self, pin: u8) -> bool {
        is_pressed(self.current, pin)
    }

    pub fn was_pressed(&self, pin: u8) -> bool {
        is_pressed(self.previous, pin)
    }

    pub fn just_pressed(&self, pin: u8) -> bool {
        just_pressed(self.current, self.previous, pin)
    }

    pub fn just_released(&self, pin: u8) -> bool {
        just_released(self.current, self.previous, pin)
    }
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self::new()
    }
}
