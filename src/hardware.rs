//! Hardware abstraction for the input expander.

use crate::colors::Rgb24;

/// Trait for abstracting a seesaw-style expander: analog inputs, a bank of
/// digital inputs readable in one transaction, and an attached LED strip.
///
/// Implement this for your hardware (or use [`crate::seesaw::Seesaw`]) to let
/// [`crate::AcquisitionState::poll`] drive it. Each method is one bus
/// transaction from the caller's point of view.
pub trait Expander {
    /// Error reported by a failed transaction.
    type Error;

    /// Performs a single analog conversion on the given expander pin.
    fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error>;

    /// Reads every digital pin selected by `mask` at once.
    ///
    /// Bit `n` of the result mirrors the level of pin `n`: set when the pin
    /// is high. Buttons are wired active-low, so a set bit means released.
    fn digital_read_bulk(&mut self, mask: u32) -> Result<u32, Self::Error>;

    /// Transmits a complete frame of pixel colors and latches it.
    fn push_frame(&mut self, frame: &[Rgb24]) -> Result<(), Self::Error>;
}

impl<E: Expander + ?Sized> Expander for &mut E {
    type Error = E::Error;

    fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error> {
        (**self).analog_read(pin)
    }

    fn digital_read_bulk(&mut self, mask: u32) -> Result<u32, Self::Error> {
        (**self).digital_read_bulk(mask)
    }

    fn push_frame(&mut self, frame: &[Rgb24]) -> Result<(), Self::Error> {
        (**self).push_frame(frame)
    }
}
