//! Incremental knob and button acquisition.
//!
//! Provides [`AcquisitionState`], which spreads a full scan of the expander
//! over many calls: each [`poll`](AcquisitionState::poll) performs exactly one
//! transaction, either reading a single knob or bulk-reading the buttons and
//! refreshing the LED feedback. This bounds the time spent per call so the
//! caller's main loop never blocks on a full scan.

use crate::COLOR_OFF;
use crate::buttons::ButtonBank;
use crate::colors::{Rgb24, colorwheel};
use crate::config::Config;
use crate::hardware::Expander;
use crate::knob::KnobChannel;

/// What a single [`AcquisitionState::poll`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollEvent {
    /// One knob was read and smoothed.
    Knob {
        /// Channel index that was sampled.
        channel: usize,
        /// Its new smoothed value.
        value: u16,
    },
    /// The buttons were read and, if enabled, the LED frame was refreshed.
    /// The next poll starts a new sweep.
    Buttons,
}

/// Errors surfaced by [`AcquisitionState::poll`].
///
/// The failed quantity keeps its previous value and the sweep still advances,
/// so a faulty channel never stalls the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollError<E> {
    /// Analog conversion failed for a knob.
    AnalogRead {
        /// Channel index whose read failed.
        channel: usize,
        error: E,
    },
    /// Bulk button read failed.
    DigitalRead(E),
    /// The LED frame could not be transmitted. Buttons were updated.
    PixelWrite(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PollError::AnalogRead { channel, error } => {
                write!(f, "analog read of knob {} failed: {:?}", channel, error)
            }
            PollError::DigitalRead(error) => {
                write!(f, "bulk button read failed: {:?}", error)
            }
            PollError::PixelWrite(error) => {
                write!(f, "LED frame write failed: {:?}", error)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for PollError<E> {}

/// Channel index passed to an accessor does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// No knob with this index.
    KnobOutOfRange { index: usize, count: usize },
    /// No button with this index.
    ButtonOutOfRange { index: usize, count: usize },
}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChannelError::KnobOutOfRange { index, count } => {
                write!(f, "knob {} out of range, {} configured", index, count)
            }
            ChannelError::ButtonOutOfRange { index, count } => {
                write!(f, "button {} out of range, {} configured", index, count)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {}

/// Copy of all inputs at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot<const KNOBS: usize, const BUTTONS: usize> {
    pub knobs: [u16; KNOBS],
    pub buttons: [bool; BUTTONS],
}

/// Latest and previous readings of every knob and button, plus the cursor
/// selecting what the next poll reads.
///
/// The caller owns the state and hands it the expander on every poll, so
/// there is exactly one writer and no hidden globals.
///
/// # Type Parameters
/// * `KNOBS` - Number of analog knob channels
/// * `BUTTONS` - Number of buttons in the bulk-read bank
pub struct AcquisitionState<const KNOBS: usize, const BUTTONS: usize> {
    config: Config<KNOBS, BUTTONS>,
    knobs: [KnobChannel; KNOBS],
    buttons: ButtonBank,
    cursor: usize,
    frame: [Rgb24; KNOBS],
}

impl<const KNOBS: usize, const BUTTONS: usize> AcquisitionState<KNOBS, BUTTONS> {
    /// Creates the startup state: knobs at zero, buttons released, cursor on
    /// the first knob, LEDs dark.
    pub fn new(config: Config<KNOBS, BUTTONS>) -> Self {
        let pins = config.knob_pins();
        Self {
            knobs: core::array::from_fn(|i| KnobChannel::new(pins[i])),
            buttons: ButtonBank::new(),
            cursor: 0,
            frame: [COLOR_OFF; KNOBS],
            config,
        }
    }

    /// Advances the acquisition by one step.
    ///
    /// While the cursor points at a knob, reads and smooths that knob and
    /// moves on. Once every knob has been read, bulk-reads the buttons,
    /// refreshes the LED frame and wraps the cursor back to the first knob.
    ///
    /// # Returns
    /// * `Ok(PollEvent)` - The step that was taken
    /// * `Err` - The transaction failed; the cursor has still advanced
    pub fn poll<E: Expander>(
        &mut self,
        expander: &mut E,
    ) -> Result<PollEvent, PollError<E::Error>> {
        if self.cursor < KNOBS {
            self.sample_next_knob(expander)
        } else {
            self.sample_buttons_and_refresh_leds(expander)
        }
    }

    fn sample_next_knob<E: Expander>(
        &mut self,
        expander: &mut E,
    ) -> Result<PollEvent, PollError<E::Error>> {
        let channel = self.cursor;
        self.cursor += 1;

        let smoothing = self.config.smoothing();
        let knob = &mut self.knobs[channel];
        let raw = match expander.analog_read(knob.pin()) {
            Ok(raw) => raw,
            Err(error) => {
                warn!("analog read failed on knob {}", channel);
                return Err(PollError::AnalogRead { channel, error });
            }
        };

        let value = knob.update(raw, smoothing);
        Ok(PollEvent::Knob { channel, value })
    }

    fn sample_buttons_and_refresh_leds<E: Expander>(
        &mut self,
        expander: &mut E,
    ) -> Result<PollEvent, PollError<E::Error>> {
        self.cursor = 0;

        let raw = expander
            .digital_read_bulk(self.config.button_mask())
            .map_err(|error| {
                warn!("bulk button read failed");
                PollError::DigitalRead(error)
            })?;
        self.buttons.update(raw);
        trace!("sweep complete, buttons={=u32:b}", raw);

        if self.config.led_feedback() {
            for (color, knob) in self.frame.iter_mut().zip(self.knobs.iter()) {
                *color = colorwheel(knob.wheel_position());
            }
            expander.push_frame(&self.frame).map_err(|error| {
                warn!("LED frame write failed");
                PollError::PixelWrite(error)
            })?;
        }

        Ok(PollEvent::Buttons)
    }

    /// Latest smoothed value of a knob.
    pub fn knob_value(&self, channel: usize) -> Result<u16, ChannelError> {
        Ok(self.knob(channel)?.value())
    }

    /// Smoothed value of a knob before its latest update.
    pub fn previous_knob_value(&self, channel: usize) -> Result<u16, ChannelError> {
        Ok(self.knob(channel)?.previous())
    }

    /// True when the latest read of a knob changed its smoothed value.
    pub fn knob_moved(&self, channel: usize) -> Result<bool, ChannelError> {
        Ok(self.knob(channel)?.moved())
    }

    /// True while the button is held down, as of the latest button sweep.
    pub fn is_pressed(&self, button: usize) -> Result<bool, ChannelError> {
        let pin = self.button_pin(button)?;
        Ok(self.buttons.is_pressed(pin))
    }

    /// True when the button was held down in the sweep before the latest one.
    pub fn was_pressed(&self, button: usize) -> Result<bool, ChannelError> {
        let pin = self.button_pin(button)?;
        Ok(self.buttons.was_pressed(pin))
    }

    /// True when the button went down between the last two button sweeps.
    pub fn just_pressed(&self, button: usize) -> Result<bool, ChannelError> {
        let pin = self.button_pin(button)?;
        Ok(self.buttons.just_pressed(pin))
    }

    /// True when the button came up between the last two button sweeps.
    pub fn just_released(&self, button: usize) -> Result<bool, ChannelError> {
        let pin = self.button_pin(button)?;
        Ok(self.buttons.just_released(pin))
    }

    /// Index of the knob the next poll reads; equal to `KNOBS` when the next
    /// poll reads the buttons.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// LED colors pushed by the latest button sweep.
    pub fn led_frame(&self) -> &[Rgb24; KNOBS] {
        &self.frame
    }

    pub fn config(&self) -> &Config<KNOBS, BUTTONS> {
        &self.config
    }

    /// Returns every knob value and button state at once.
    pub fn snapshot(&self) -> Snapshot<KNOBS, BUTTONS> {
        let pins = self.config.button_pins();
        Snapshot {
            knobs: core::array::from_fn(|i| self.knobs[i].value()),
            buttons: core::array::from_fn(|i| self.buttons.is_pressed(pins[i])),
        }
    }

    fn knob(&self, channel: usize) -> Result<&KnobChannel, ChannelError> {
        self.knobs.get(channel).ok_or(ChannelError::KnobOutOfRange {
            index: channel,
            count: KNOBS,
        })
    }

    fn button_pin(&self, button: usize) -> Result<u8, ChannelError> {
        self.config
            .button_pins()
            .get(button)
            .copied()
            .ok_or(ChannelError::ButtonOutOfRange {
                index: button,
                count: BUTTONS,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    // Expander that answers every read with a fixed value and counts calls.
    struct FixedExpander {
        analog: u16,
        buttons: u32,
        analog_reads: usize,
        bulk_reads: usize,
        frames: usize,
    }

    impl FixedExpander {
        fn new(analog: u16, buttons: u32) -> Self {
            Self {
                analog,
                buttons,
                analog_reads: 0,
                bulk_reads: 0,
                frames: 0,
            }
        }
    }

    impl Expander for FixedExpander {
        type Error = ();

        fn analog_read(&mut self, _pin: u8) -> Result<u16, ()> {
            self.analog_reads += 1;
            Ok(self.analog)
        }

        fn digital_read_bulk(&mut self, mask: u32) -> Result<u32, ()> {
            self.bulk_reads += 1;
            Ok(self.buttons & mask)
        }

        fn push_frame(&mut self, _frame: &[Rgb24]) -> Result<(), ()> {
            self.frames += 1;
            Ok(())
        }
    }

    #[test]
    fn cursor_wraps_after_button_sweep() {
        let config = Config::new([0, 1, 2], [4], 0.0).unwrap();
        let mut state = AcquisitionState::new(config);
        let mut expander = FixedExpander::new(10, u32::MAX);

        for expected in 1..=3 {
            state.poll(&mut expander).unwrap();
            assert_eq!(state.cursor(), expected);
        }
        assert_eq!(state.poll(&mut expander), Ok(PollEvent::Buttons));
        assert_eq!(state.cursor(), 0);
        assert_eq!(expander.analog_reads, 3);
        assert_eq!(expander.bulk_reads, 1);
        assert_eq!(expander.frames, 1);
    }

    #[test]
    fn disabled_feedback_skips_frame() {
        let config = Config::new([0], [4], 0.0).unwrap().with_led_feedback(false);
        let mut state = AcquisitionState::new(config);
        let mut expander = FixedExpander::new(10, u32::MAX);

        state.poll(&mut expander).unwrap();
        state.poll(&mut expander).unwrap();
        assert_eq!(expander.bulk_reads, 1);
        assert_eq!(expander.frames, 0);
    }

    #[test]
    fn accessors_reject_unknown_channels() {
        let state = AcquisitionState::new(Config::seeknobs());
        assert_eq!(
            state.knob_value(8),
            Err(ChannelError::KnobOutOfRange { index: 8, count: 8 })
        );
        assert_eq!(
            state.just_pressed(4),
            Err(ChannelError::ButtonOutOfRange { index: 4, count: 4 })
        );
    }
}
