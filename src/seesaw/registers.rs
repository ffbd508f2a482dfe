//! Seesaw register map and protocol constants.
//!
//! Every register is addressed with two bytes: the module base, then the
//! function within that module.

// ---------------------------------------------------------------------------
// Status module
// ---------------------------------------------------------------------------

pub const STATUS_BASE: u8 = 0x00;
pub const STATUS_HW_ID: u8 = 0x01;
pub const STATUS_VERSION: u8 = 0x02;
pub const STATUS_SWRST: u8 = 0x7F;

/// Value written to `STATUS_SWRST` to trigger a reset.
pub const SWRST_MAGIC: u8 = 0xFF;

// ---------------------------------------------------------------------------
// GPIO module
// ---------------------------------------------------------------------------

pub const GPIO_BASE: u8 = 0x01;
pub const GPIO_DIRCLR_BULK: u8 = 0x03;
pub const GPIO_BULK: u8 = 0x04;
pub const GPIO_BULK_SET: u8 = 0x05;
pub const GPIO_PULLENSET: u8 = 0x0B;

/// Pins covered by the 32-bit bulk registers.
pub const PIN_COUNT: u8 = 32;

// ---------------------------------------------------------------------------
// ADC module
// ---------------------------------------------------------------------------

pub const ADC_BASE: u8 = 0x09;

/// ADC channel registers start here; the channel number is added to it.
pub const ADC_CHANNEL_OFFSET: u8 = 0x07;

// ---------------------------------------------------------------------------
// NeoPixel module
// ---------------------------------------------------------------------------

pub const NEOPIXEL_BASE: u8 = 0x0E;
pub const NEOPIXEL_PIN: u8 = 0x01;
pub const NEOPIXEL_SPEED: u8 = 0x02;
pub const NEOPIXEL_BUF_LENGTH: u8 = 0x03;
pub const NEOPIXEL_BUF: u8 = 0x04;
pub const NEOPIXEL_SHOW: u8 = 0x05;

/// `NEOPIXEL_SPEED` value selecting 800 kHz pixels.
pub const NEOPIXEL_SPEED_800KHZ: u8 = 0x01;

// ---------------------------------------------------------------------------
// Hardware identification
// ---------------------------------------------------------------------------

pub const HW_ID_SAMD09: u8 = 0x55;
pub const HW_ID_TINY806: u8 = 0x84;
pub const HW_ID_TINY1617: u8 = 0x89;

/// Returns true for hardware ids of chips running seesaw firmware.
pub fn is_known_hw_id(id: u8) -> bool {
    id == HW_ID_SAMD09 || (HW_ID_TINY806..=HW_ID_TINY1617).contains(&id)
}

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Default 7-bit address of ATtiny-based seesaw boards.
pub const DEFAULT_ADDRESS: u8 = 0x49;

/// Largest single write the firmware accepts, register bytes included.
pub const MAX_TRANSFER: usize = 32;

/// Data bytes of a `NEOPIXEL_BUF` write: a 16-bit offset plus pixel bytes.
pub const PIXEL_PAYLOAD: usize = MAX_TRANSFER - 2;

/// Pixel bytes per `NEOPIXEL_BUF` write.
pub const PIXEL_CHUNK: usize = PIXEL_PAYLOAD - 2;

/// Delay between addressing a register and reading it back.
pub const READ_DELAY_US: u32 = 250;

/// Analog conversions need longer before the result is ready.
pub const ANALOG_READ_DELAY_US: u32 = 500;

/// Time the chip needs to come back after a software reset.
pub const RESET_DELAY_MS: u32 = 10;

/// Hardware id reads attempted before giving up.
pub const HW_ID_ATTEMPTS: usize = 10;

// ---------------------------------------------------------------------------
// Reference board
// ---------------------------------------------------------------------------

/// Expander pin driving the seeknobs LED strip.
pub const SEEKNOBS_PIXEL_PIN: u8 = 8;

/// LEDs on the seeknobs board, one per knob.
pub const SEEKNOBS_PIXEL_COUNT: u16 = 8;

/// Global LED brightness used by the reference firmware.
pub const DEFAULT_BRIGHTNESS: u8 = 32;
