//! Blocking driver for seesaw expanders.
//!
//! Implements [`Expander`] on top of any `embedded-hal` 1.0 I2C bus and
//! delay provider. Reads write the register address, wait for the firmware to
//! prepare the answer, then read; `write_read` is avoided because a repeated
//! start leaves the firmware no time to respond.
//!
//! Analog pins are addressed by their ATtiny channel number, which equals the
//! pin number on ATtiny-based boards.

pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;

use self::registers::*;
use crate::COLOR_OFF;
use crate::colors::{Rgb24, scale_brightness, unpack_rgb24};
use crate::config::Config;
use crate::hardware::Expander;

/// Errors reported by [`Seesaw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeesawError<E> {
    /// Bus transaction failed.
    I2c(E),

    /// No seesaw answered at startup.
    ///
    /// `hw_id` holds the last id read, or `None` if the chip never responded.
    NotFound { hw_id: Option<u8> },

    /// Register write does not fit a single transfer.
    PayloadTooLong { len: usize },

    /// More pixels than the strip was set up with.
    FrameTooLong { len: usize, capacity: usize },

    /// Pin number has no register on the chip.
    PinOutOfRange { pin: u8 },
}

impl<E: core::fmt::Debug> core::fmt::Display for SeesawError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SeesawError::I2c(error) => write!(f, "I2C error: {:?}", error),
            SeesawError::NotFound { hw_id: Some(id) } => {
                write!(f, "seesaw not found, unknown hardware id {:#04x}", id)
            }
            SeesawError::NotFound { hw_id: None } => {
                write!(f, "seesaw not found, no response")
            }
            SeesawError::PayloadTooLong { len } => {
                write!(f, "payload of {} bytes exceeds a single transfer", len)
            }
            SeesawError::FrameTooLong { len, capacity } => {
                write!(f, "frame of {} pixels exceeds strip of {}", len, capacity)
            }
            SeesawError::PinOutOfRange { pin } => {
                write!(f, "pin {} is not addressable", pin)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for SeesawError<E> {}

/// Product id and build date reported by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProductInfo {
    pub product_id: u16,
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl ProductInfo {
    /// Decodes the `STATUS_VERSION` word.
    pub fn from_version(version: u32) -> Self {
        Self {
            product_id: (version >> 16) as u16,
            year: 2000 + (version & 0x3F) as u16,
            month: ((version >> 7) & 0x0F) as u8,
            day: ((version >> 11) & 0x1F) as u8,
        }
    }
}

/// Byte order expected by the LED strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    Rgb,
    #[default]
    Grb,
}

impl ColorOrder {
    fn bytes(self, color: Rgb24) -> [u8; 3] {
        match self {
            ColorOrder::Rgb => [color.red, color.green, color.blue],
            ColorOrder::Grb => [color.green, color.red, color.blue],
        }
    }
}

/// A seesaw chip on an I2C bus.
pub struct Seesaw<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    pixel_count: u16,
    color_order: ColorOrder,
    brightness: u8,
}

impl<I2C: I2c, D: DelayNs> Seesaw<I2C, D> {
    /// Creates a driver. No bus traffic happens until [`begin`](Self::begin).
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            pixel_count: 0,
            color_order: ColorOrder::default(),
            brightness: u8::MAX,
        }
    }

    /// Gives back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Resets the chip and checks that it identifies as a seesaw.
    ///
    /// # Returns
    /// * `Ok(hw_id)` - Hardware id of the chip
    /// * `Err(NotFound)` - No known id after [`HW_ID_ATTEMPTS`] reads
    pub fn begin(&mut self) -> Result<u8, SeesawError<I2C::Error>> {
        // A missing chip NACKs the reset; identification below reports it.
        if self.software_reset().is_err() {
            debug!("software reset not acknowledged");
        }
        self.delay.delay_ms(RESET_DELAY_MS);

        let mut last_id = None;
        for _ in 0..HW_ID_ATTEMPTS {
            if let Ok(id) = self.read_u8(STATUS_BASE, STATUS_HW_ID) {
                if is_known_hw_id(id) {
                    info!("seesaw found, hw id {=u8:#x}", id);
                    return Ok(id);
                }
                last_id = Some(id);
            }
            self.delay.delay_ms(RESET_DELAY_MS);
        }

        warn!("seesaw not found at {=u8:#x}", self.address);
        Err(SeesawError::NotFound { hw_id: last_id })
    }

    pub fn software_reset(&mut self) -> Result<(), SeesawError<I2C::Error>> {
        self.write(STATUS_BASE, STATUS_SWRST, &[SWRST_MAGIC])
    }

    /// Raw firmware version word.
    pub fn version(&mut self) -> Result<u32, SeesawError<I2C::Error>> {
        self.read_u32(STATUS_BASE, STATUS_VERSION)
    }

    pub fn product_info(&mut self) -> Result<ProductInfo, SeesawError<I2C::Error>> {
        Ok(ProductInfo::from_version(self.version()?))
    }

    /// Makes every pin in `mask` an input with its pull-up enabled.
    pub fn pin_mode_bulk_input_pullup(
        &mut self,
        mask: u32,
    ) -> Result<(), SeesawError<I2C::Error>> {
        let bytes = mask.to_be_bytes();
        self.write(GPIO_BASE, GPIO_DIRCLR_BULK, &bytes)?;
        self.write(GPIO_BASE, GPIO_PULLENSET, &bytes)?;
        // Pull direction follows the output latch: set means pull-up.
        self.write(GPIO_BASE, GPIO_BULK_SET, &bytes)
    }

    /// Converts one analog channel. The result is 10 bits wide.
    ///
    /// Pins outside the GPIO bank fail with `PinOutOfRange` before any bus
    /// traffic.
    pub fn analog_read(&mut self, pin: u8) -> Result<u16, SeesawError<I2C::Error>> {
        if pin >= PIN_COUNT {
            return Err(SeesawError::PinOutOfRange { pin });
        }

        let mut buffer = [0u8; 2];
        self.read(
            ADC_BASE,
            ADC_CHANNEL_OFFSET + pin,
            &mut buffer,
            ANALOG_READ_DELAY_US,
        )?;
        Ok(u16::from_be_bytes(buffer))
    }

    /// Reads the level of every pin in `mask`; other bits are cleared.
    pub fn digital_read_bulk(&mut self, mask: u32) -> Result<u32, SeesawError<I2C::Error>> {
        Ok(self.read_u32(GPIO_BASE, GPIO_BULK)? & mask)
    }

    /// Sets up the LED strip on `pin` with `count` RGB pixels.
    pub fn pixels_begin(
        &mut self,
        pin: u8,
        count: u16,
        order: ColorOrder,
    ) -> Result<(), SeesawError<I2C::Error>> {
        let length = count.saturating_mul(3).to_be_bytes();
        self.write(NEOPIXEL_BASE, NEOPIXEL_SPEED, &[NEOPIXEL_SPEED_800KHZ])?;
        self.write(NEOPIXEL_BASE, NEOPIXEL_BUF_LENGTH, &length)?;
        self.write(NEOPIXEL_BASE, NEOPIXEL_PIN, &[pin])?;
        self.pixel_count = count;
        self.color_order = order;
        Ok(())
    }

    /// Sets the brightness applied to every following frame. 255 is full.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Uploads `frame` starting at the first pixel and latches it.
    ///
    /// # Errors
    /// * `FrameTooLong` - The frame has more pixels than
    ///   [`pixels_begin`](Self::pixels_begin) set up
    /// * `I2c` - A chunk or the latch command failed
    pub fn push_frame(&mut self, frame: &[Rgb24]) -> Result<(), SeesawError<I2C::Error>> {
        if frame.len() > self.pixel_count as usize {
            return Err(SeesawError::FrameTooLong {
                len: frame.len(),
                capacity: self.pixel_count as usize,
            });
        }

        let order = self.color_order;
        let brightness = self.brightness;
        let mut bytes = frame
            .iter()
            .flat_map(move |color| order.bytes(scale_brightness(*color, brightness)))
            .peekable();

        let mut offset: u16 = 0;
        while bytes.peek().is_some() {
            let payload: Vec<u8, PIXEL_PAYLOAD> = offset
                .to_be_bytes()
                .into_iter()
                .chain(bytes.by_ref().take(PIXEL_CHUNK))
                .collect();
            self.write(NEOPIXEL_BASE, NEOPIXEL_BUF, &payload)?;
            offset += (payload.len() - 2) as u16;
        }

        self.write(NEOPIXEL_BASE, NEOPIXEL_SHOW, &[])
    }

    /// Brings up a seeknobs board: identifies the chip, enables the button
    /// pull-ups, sets up the LED strip and lights the startup pattern.
    pub fn init_seeknobs<const KNOBS: usize, const BUTTONS: usize>(
        &mut self,
        config: &Config<KNOBS, BUTTONS>,
    ) -> Result<ProductInfo, SeesawError<I2C::Error>> {
        self.begin()?;

        let product = self.product_info()?;
        info!(
            "seesaw product {=u16}, built {=u16}/{=u8}/{=u8}",
            product.product_id,
            product.year,
            product.month,
            product.day
        );

        self.pixels_begin(SEEKNOBS_PIXEL_PIN, SEEKNOBS_PIXEL_COUNT, ColorOrder::Grb)?;
        self.set_brightness(DEFAULT_BRIGHTNESS);
        // Magenta and cyan markers until the first sweep paints the knobs.
        self.push_frame(&[unpack_rgb24(0xFF00FF), COLOR_OFF, unpack_rgb24(0x00FFFF)])?;

        self.pin_mode_bulk_input_pullup(config.button_mask())?;
        Ok(product)
    }

    fn read(
        &mut self,
        module: u8,
        register: u8,
        buffer: &mut [u8],
        delay_us: u32,
    ) -> Result<(), SeesawError<I2C::Error>> {
        self.i2c
            .write(self.address, &[module, register])
            .map_err(SeesawError::I2c)?;
        self.delay.delay_us(delay_us);
        self.i2c.read(self.address, buffer).map_err(SeesawError::I2c)
    }

    fn read_u8(&mut self, module: u8, register: u8) -> Result<u8, SeesawError<I2C::Error>> {
        let mut buffer = [0u8; 1];
        self.read(module, register, &mut buffer, READ_DELAY_US)?;
        Ok(buffer[0])
    }

    fn read_u32(&mut self, module: u8, register: u8) -> Result<u32, SeesawError<I2C::Error>> {
        let mut buffer = [0u8; 4];
        self.read(module, register, &mut buffer, READ_DELAY_US)?;
        Ok(u32::from_be_bytes(buffer))
    }

    fn write(
        &mut self,
        module: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), SeesawError<I2C::Error>> {
        if data.len() > MAX_TRANSFER - 2 {
            return Err(SeesawError::PayloadTooLong { len: data.len() });
        }

        let buffer: Vec<u8, MAX_TRANSFER> = [module, register]
            .into_iter()
            .chain(data.iter().copied())
            .collect();
        self.i2c.write(self.address, &buffer).map_err(SeesawError::I2c)
    }
}

impl<I2C: I2c, D: DelayNs> Expander for Seesaw<I2C, D> {
    type Error = SeesawError<I2C::Error>;

    fn analog_read(&mut self, pin: u8) -> Result<u16, Self::Error> {
        Seesaw::analog_read(self, pin)
    }

    fn digital_read_bulk(&mut self, mask: u32) -> Result<u32, Self::Error> {
        Seesaw::digital_read_bulk(self, mask)
    }

    fn push_frame(&mut self, frame: &[Rgb24]) -> Result<(), Self::Error> {
        Seesaw::push_frame(self, frame)
    }
}
