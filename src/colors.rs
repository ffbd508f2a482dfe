//! Color helpers for LED feedback.
//!
//! Colors are 24-bit `palette::Srgb<u8>` values, the native format of
//! NeoPixel-style strips. [`colorwheel`] is the hue ramp used to visualize
//! knob positions.

use palette::Srgb;

/// A 24-bit RGB color, one byte per channel.
pub type Rgb24 = Srgb<u8>;

/// Maps a byte position onto a fully saturated color.
///
/// The position is inverted and split into three 85-wide bands. Each band
/// ramps two channels linearly while the third stays at zero, so the output is
/// cyclic: `colorwheel(0)` and `colorwheel(255)` are both pure red, and no
/// channel moves by more than 3 between neighbouring positions.
pub fn colorwheel(position: u8) -> Rgb24 {
    let position = 255 - position;
    if position < 85 {
        return Srgb::new(255 - position * 3, 0, position * 3);
    }
    if position < 170 {
        let position = position - 85;
        return Srgb::new(0, position * 3, 255 - position * 3);
    }
    let position = position - 170;
    Srgb::new(position * 3, 255 - position * 3, 0)
}

/// Packs a color as `0xRRGGBB`.
#[inline]
pub fn pack_rgb24(color: Rgb24) -> u32 {
    ((color.red as u32) << 16) | ((color.green as u32) << 8) | color.blue as u32
}

/// Unpacks a `0xRRGGBB` value. The top byte is ignored.
#[inline]
pub fn unpack_rgb24(packed: u32) -> Rgb24 {
    Srgb::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

/// Scales a color by a global brightness, where 255 leaves it untouched and 0
/// turns it off.
#[inline]
pub fn scale_brightness(color: Rgb24, brightness: u8) -> Rgb24 {
    let scale = |channel: u8| ((channel as u16 * (brightness as u16 + 1)) >> 8) as u8;
    Srgb::new(scale(color.red), scale(color.green), scale(color.blue))
}
