// ============================================================================
// COLOR — normalized RGBA value and its 4-byte on-disk encoding
// ============================================================================

use crate::io::CanvasIoError;

/// Bytes per encoded pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// A single logical pixel color. Channels are nominally in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Encode a color as `[r, g, b, a]` bytes.
///
/// Each channel is clamped to `[0, 1]` and then truncated: `floor(x * 255)`.
/// Averaged colors can land a hair outside the unit range, hence the clamp.
pub fn encode_channel(c: Color) -> [u8; 4] {
    c.to_array().map(|x| (x.clamp(0.0, 1.0) * 255.0).floor() as u8)
}

/// Decode `[r, g, b, a]` bytes into a color (`b / 255.0` per channel).
pub fn decode_channel(bytes: [u8; 4]) -> Color {
    Color::from_array(bytes.map(|b| b as f32 / 255.0))
}

/// Decode a packed RGBA byte stream.
pub fn decode_pixels(bytes: &[u8]) -> Result<Vec<Color>, CanvasIoError> {
    if bytes.len() % BYTES_PER_PIXEL != 0 {
        return Err(CanvasIoError::MalformedStream { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|px| decode_channel([px[0], px[1], px[2], px[3]]))
        .collect())
}
