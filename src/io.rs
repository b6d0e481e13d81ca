use image::codecs::bmp::BmpEncoder;
use image::{ImageError, ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

use crate::canvas::{BLOCK_SIZE, BlockSize, Canvas, cell_count};
use crate::color::{Color, decode_pixels, encode_channel};

// ============================================================================
// ERRORS
// ============================================================================

/// Error type for canvas save/load operations
#[derive(Debug)]
pub enum CanvasIoError {
    Io(std::io::Error),
    Image(ImageError),
    /// Packed RGBA stream whose length is not a multiple of 4.
    MalformedStream { len: usize },
    /// Pixel count does not match the declared image dimensions.
    SizeMismatch { expected: usize, actual: usize },
    /// Image smaller than a single block on at least one axis.
    TooSmall { width: u32, height: u32, block: BlockSize },
}

impl std::fmt::Display for CanvasIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasIoError::Io(e) => write!(f, "IO error: {}", e),
            CanvasIoError::Image(e) => write!(f, "Image error: {}", e),
            CanvasIoError::MalformedStream { len } => {
                write!(f, "Malformed pixel stream: {} bytes is not a whole number of RGBA pixels", len)
            }
            CanvasIoError::SizeMismatch { expected, actual } => {
                write!(f, "Pixel count mismatch: expected {}, got {}", expected, actual)
            }
            CanvasIoError::TooSmall { width, height, block } => write!(
                f,
                "Image {}x{} is smaller than one {}x{} block",
                width, height, block.width, block.height
            ),
        }
    }
}

impl std::error::Error for CanvasIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CanvasIoError::Io(e) => Some(e),
            CanvasIoError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CanvasIoError {
    fn from(e: std::io::Error) -> Self {
        CanvasIoError::Io(e)
    }
}

impl From<ImageError> for CanvasIoError {
    fn from(e: ImageError) -> Self {
        CanvasIoError::Image(e)
    }
}

// ============================================================================
// ENCODE — canvas → full-resolution bitmap
// ============================================================================

/// Expand every cell into a `block` of identical physical pixels.
pub fn encode_image(canvas: &Canvas, block: BlockSize) -> RgbaImage {
    RgbaImage::from_fn(
        canvas.width() * block.width,
        canvas.height() * block.height,
        |x, y| Rgba(encode_channel(canvas.get(x / block.width, y / block.height))),
    )
}

/// Encode the canvas as an uncompressed 32-bit RGBA BMP file image.
pub fn encode_bmp(canvas: &Canvas, block: BlockSize) -> Result<Vec<u8>, CanvasIoError> {
    let image = encode_image(canvas, block);
    let mut bytes = Vec::new();
    let mut encoder = BmpEncoder::new(&mut bytes);
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(bytes)
}

// ============================================================================
// DECODE — full-resolution bitmap → canvas
// ============================================================================

/// Running per-channel sum over one block.
///
/// Decoded channels are `f32` values that are multiples of 2^-31 once
/// non-zero, so an `f64` sum over any block below 2^21 pixels is exact and
/// independent of traversal order.
#[derive(Default)]
struct ChannelSum {
    sum: [f64; 4],
    count: u32,
}

impl ChannelSum {
    fn add(&mut self, c: Color) {
        for (s, v) in self.sum.iter_mut().zip(c.to_array()) {
            *s += v as f64;
        }
        self.count += 1;
    }

    fn mean(&self) -> Color {
        let n = self.count.max(1) as f64;
        Color::from_array(self.sum.map(|s| (s / n) as f32))
    }
}

/// Decode a raw, row-major RGBA buffer of `width × height` physical pixels.
///
/// Each cell is the mean of its block in decoded color space. Edge pixels that
/// do not fill a whole block are dropped with a warning.
pub fn decode_rgba(
    width: u32,
    height: u32,
    raw: &[u8],
    block: BlockSize,
) -> Result<Canvas, CanvasIoError> {
    let pixels = decode_pixels(raw)?;
    let expected = cell_count(width, height);
    if pixels.len() != expected {
        return Err(CanvasIoError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    if width % block.width != 0 || height % block.height != 0 {
        log_warn!(
            "Image {}x{} is not a multiple of the {}x{} block size; trailing pixels ignored",
            width,
            height,
            block.width,
            block.height
        );
    }

    let cols = width / block.width;
    let rows = height / block.height;
    if cols == 0 || rows == 0 {
        return Err(CanvasIoError::TooSmall { width, height, block });
    }

    let mut cells = Vec::with_capacity(cell_count(cols, rows));
    for j in 0..rows {
        for i in 0..cols {
            let mut acc = ChannelSum::default();
            for y in j * block.height..(j + 1) * block.height {
                let row = (y as usize) * (width as usize);
                for x in i * block.width..(i + 1) * block.width {
                    acc.add(pixels[row + x as usize]);
                }
            }
            cells.push(acc.mean());
        }
    }

    let actual = cells.len();
    Canvas::from_cells(cols, rows, cells).ok_or(CanvasIoError::SizeMismatch {
        expected: cell_count(cols, rows),
        actual,
    })
}

/// Decode an already-parsed RGBA image.
pub fn decode_image(image: &RgbaImage, block: BlockSize) -> Result<Canvas, CanvasIoError> {
    decode_rgba(image.width(), image.height(), image.as_raw(), block)
}

/// Parse BMP file bytes and decode them into a canvas.
pub fn decode_bmp(bytes: &[u8], block: BlockSize) -> Result<Canvas, CanvasIoError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?.to_rgba8();
    decode_image(&image, block)
}

// ============================================================================
// FILES
// ============================================================================

/// Load a canvas from `path`.
///
/// A missing file is `Ok(None)`; the caller substitutes a default canvas.
/// Every other failure is an error.
pub fn load_canvas(path: &Path, block: BlockSize) -> Result<Option<Canvas>, CanvasIoError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log_info!("No file at {}, starting a new canvas", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let canvas = decode_bmp(&bytes, block)?;
    log_info!(
        "Loaded {} ({}x{} cells)",
        path.display(),
        canvas.width(),
        canvas.height()
    );
    Ok(Some(canvas))
}

/// Encode and write the canvas to `path`.
///
/// The file is written next to the target and renamed over it, so the old
/// contents stay intact if anything fails.
pub fn save_canvas(path: &Path, canvas: &Canvas, block: BlockSize) -> Result<(), CanvasIoError> {
    let bytes = encode_bmp(canvas, block)?;
    let tmp = temp_path(path);
    fs::write(&tmp, &bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ============================================================================
// CANVAS STORE
// ============================================================================

/// Destination a canvas is flushed to.
pub trait CanvasStore {
    fn save(&mut self, canvas: &Canvas) -> Result<(), CanvasIoError>;

    /// Short human-readable name (window title, log lines).
    fn label(&self) -> String;
}

/// BMP file on disk.
#[derive(Clone, Debug)]
pub struct BmpFile {
    path: PathBuf,
    block: BlockSize,
}

impl BmpFile {
    pub fn new(path: PathBuf) -> Self {
        Self::with_block(path, BLOCK_SIZE)
    }

    pub fn with_block(path: PathBuf, block: BlockSize) -> Self {
        Self { path, block }
    }

    pub fn block(&self) -> BlockSize {
        self.block
    }

    pub fn load(&self) -> Result<Option<Canvas>, CanvasIoError> {
        load_canvas(&self.path, self.block)
    }
}

impl CanvasStore for BmpFile {
    fn save(&mut self, canvas: &Canvas) -> Result<(), CanvasIoError> {
        save_canvas(&self.path, canvas, self.block)
    }

    fn label(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
