//! PixelPad — a black-and-white pixel-art editor whose canvas lives in a BMP file.
//!
//! Each canvas cell is stored on disk as a block of identical pixels
//! ([`canvas::BLOCK_SIZE`]). Edits are flushed back to the file shortly
//! after painting stops ([`persistence::FLUSH_THRESHOLD_SECS`]).

#[macro_use]
pub mod logger;
pub mod app;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod coords;
pub mod io;
pub mod persistence;
pub mod project;
pub mod settings;
