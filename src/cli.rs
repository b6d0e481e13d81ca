// ============================================================================
// PixelPad CLI — which file to edit and how big a new canvas should be
// ============================================================================
//
// Usage examples:
//   pixelpad sprite.bmp                   (opens, or creates on first save)
//   pixelpad --width 16 --height 16 icon.bmp
//   pixelpad -v sprite.bmp                (mirror the session log to stderr)

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::settings::{EditorSettings, MAX_CANVAS_SIDE};

/// PixelPad — a black-and-white pixel-art editor backed by a BMP file.
#[derive(Parser, Debug)]
#[command(
    name = "pixelpad",
    about = "Black-and-white pixel-art editor that autosaves to a BMP file",
    long_about = "Left-click paints black, right-click paints white. Changes are\n\
                  written back to the file shortly after you stop painting.\n\n\
                  Example:\n  \
                  pixelpad sprite.bmp\n  \
                  pixelpad --width 16 --height 16 icon.bmp"
)]
pub struct CliArgs {
    /// BMP file to edit. Created on first save if it does not exist.
    #[arg(value_name = "FILE.bmp")]
    pub file: PathBuf,

    /// Width in cells when creating a new canvas (overrides settings).
    #[arg(long, value_name = "CELLS")]
    pub width: Option<u32>,

    /// Height in cells when creating a new canvas (overrides settings).
    #[arg(long, value_name = "CELLS")]
    pub height: Option<u32>,

    /// Mirror log output to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Check arguments clap cannot express on its own.
    pub fn validate(&self) -> Result<(), String> {
        if !has_bmp_extension(&self.file) {
            return Err(format!(
                "'{}' must have a .bmp extension",
                self.file.display()
            ));
        }
        for (flag, value) in [("--width", self.width), ("--height", self.height)] {
            if let Some(v) = value
                && !(1..=MAX_CANVAS_SIDE).contains(&v)
            {
                return Err(format!(
                    "{} must be between 1 and {}, got {}",
                    flag, MAX_CANVAS_SIDE, v
                ));
            }
        }
        Ok(())
    }

    /// Initial canvas size: CLI flags first, then settings.
    pub fn initial_size(&self, settings: &EditorSettings) -> (u32, u32) {
        (
            self.width.unwrap_or(settings.initial_width),
            self.height.unwrap_or(settings.initial_height),
        )
    }
}

fn has_bmp_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("bmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("pixelpad").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn accepts_bmp_files_in_any_case() {
        assert!(parse(&["art.bmp"]).validate().is_ok());
        assert!(parse(&["ART.BMP"]).validate().is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        let err = parse(&["art.png"]).validate().unwrap_err();
        assert!(err.contains(".bmp"));
        assert!(parse(&["no_extension"]).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(parse(&["--width", "0", "a.bmp"]).validate().is_err());
        assert!(parse(&["--height", "9999", "a.bmp"]).validate().is_err());
    }

    #[test]
    fn flags_override_settings() {
        let settings = EditorSettings::default();
        let args = parse(&["--width", "10", "a.bmp"]);
        assert_eq!(args.initial_size(&settings), (10, settings.initial_height));
    }

    #[test]
    fn file_argument_is_required() {
        assert!(CliArgs::try_parse_from(["pixelpad"]).is_err());
    }
}
