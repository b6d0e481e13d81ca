use std::path::PathBuf;

use crate::canvas::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};

/// Largest canvas side accepted from settings or the command line.
pub const MAX_CANVAS_SIDE: u32 = 512;

/// Editor settings that persist across sessions
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Width in cells of a newly created canvas
    pub initial_width: u32,
    /// Height in cells of a newly created canvas
    pub initial_height: u32,
    /// Draw the grid outline between cells
    pub show_grid: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            initial_width: DEFAULT_CANVAS_WIDTH,
            initial_height: DEFAULT_CANVAS_HEIGHT,
            show_grid: true,
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelpad/pixelpad_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\PixelPad\pixelpad_settings.cfg
    /// On macOS:   ~/Library/Application Support/PixelPad/pixelpad_settings.cfg
    /// Fallback:   same directory as the executable.
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("pixelpad");
            return Some(config_dir.join("pixelpad_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(PathBuf::from(appdata).join("PixelPad").join("pixelpad_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("PixelPad")
                    .join("pixelpad_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("pixelpad_settings.cfg")))
        }
    }

    /// Serialize as `key=value` lines.
    pub fn to_config_string(&self) -> String {
        format!(
            "initial_width={}\n\
             initial_height={}\n\
             show_grid={}\n",
            self.initial_width, self.initial_height, self.show_grid,
        )
    }

    /// Parse `key=value` lines. Unknown keys and bad values keep their defaults.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "initial_width" => {
                    s.initial_width = parse_side(val).unwrap_or(s.initial_width);
                }
                "initial_height" => {
                    s.initial_height = parse_side(val).unwrap_or(s.initial_height);
                }
                "show_grid" => {
                    s.show_grid = val == "true";
                }
                other => {
                    log_warn!("Unknown settings key '{}' ignored", other);
                }
            }
        }
        s
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = std::fs::write(&path, self.to_config_string()) {
            log_warn!("Could not write settings to {}: {}", path.display(), e);
        }
    }

    /// Load settings from disk. A missing file is created with defaults.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log_info!("Settings loaded from {}", path.display());
                Self::parse(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let s = Self::default();
                s.save();
                s
            }
            Err(e) => {
                log_warn!("Could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Canvas side length in `1..=MAX_CANVAS_SIDE`.
pub fn parse_side(val: &str) -> Option<u32> {
    val.trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (1..=MAX_CANVAS_SIDE).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_gives_defaults() {
        assert_eq!(EditorSettings::parse(""), EditorSettings::default());
    }

    #[test]
    fn parses_known_keys() {
        let s = EditorSettings::parse("initial_width = 16\ninitial_height=24\nshow_grid=false\n");
        assert_eq!(s.initial_width, 16);
        assert_eq!(s.initial_height, 24);
        assert!(!s.show_grid);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let s = EditorSettings::parse("initial_width=0\ninitial_height=lots\nnot a pair\n# comment\n");
        assert_eq!(s, EditorSettings::default());
    }

    #[test]
    fn config_string_parses_back() {
        let s = EditorSettings {
            initial_width: 7,
            initial_height: 300,
            show_grid: false,
        };
        assert_eq!(EditorSettings::parse(&s.to_config_string()), s);
    }

    #[test]
    fn side_range_is_enforced() {
        assert_eq!(parse_side("1"), Some(1));
        assert_eq!(parse_side("512"), Some(512));
        assert_eq!(parse_side("513"), None);
        assert_eq!(parse_side("-4"), None);
    }
}
