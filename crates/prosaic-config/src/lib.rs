//! Layered configuration: compiled-in defaults, an optional TOML file
//! (discovered via XDG conventions), then CLI overrides applied by the
//! binary crate.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

impl std::str::FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ConfigError::InvalidTheme(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid theme {0:?}, expected \"light\" or \"dark\"")]
    InvalidTheme(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub tab_size: Option<u16>,
    #[serde(default)]
    pub wrap_width: Option<u16>,
    #[serde(default)]
    pub scroll_margin: Option<u16>,
    #[serde(default)]
    pub autosave_interval_secs: Option<u64>,
    #[serde(default)]
    pub undo_ring_capacity: Option<usize>,
    #[serde(default)]
    pub timer_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub tab_size: u16,
    pub wrap_width: u16,
    pub scroll_margin: u16,
    pub autosave_interval_secs: u64,
    pub undo_ring_capacity: usize,
    pub timer_minutes: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            tab_size: 4,
            wrap_width: 70,
            scroll_margin: 3,
            autosave_interval_secs: 5,
            undo_ring_capacity: 100,
            timer_minutes: None,
        }
    }
}

impl Config {
    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.theme {
            self.theme = v;
        }
        if let Some(v) = file.tab_size {
            self.tab_size = v;
        }
        if let Some(v) = file.wrap_width {
            self.wrap_width = v;
        }
        if let Some(v) = file.scroll_margin {
            self.scroll_margin = v;
        }
        if let Some(v) = file.autosave_interval_secs {
            self.autosave_interval_secs = v;
        }
        if let Some(v) = file.undo_ring_capacity {
            self.undo_ring_capacity = v;
        }
        if let Some(v) = file.timer_minutes {
            self.timer_minutes = Some(v);
        }
        self
    }

    /// Viewport-relative scroll margin: 1 row when the text area is short,
    /// else the configured margin, per spec's small-viewport rule.
    pub fn effective_scroll_margin(&self, text_height: u16) -> u16 {
        if text_height <= 6 { 1 } else { self.scroll_margin }
    }

    pub fn apply_theme_override(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// Prefers `./prosaic.toml`, then the XDG config dir, matching the
/// teacher's local-file-first discovery order.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("prosaic.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("prosaic").join("prosaic.toml");
    }
    PathBuf::from("prosaic.toml")
}

/// Loads from `path` (or the discovered path); a missing or malformed file
/// falls back to defaults rather than failing the editor's startup, per
/// spec's "resource errors" recovery policy.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Config::default().merge(file),
        Err(err) => {
            tracing::warn!(target: "config", path = %path.display(), %err, "falling back to defaults on parse error");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_from(Some(PathBuf::from("__definitely_missing__.toml")));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_overrides_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "theme = \"light\"\nwrap_width = 90\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg.theme, Theme::Light);
        assert_eq!(cfg.wrap_width, 90);
        assert_eq!(cfg.tab_size, 4);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "not valid toml {{{").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn small_viewport_shrinks_margin() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_scroll_margin(5), 1);
        assert_eq!(cfg.effective_scroll_margin(30), 3);
    }

    #[test]
    fn theme_from_str_rejects_unknown() {
        assert!("mauve".parse::<Theme>().is_err());
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    }
}
