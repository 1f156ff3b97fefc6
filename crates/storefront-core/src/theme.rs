//! Color theme preference and where it is kept between sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::traits::ThemeStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::Operation(format!("unknown theme '{other}'"))),
        }
    }
}

/// Keeps the preference for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    saved: Mutex<Option<Theme>>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        let saved = self.saved.lock().map_err(|_| Error::Operation("theme store poisoned".into()))?;
        Ok(*saved)
    }

    fn save(&self, theme: Theme) -> Result<()> {
        let mut saved = self.saved.lock().map_err(|_| Error::Operation("theme store poisoned".into()))?;
        *saved = Some(theme);
        Ok(())
    }
}

/// Stores the preference as a single word in a text file.
///
/// Unknown or unreadable contents load as "no preference" so a corrupt file
/// never blocks startup.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.parse().ok()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, theme.as_str())?;
        Ok(())
    }
}
