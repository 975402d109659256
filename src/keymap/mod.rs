//! Key chord to action identity mapping.
//!
//! The framework's configuration surface: a TOML `[bindings]` table mapping
//! chords like `"ctrl+s"` or `"shift+delete"` to action paths like
//! `"OrderSummary.RemoveItem"`. The application's event loop looks incoming
//! key events up here and forwards hits to the focused presenter's
//! dispatcher, so keyboard wiring stays out of presenters entirely.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use thiserror::Error;

use crate::action::{ActionId, InvalidActionPath};

/// Errors that can occur when loading a keymap.
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("failed to read keymap '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keymap: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unrecognized key chord '{chord}'")]
    BadChord { chord: String },

    #[error(transparent)]
    BadActionPath(#[from] InvalidActionPath),
}

/// A parsed key chord: modifiers plus one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: KeyModifiers,
    pub code: KeyCode,
}

impl KeyChord {
    pub fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    /// The chord a key event represents. Plain character keys drop the
    /// SHIFT modifier — the shifted character itself carries it.
    pub fn from_event(event: &KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        if matches!(event.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self {
            modifiers,
            code: event.code,
        }
    }
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    fn from_str(chord: &str) -> Result<Self, Self::Err> {
        let mut modifiers = KeyModifiers::NONE;
        let mut code = None;
        for token in chord.split('+') {
            let token = token.trim();
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "super" | "cmd" => modifiers |= KeyModifiers::SUPER,
                key => {
                    if code.replace(parse_key(key, chord)?).is_some() {
                        // Two non-modifier tokens in one chord.
                        return Err(KeymapError::BadChord {
                            chord: chord.to_string(),
                        });
                    }
                }
            }
        }
        match code {
            Some(code) => {
                // A shifted character key is written as the character itself.
                let mut chord = Self { modifiers, code };
                if matches!(code, KeyCode::Char(_)) {
                    chord.modifiers.remove(KeyModifiers::SHIFT);
                }
                Ok(chord)
            }
            None => Err(KeymapError::BadChord {
                chord: chord.to_string(),
            }),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "shift+")?;
        }
        if self.modifiers.contains(KeyModifiers::SUPER) {
            write!(f, "super+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "delete"),
            KeyCode::Insert => write!(f, "insert"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            other => write!(f, "{other:?}"),
        }
    }
}

fn parse_key(key: &str, chord: &str) -> Result<KeyCode, KeymapError> {
    let code = match key {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => {
                    if let Some(n) = key.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                        if (1..=24).contains(&n) {
                            return Ok(KeyCode::F(n));
                        }
                    }
                    return Err(KeymapError::BadChord {
                        chord: chord.to_string(),
                    });
                }
            }
        }
    };
    Ok(code)
}

#[derive(Deserialize, Default)]
struct RawKeymap {
    #[serde(default)]
    bindings: HashMap<String, String>,
}

/// Chord → action identity lookup table.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<KeyChord, ActionId>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path to the keymap file.
    ///
    /// Uses `~/.config/podium/keymap.toml` on Unix/macOS, or the platform
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if the config dir is unavailable.
    pub fn keymap_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("podium").join("keymap.toml")
    }

    /// Load the keymap from the default location. A missing file is not an
    /// error; it yields the empty keymap for the application to fill with
    /// its defaults.
    pub fn load() -> Result<Self, KeymapError> {
        let path = Self::keymap_path();
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self, KeymapError> {
        let content = fs::read_to_string(path).map_err(|source| KeymapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, KeymapError> {
        let raw: RawKeymap = toml::from_str(content)?;
        let mut keymap = Self::new();
        for (chord, path) in raw.bindings {
            let chord: KeyChord = chord.parse()?;
            let id: ActionId = path.parse().map_err(KeymapError::BadActionPath)?;
            keymap.insert(chord, id);
        }
        Ok(keymap)
    }

    /// Bind `chord` to `id`, replacing any prior binding for the chord.
    /// Used for programmatic defaults underneath the loaded file.
    pub fn insert(&mut self, chord: KeyChord, id: ActionId) {
        self.bindings.insert(chord, id);
    }

    /// Overlay `other`'s bindings on top of this keymap. Used to layer a
    /// user's keymap file over application defaults.
    pub fn merge(&mut self, other: Keymap) {
        self.bindings.extend(other.bindings);
    }

    /// The action a key event triggers, if any.
    pub fn action_for(&self, event: &KeyEvent) -> Option<&ActionId> {
        self.bindings.get(&KeyChord::from_event(event))
    }

    pub fn get(&self, chord: &KeyChord) -> Option<&ActionId> {
        self.bindings.get(chord)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
