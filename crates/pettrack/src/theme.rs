//! Light/dark theme preference.
//!
//! Only the [`ThemeMode`] flag is persisted; the colour palettes are built-in
//! presets resolved from the mode.

use serde::{Deserialize, Serialize};

/// Which of the two built-in presets is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ThemeMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Check if this is the dark preset.
    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// The value written to storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value.
    ///
    /// Accepts the bare literal as well as a JSON-quoted string, since older
    /// builds wrote the flag through a JSON encoder. Returns `None` for
    /// anything else.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The full preset for this mode.
    #[must_use]
    pub fn theme(self) -> Theme {
        match self {
            Self::Light => Theme::light(),
            Self::Dark => Theme::dark(),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour palette as hex strings.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
}

/// A resolved theme preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// The mode this preset belongs to.
    pub mode: ThemeMode,
    /// Its colours.
    pub colors: Palette,
}

impl Theme {
    /// The light preset.
    #[must_use]
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            colors: Palette {
                primary: "#3B82F6",
                secondary: "#10B981",
                background: "#FFFFFF",
                surface: "#F8FAFC",
                text: "#1F2937",
                text_secondary: "#6B7280",
                border: "#E5E7EB",
                success: "#10B981",
                warning: "#F59E0B",
                error: "#EF4444",
            },
        }
    }

    /// The dark preset.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            colors: Palette {
                primary: "#60A5FA",
                secondary: "#34D399",
                background: "#111827",
                surface: "#1F2937",
                text: "#F9FAFB",
                text_secondary: "#9CA3AF",
                border: "#374151",
                success: "#34D399",
                warning: "#FBBF24",
                error: "#F87171",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
        assert!(!ThemeMode::default().is_dark());
    }

    #[test]
    fn test_toggled_is_involution() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
        }
    }

    #[test]
    fn test_from_stored() {
        assert_eq!(ThemeMode::from_stored("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::from_stored("light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::from_stored("\"dark\""), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::from_stored(" light\n"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::from_stored("Dark"), None);
        assert_eq!(ThemeMode::from_stored(""), None);
    }

    #[test]
    fn test_stored_value_round_trips() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            assert_eq!(ThemeMode::from_stored(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_presets_match_mode() {
        assert_eq!(ThemeMode::Dark.theme().mode, ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.theme().colors.background, "#FFFFFF");
        assert_ne!(Theme::light().colors, Theme::dark().colors);
    }
}
