//! Configuration for tailor
//!
//! A project config extends the default theme, registers custom utilities and
//! sets the canonicalization defaults used by the CLI.
//!
//! ```json
//! {
//!   "prefix": "tw",
//!   "theme": {
//!     "--color-brand": "#3b82f6",
//!     "--font-body": { "value": "Inter, sans-serif", "inline": true }
//!   },
//!   "utilities": {
//!     "btn": "@apply inline-flex px-4 py-2"
//!   },
//!   "canonicalize": {
//!     "remPx": 16,
//!     "collapse": true,
//!     "logicalToPhysical": false
//!   }
//! }
//! ```

mod loader;

pub use loader::ConfigLoader;

use crate::design_system::DefaultDesignSystem;
use crate::error::TailorError;
use crate::result::Result;
use crate::theme::{Theme, ThemeEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TailorConfig {
    /// Class prefix (`tw` makes classes read `tw:flex`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Theme tokens added on top of the default theme
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub theme: IndexMap<String, ThemeValueConfig>,

    /// Drop the default theme before adding `theme`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reset_theme: bool,

    /// Custom utilities: name to `@apply` list
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub utilities: IndexMap<String, String>,

    pub canonicalize: CanonicalizeConfig,
}

/// A theme token, either a bare value or a full entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValueConfig {
    Value(String),
    Entry {
        value: String,
        #[serde(default)]
        inline: bool,
        #[serde(default)]
        reference: bool,
    },
}

impl ThemeValueConfig {
    fn to_entry(&self) -> ThemeEntry {
        match self {
            ThemeValueConfig::Value(value) => ThemeEntry::new(value.clone()),
            ThemeValueConfig::Entry {
                value,
                inline,
                reference,
            } => ThemeEntry {
                value: value.clone(),
                inline: *inline,
                reference: *reference,
            },
        }
    }
}

/// Canonicalization defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalizeConfig {
    /// Root font size used to compare `rem` against `px`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rem_px: Option<f64>,
    pub collapse: bool,
    pub logical_to_physical: bool,
}

/// Options for a canonicalization run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanonicalizeOptions {
    pub rem_px: Option<f64>,
    /// Merge candidates into shorthands (`mt-1 mb-1` → `my-1`)
    pub collapse: bool,
    /// Treat logical properties as their physical counterparts
    pub logical_to_physical: bool,
}

impl From<&CanonicalizeConfig> for CanonicalizeOptions {
    fn from(config: &CanonicalizeConfig) -> Self {
        Self {
            rem_px: config.rem_px,
            collapse: config.collapse,
            logical_to_physical: config.logical_to_physical,
        }
    }
}

impl TailorConfig {
    /// Build the theme this config describes
    pub fn theme(&self) -> Result<Theme> {
        let mut theme = if self.reset_theme {
            Theme::new()
        } else {
            Theme::with_defaults()
        };
        for (name, value) in &self.theme {
            if !name.starts_with("--") {
                return Err(TailorError::theme_error(format!(
                    "theme key '{name}' must be a custom property (start with '--')"
                )));
            }
            theme.insert(name.clone(), value.to_entry());
        }
        Ok(theme)
    }

    /// Build the design system this config describes
    pub fn design_system(&self) -> Result<DefaultDesignSystem> {
        let mut design_system = DefaultDesignSystem::with_theme(self.theme()?);
        if let Some(prefix) = &self.prefix {
            design_system = design_system.with_prefix(prefix.clone());
        }
        if self.utilities.is_empty() {
            return Ok(design_system);
        }
        design_system.with_utilities(self.utilities.clone())
    }

    pub fn canonicalize_options(&self) -> CanonicalizeOptions {
        CanonicalizeOptions::from(&self.canonicalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design_system::DesignSystem;
    use crate::error::ErrorKind;

    #[test]
    fn test_deserialize_camel_case() {
        let config: TailorConfig = serde_json::from_str(
            r##"{
                "prefix": "tw",
                "theme": {
                    "--color-brand": "#123456",
                    "--font-body": { "value": "Inter", "inline": true }
                },
                "canonicalize": { "remPx": 16, "logicalToPhysical": true }
            }"##,
        )
        .unwrap();

        assert_eq!(config.prefix.as_deref(), Some("tw"));
        assert_eq!(
            config.theme.get("--color-brand"),
            Some(&ThemeValueConfig::Value("#123456".into()))
        );
        let options = config.canonicalize_options();
        assert_eq!(options.rem_px, Some(16.0));
        assert!(options.logical_to_physical);
        assert!(!options.collapse);
    }

    #[test]
    fn test_theme_extends_defaults() {
        let config = TailorConfig {
            theme: [("--color-brand".to_string(), ThemeValueConfig::Value("#123456".into()))]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let theme = config.theme().unwrap();
        assert_eq!(theme.value("--color-brand"), Some("#123456"));
        assert!(theme.contains("--spacing"));
    }

    #[test]
    fn test_reset_theme() {
        let config = TailorConfig {
            reset_theme: true,
            ..Default::default()
        };
        assert!(config.theme().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_theme_key() {
        let config = TailorConfig {
            theme: [("colors.brand".to_string(), ThemeValueConfig::Value("red".into()))]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let error = config.theme().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Theme);
    }

    #[test]
    fn test_design_system_from_config() {
        let config = TailorConfig {
            prefix: Some("tw".into()),
            utilities: [("btn".to_string(), "@apply flex p-2".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let ds = config.design_system().unwrap();
        assert_eq!(ds.prefix(), Some("tw"));
        assert_eq!(ds.parse_candidate("tw:btn").len(), 1);
    }
}
