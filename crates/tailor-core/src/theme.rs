//! Design tokens
//!
//! A theme is an ordered map of CSS custom properties (`--color-red-500`).
//! Entries marked `inline` are emitted as raw values instead of `var()`
//! references, and `reference` entries are left out of the generated `:root`
//! block.

use crate::fold::{format_number, parse_dimension};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single theme token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub value: String,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub reference: bool,
}

impl ThemeEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inline: false,
            reference: false,
        }
    }

    pub fn inline(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inline: true,
            reference: false,
        }
    }
}

/// Options threaded through theme resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Treat every entry as non-inline
    pub suppress_inline: bool,
}

/// Ordered token table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    entries: IndexMap<String, ThemeEntry>,
}

/// Legacy `theme()` namespaces and the variable namespace they map to
const KEY_PATH_NAMESPACES: &[(&str, &str)] = &[
    ("colors", "color"),
    ("screens", "breakpoint"),
    ("borderRadius", "radius"),
    ("fontSize", "text"),
    ("boxShadow", "shadow"),
    ("lineHeight", "leading"),
    ("letterSpacing", "tracking"),
    ("fontFamily", "font"),
    ("fontWeight", "font-weight"),
    ("opacity", "opacity"),
    ("spacing", "spacing"),
    ("zIndex", "z"),
];

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// The theme shipped with the built-in design system
    pub fn with_defaults() -> Self {
        let mut theme = Self::new();
        theme.add("--spacing", "0.25rem");

        for (name, value) in [
            ("black", "#000"),
            ("white", "#fff"),
            ("red-100", "#fee2e2"),
            ("red-300", "#fca5a5"),
            ("red-500", "#ef4444"),
            ("red-700", "#b91c1c"),
            ("red-900", "#7f1d1d"),
            ("blue-100", "#dbeafe"),
            ("blue-300", "#93c5fd"),
            ("blue-500", "#3b82f6"),
            ("blue-700", "#1d4ed8"),
            ("blue-900", "#1e3a8a"),
            ("green-100", "#dcfce7"),
            ("green-300", "#86efac"),
            ("green-500", "#22c55e"),
            ("green-700", "#15803d"),
            ("green-900", "#14532d"),
            ("gray-100", "#f3f4f6"),
            ("gray-300", "#d1d5db"),
            ("gray-500", "#6b7280"),
            ("gray-700", "#374151"),
            ("gray-900", "#111827"),
        ] {
            theme.add(format!("--color-{name}"), value);
        }

        for (name, value) in [
            ("sm", "40rem"),
            ("md", "48rem"),
            ("lg", "64rem"),
            ("xl", "80rem"),
            ("2xl", "96rem"),
        ] {
            theme.add(format!("--breakpoint-{name}"), value);
        }

        for (name, value) in [
            ("xs", "0.125rem"),
            ("sm", "0.25rem"),
            ("md", "0.375rem"),
            ("lg", "0.5rem"),
            ("xl", "0.75rem"),
        ] {
            theme.add(format!("--radius-{name}"), value);
        }

        for (name, size, line_height) in [
            ("xs", "0.75rem", "calc(1 / 0.75)"),
            ("sm", "0.875rem", "calc(1.25 / 0.875)"),
            ("base", "1rem", "calc(1.5 / 1)"),
            ("lg", "1.125rem", "calc(1.75 / 1.125)"),
            ("xl", "1.25rem", "calc(1.75 / 1.25)"),
            ("2xl", "1.5rem", "calc(2 / 1.5)"),
        ] {
            theme.add(format!("--text-{name}"), size);
            theme.add(format!("--text-{name}--line-height"), line_height);
        }

        for (name, value) in [
            ("tight", "1.25"),
            ("snug", "1.375"),
            ("normal", "1.5"),
            ("relaxed", "1.625"),
            ("loose", "2"),
        ] {
            theme.add(format!("--leading-{name}"), value);
        }

        theme
    }

    /// Insert or replace a token
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name, ThemeEntry::new(value));
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ThemeEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ThemeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ThemeEntry)> {
        self.entries.iter()
    }

    /// Raw value of a token
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.value.as_str())
    }

    /// Keys below a namespace, without nested `--` sub-keys
    ///
    /// `keys("--color")` yields `red-500`, `blue-500`, ...
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let prefix = format!("{namespace}-");
        self.entries
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|key| !key.is_empty() && !key.contains("--"))
            .map(str::to_string)
            .collect()
    }

    /// Reference to a token as it appears in compiled CSS
    ///
    /// `var(--name)` for regular entries, the raw value for inline ones.
    pub fn reference(&self, name: &str, options: ResolveOptions) -> Option<String> {
        let entry = self.entries.get(name)?;
        if entry.inline && !options.suppress_inline {
            Some(entry.value.clone())
        } else {
            Some(format!("var({name})"))
        }
    }

    /// Look up a namespaced value (`--color` + `red-500`)
    pub fn resolve_in(&self, namespaces: &[&str], key: &str, options: ResolveOptions) -> Option<String> {
        namespaces
            .iter()
            .find_map(|namespace| self.reference(&format!("{namespace}-{key}"), options))
    }

    /// Resolve a `theme()` argument (`colors.red.500` or `--color-red-500`)
    /// to its raw value
    ///
    /// Spacing steps without an explicit token are derived from `--spacing`.
    pub fn resolve_path(&self, path: &str) -> Option<String> {
        let variable = key_path_to_variable(path)?;
        if let Some(value) = self.value(&variable) {
            return Some(value.to_string());
        }
        let step = variable.strip_prefix("--spacing-")?;
        let multiplier = parse_dimension(&step.replace('_', "."))?;
        if multiplier.unit.is_some() || !self.contains("--spacing") {
            return None;
        }
        Some(format!(
            "calc(var(--spacing) * {})",
            format_number(multiplier.value)
        ))
    }
}

/// Translate a `theme()` key path to a custom property name
///
/// `colors.red.500` → `--color-red-500`, `spacing.2.5` → `--spacing-2_5`,
/// `--color-red-500` is returned as is.
pub fn key_path_to_variable(path: &str) -> Option<String> {
    let path = path.trim();
    if path.starts_with("--") {
        return Some(path.to_string());
    }
    if path.is_empty() {
        return None;
    }

    let normalized = path.replace(['[', ']'], ".");
    let mut segments: Vec<&str> = normalized.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return None;
    }

    let head = segments.remove(0);
    let namespace = KEY_PATH_NAMESPACES
        .iter()
        .find(|(legacy, _)| *legacy == head)
        .map(|(_, modern)| *modern)
        .unwrap_or(head);

    // `2.5` was split in two; numeric neighbours join with `_`.
    let mut parts: Vec<String> = Vec::new();
    for segment in segments {
        let is_numeric = segment.chars().all(|ch| ch.is_ascii_digit());
        match parts.last_mut() {
            Some(last) if is_numeric && last.chars().all(|ch| ch.is_ascii_digit()) => {
                last.push('_');
                last.push_str(segment);
            }
            _ => parts.push(segment.to_string()),
        }
    }

    let mut variable = format!("--{namespace}");
    for part in parts {
        variable.push('-');
        variable.push_str(&part);
    }
    Some(variable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path_to_variable() {
        assert_eq!(
            key_path_to_variable("colors.red.500").as_deref(),
            Some("--color-red-500")
        );
        assert_eq!(
            key_path_to_variable("screens.md").as_deref(),
            Some("--breakpoint-md")
        );
        assert_eq!(
            key_path_to_variable("spacing.2.5").as_deref(),
            Some("--spacing-2_5")
        );
        assert_eq!(
            key_path_to_variable("borderRadius[lg]").as_deref(),
            Some("--radius-lg")
        );
        assert_eq!(
            key_path_to_variable("--color-red-500").as_deref(),
            Some("--color-red-500")
        );
        assert_eq!(key_path_to_variable(""), None);
    }

    #[test]
    fn test_reference_respects_inline() {
        let mut theme = Theme::new();
        theme.add("--color-red-500", "red");
        theme.insert("--color-blue-500", ThemeEntry::inline("blue"));

        let options = ResolveOptions::default();
        assert_eq!(
            theme.reference("--color-red-500", options).as_deref(),
            Some("var(--color-red-500)")
        );
        assert_eq!(
            theme.reference("--color-blue-500", options).as_deref(),
            Some("blue")
        );
        assert_eq!(
            theme
                .reference(
                    "--color-blue-500",
                    ResolveOptions {
                        suppress_inline: true
                    }
                )
                .as_deref(),
            Some("var(--color-blue-500)")
        );
    }

    #[test]
    fn test_resolve_path_spacing_fallback() {
        let theme = Theme::with_defaults();
        assert_eq!(
            theme.resolve_path("spacing.4").as_deref(),
            Some("calc(var(--spacing) * 4)")
        );
        assert_eq!(
            theme.resolve_path("spacing.2.5").as_deref(),
            Some("calc(var(--spacing) * 2.5)")
        );
        assert_eq!(theme.resolve_path("colors.nope"), None);
    }

    #[test]
    fn test_keys_skip_nested_entries() {
        let theme = Theme::with_defaults();
        let keys = theme.keys("--text");
        assert!(keys.contains(&"sm".to_string()));
        assert!(!keys.iter().any(|key| key.contains("line-height")));
    }
}
