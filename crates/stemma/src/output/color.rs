//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:        green   (living people, clean checks)
//!   - Warning:        yellow  (conditions, load warnings)
//!   - Error:          red     (fatal errors)
//!   - Info/Reference: cyan    (person and union IDs)
//!   - Accent:         magenta (union markers)
//!   - Muted:          dimmed  (field labels, connectors, dates)
//!   - Emphasis:       bold    (section headers, names)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().bold().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Colorize a person or union ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    info(id, config)
}

/// Apply dimmed style to text (for labels, connectors and dates).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers and names).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Marker for a person's living flag, with ASCII fallback support.
pub(crate) fn living_marker(living: Option<bool>, config: &OutputConfig) -> String {
    let icon = match (living, config.use_ascii) {
        (Some(true), false) => "●",
        (Some(false), false) => "✝",
        (None, false) => "○",
        (Some(true), true) => "*",
        (Some(false), true) => "+",
        (None, true) => "o",
    };
    if !config.use_colors {
        return icon.to_string();
    }
    match living {
        Some(true) => icon.green().to_string(),
        Some(false) => icon.dimmed().to_string(),
        None => icon.to_string(),
    }
}

/// Marker joining the two members of a union.
pub(crate) fn union_marker(config: &OutputConfig) -> String {
    let icon = if config.use_ascii { "&" } else { "⚭" };
    if !config.use_colors {
        return icon.to_string();
    }
    icon.magenta().to_string()
}
