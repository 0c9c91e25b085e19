//! Subcommand implementations

pub mod evolve;
pub mod expand;
pub mod info;
pub mod optimal;
pub mod report;
pub mod run;

use anyhow::{Context, Result};
use std::path::Path;

use arena_core::ParameterSpec;

/// Load a spec document, rejecting one with no parameters
pub(crate) fn load_spec(path: &Path) -> Result<ParameterSpec> {
    let spec = ParameterSpec::from_path(path)
        .with_context(|| format!("Failed to load spec from {}", path.display()))?;
    spec.validate()
        .with_context(|| format!("Spec {} is unusable", path.display()))?;
    Ok(spec)
}

/// Shorten text for a table cell
pub(crate) fn preview(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("line one\nline two", 40), "line one line two");
        assert_eq!(preview("ééééééé", 4), "ééé…");
    }

    #[test]
    fn test_load_spec_rejects_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(load_spec(&path).is_err());

        std::fs::write(&path, r#"{"model": ["a", "b"]}"#).unwrap();
        assert_eq!(load_spec(&path).unwrap().combination_count(), Some(2));
    }
}
