//! Style files and their discovery.
//!
//! A directory configures the files below it through `.weft.toml` (a
//! `[style]` table, or top-level keys) or through a `[tool.weft]` table in
//! `pyproject.toml`. The nearest directory with either wins; `.weft.toml`
//! is checked first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use weft_fmt::{Style, StyleError, PRESET_NAMES};

use crate::error::CliError;

pub const STYLE_FILE: &str = ".weft.toml";
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Parse the text of a style file. `Ok(None)` means the file exists but
/// does not configure weft (a `pyproject.toml` without `[tool.weft]`).
pub fn parse_style_file(path: &Path, text: &str) -> Result<Option<Style>, StyleError> {
    let mut table: toml::Table = text.parse()?;
    let is_pyproject = path.file_name().is_some_and(|name| name == PYPROJECT_FILE);
    if is_pyproject {
        let section = table
            .remove("tool")
            .and_then(|tool| match tool {
                toml::Value::Table(mut tool) => tool.remove("weft"),
                _ => None,
            });
        return match section {
            Some(toml::Value::Table(section)) => Style::from_table(section).map(Some),
            Some(other) => Err(invalid_section("tool.weft", &other)),
            None => Ok(None),
        };
    }
    match table.remove("style") {
        Some(toml::Value::Table(section)) => Style::from_table(section).map(Some),
        Some(other) => Err(invalid_section("style", &other)),
        None => Style::from_table(table).map(Some),
    }
}

fn invalid_section(key: &str, value: &toml::Value) -> StyleError {
    StyleError::InvalidValue {
        key: key.to_owned(),
        message: format!("expected a table, found {}", value.type_str()),
    }
}

/// Resolve a `--style` value: a preset name, or the path of a style file.
pub fn load_style_arg(value: &str) -> Result<Style, CliError> {
    if PRESET_NAMES.iter().any(|name| name.eq_ignore_ascii_case(value)) {
        return Style::preset(value).map_err(|source| CliError::Style {
            path: PathBuf::from(value),
            source,
        });
    }
    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(CliError::Usage(format!(
            "`{value}` is neither a style preset ({}) nor a style file",
            PRESET_NAMES.join(", ")
        )));
    }
    let text = std::fs::read_to_string(&path).map_err(|source| CliError::io(&path, source))?;
    match parse_style_file(&path, &text) {
        Ok(Some(style)) => Ok(style),
        Ok(None) => Ok(Style::default()),
        Err(source) => Err(CliError::Style { path, source }),
    }
}

/// Finds the style for each input directory, reading every style file at
/// most once.
pub struct StyleResolver {
    fixed: Option<Arc<Style>>,
    fallback: Arc<Style>,
    cache: FxHashMap<PathBuf, Arc<Style>>,
}

impl StyleResolver {
    /// A resolver that discovers style files, falling back to `pep8`.
    pub fn discover() -> Self {
        StyleResolver {
            fixed: None,
            fallback: Arc::new(Style::default()),
            cache: FxHashMap::default(),
        }
    }

    /// A resolver that ignores style files and always returns `style`.
    pub fn fixed(style: Style) -> Self {
        let style = Arc::new(style);
        StyleResolver {
            fixed: Some(Arc::clone(&style)),
            fallback: style,
            cache: FxHashMap::default(),
        }
    }

    /// The style for files in `dir`.
    pub fn resolve(&mut self, dir: &Path) -> Result<Arc<Style>, CliError> {
        if let Some(style) = &self.fixed {
            return Ok(Arc::clone(style));
        }

        let mut visited = Vec::new();
        let mut found = None;
        for ancestor in dir.ancestors() {
            if let Some(style) = self.cache.get(ancestor) {
                found = Some(Arc::clone(style));
                break;
            }
            visited.push(ancestor.to_path_buf());
            if let Some(style) = style_in(ancestor)? {
                tracing::debug!(dir = %ancestor.display(), "found style file");
                found = Some(Arc::new(style));
                break;
            }
        }

        let style = found.unwrap_or_else(|| Arc::clone(&self.fallback));
        for dir in visited {
            self.cache.insert(dir, Arc::clone(&style));
        }
        Ok(style)
    }
}

/// The style configured by a file directly in `dir`, if any.
fn style_in(dir: &Path) -> Result<Option<Style>, CliError> {
    for name in [STYLE_FILE, PYPROJECT_FILE] {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(&path).map_err(|source| CliError::io(&path, source))?;
        match parse_style_file(&path, &text) {
            Ok(Some(style)) => return Ok(Some(style)),
            Ok(None) => {}
            Err(source) => return Err(CliError::Style { path, source }),
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
