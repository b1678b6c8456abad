//! Style configuration.
//!
//! A [`Style`] is a plain value threaded by reference through every pass.
//! Presets provide complete option sets; style files name a preset with
//! `based_on_style` and override individual keys on top of it.

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

mod presets;

pub use presets::PRESET_NAMES;

/// Number of explored search nodes after which the search stops telling
/// apart states that differ only in their bracket stacks.
pub const DEFAULT_SEARCH_NODE_BUDGET: usize = 10_000;

/// Every formatting knob.
///
/// Field names are the style-file keys. Unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Style {
    /// Align a closing bracket split onto its own line with the visual
    /// indent of the bracket contents.
    pub align_closing_bracket_with_visual_indent: bool,
    /// Allow lambda bodies to span lines.
    pub allow_multiline_lambdas: bool,
    /// Allow dictionary keys to span lines.
    pub allow_multiline_dictionary_keys: bool,
    /// Allow a split before the `=` of a default or keyword argument.
    pub allow_split_before_default_or_named_assigns: bool,
    /// Allow a split between a dictionary key and its value.
    pub allow_split_before_dict_value: bool,
    /// Blank line before a definition nested directly under another.
    pub blank_line_before_nested_class_or_def: bool,
    /// Blank line between a class header and its docstring.
    pub blank_line_before_class_docstring: bool,
    /// Blank line between leading comments and the module docstring.
    pub blank_line_before_module_docstring: bool,
    /// Blank lines around top-level functions and classes.
    pub blank_lines_around_top_level_definition: u32,
    /// Blank lines between top-level imports and the next statement.
    pub blank_lines_between_top_level_imports_and_variables: u32,
    /// Keep consecutive opening brackets together.
    pub coalesce_brackets: bool,
    /// Maximum line width.
    pub column_limit: usize,
    /// Extra indent of continuation lines.
    pub continuation_indent_width: usize,
    /// Put a split closing bracket on its own line, dedented to the
    /// statement's indentation.
    pub dedent_closing_brackets: bool,
    /// Put a split closing bracket on its own line at the contents' indent.
    pub indent_closing_brackets: bool,
    /// Do not force one element per line when a list ends with a comma.
    pub disable_ending_comma_heuristic: bool,
    /// One dictionary entry per line when a dictionary is split.
    pub each_dict_entry_on_separate_line: bool,
    /// Never place a dictionary on a single line.
    pub force_multiline_dict: bool,
    /// Regex for comments marking a line that must keep its layout.
    pub i18n_comment: String,
    /// Function names whose calls keep their layout.
    pub i18n_function_call: Vec<String>,
    /// Indent a dictionary value split from its key.
    pub indent_dictionary_value: bool,
    /// Spaces per block level.
    pub indent_width: usize,
    /// Rejoin a short single-statement body onto its `if` header.
    pub join_multiple_lines: bool,
    /// Space between a trailing comma and the closing bracket.
    pub space_between_ending_comma_and_closing_bracket: bool,
    /// Spaces around `**`.
    pub spaces_around_power_operator: bool,
    /// Spaces around `=` in keyword arguments and defaults.
    pub spaces_around_default_or_named_assign: bool,
    /// Spaces between code and a trailing comment.
    pub spaces_before_comment: usize,
    /// Spaces just inside brackets.
    pub space_inside_brackets: bool,
    /// Split every comma-separated element once a line is split.
    pub split_all_comma_separated_values: bool,
    /// Split arguments one per line when the list ends with a comma.
    pub split_arguments_when_comma_terminated: bool,
    /// Prefer splitting before `+ - * / // % @` rather than after.
    pub split_before_arithmetic_operator: bool,
    /// Prefer splitting before `& | ^ << >>` rather than after.
    pub split_before_bitwise_operator: bool,
    /// Split before the closing bracket when the contents do not fit.
    pub split_before_closing_bracket: bool,
    /// Split before the `for` of a dict or set comprehension.
    pub split_before_dict_set_generator: bool,
    /// Prefer splitting before `.` in a member chain.
    pub split_before_dot: bool,
    /// Split after the `(` that opens a parenthesised expression.
    pub split_before_expression_after_opening_paren: bool,
    /// Split before the first argument when an argument list is split.
    pub split_before_first_argument: bool,
    /// Prefer splitting before `and`/`or` rather than after.
    pub split_before_logical_operator: bool,
    /// Put each keyword argument on its own line when a call is split.
    pub split_before_named_assigns: bool,
    /// Split each clause of a comprehension with several clauses.
    pub split_complex_comprehension: bool,
    pub split_penalty_after_opening_bracket: i32,
    pub split_penalty_after_unary_operator: i32,
    pub split_penalty_arithmetic_operator: i32,
    pub split_penalty_before_if_expr: i32,
    pub split_penalty_bitwise_operator: i32,
    pub split_penalty_comprehension: i32,
    pub split_penalty_excess_character: i32,
    pub split_penalty_for_added_line_split: i32,
    pub split_penalty_import_names: i32,
    pub split_penalty_logical_operator: i32,
    /// Explored search nodes before the search widens its dedup key.
    pub search_node_budget: usize,
}

impl Default for Style {
    fn default() -> Self {
        presets::pep8()
    }
}

impl Style {
    /// A named preset: `pep8`, `google` or `facebook` (any case).
    pub fn preset(name: &str) -> Result<Style, StyleError> {
        presets::by_name(name).ok_or_else(|| StyleError::UnknownPreset(name.to_owned()))
    }

    /// Parse style-file text whose top-level keys are style options.
    pub fn from_toml_str(text: &str) -> Result<Style, StyleError> {
        let table: toml::Table = text.parse()?;
        Style::from_table(table)
    }

    /// Build a style from a TOML table of options.
    ///
    /// `based_on_style` picks the preset (default `pep8`); every other key
    /// overrides one option of it. Keys may use `-` for `_` and any case.
    pub fn from_table(table: toml::Table) -> Result<Style, StyleError> {
        let mut overrides = toml::Table::new();
        for (key, value) in table {
            overrides.insert(normalize_key(&key), value);
        }

        let base = match overrides.remove("based_on_style") {
            Some(toml::Value::String(name)) => Style::preset(&name)?,
            Some(other) => {
                return Err(StyleError::InvalidValue {
                    key: "based_on_style".to_owned(),
                    message: format!("expected a preset name, found {}", other.type_str()),
                })
            }
            None => Style::default(),
        };

        let toml::Value::Table(mut merged) = toml::Value::try_from(&base)? else {
            return Err(StyleError::InvalidValue {
                key: "based_on_style".to_owned(),
                message: "preset did not encode as a table".to_owned(),
            });
        };
        merged.extend(overrides);
        let style: Style = toml::Value::Table(merged).try_into()?;
        style.validate()?;
        Ok(style)
    }

    /// Check option values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), StyleError> {
        if !self.i18n_comment.is_empty() {
            regex::Regex::new(&self.i18n_comment).map_err(|source| StyleError::InvalidRegex {
                key: "i18n_comment".to_owned(),
                source,
            })?;
        }
        if self.indent_width == 0 {
            return Err(StyleError::InvalidValue {
                key: "indent_width".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        if self.column_limit == 0 {
            return Err(StyleError::InvalidValue {
                key: "column_limit".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        // The search is only optimal with non-negative costs.
        let penalties = [
            ("split_penalty_after_opening_bracket", self.split_penalty_after_opening_bracket),
            ("split_penalty_after_unary_operator", self.split_penalty_after_unary_operator),
            ("split_penalty_arithmetic_operator", self.split_penalty_arithmetic_operator),
            ("split_penalty_before_if_expr", self.split_penalty_before_if_expr),
            ("split_penalty_bitwise_operator", self.split_penalty_bitwise_operator),
            ("split_penalty_comprehension", self.split_penalty_comprehension),
            ("split_penalty_excess_character", self.split_penalty_excess_character),
            ("split_penalty_for_added_line_split", self.split_penalty_for_added_line_split),
            ("split_penalty_import_names", self.split_penalty_import_names),
            ("split_penalty_logical_operator", self.split_penalty_logical_operator),
        ];
        if let Some((key, _)) = penalties.iter().find(|(_, value)| *value < 0) {
            return Err(StyleError::InvalidValue {
                key: (*key).to_owned(),
                message: "must not be negative".to_owned(),
            });
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}
