//! Built-in styles.

use super::{Style, DEFAULT_SEARCH_NODE_BUDGET};

/// Names accepted by [`Style::preset`].
pub const PRESET_NAMES: &[&str] = &["pep8", "google", "facebook"];

pub(super) fn by_name(name: &str) -> Option<Style> {
    match name.trim().to_ascii_lowercase().as_str() {
        "pep8" => Some(pep8()),
        "google" => Some(google()),
        "facebook" => Some(facebook()),
        _ => None,
    }
}

pub(super) fn pep8() -> Style {
    Style {
        align_closing_bracket_with_visual_indent: true,
        allow_multiline_lambdas: false,
        allow_multiline_dictionary_keys: false,
        allow_split_before_default_or_named_assigns: true,
        allow_split_before_dict_value: true,
        blank_line_before_nested_class_or_def: true,
        blank_line_before_class_docstring: false,
        blank_line_before_module_docstring: false,
        blank_lines_around_top_level_definition: 2,
        blank_lines_between_top_level_imports_and_variables: 1,
        coalesce_brackets: false,
        column_limit: 79,
        continuation_indent_width: 4,
        dedent_closing_brackets: false,
        indent_closing_brackets: false,
        disable_ending_comma_heuristic: false,
        each_dict_entry_on_separate_line: true,
        force_multiline_dict: false,
        i18n_comment: String::new(),
        i18n_function_call: Vec::new(),
        indent_dictionary_value: false,
        indent_width: 4,
        join_multiple_lines: true,
        space_between_ending_comma_and_closing_bracket: true,
        spaces_around_power_operator: false,
        spaces_around_default_or_named_assign: false,
        spaces_before_comment: 2,
        space_inside_brackets: false,
        split_all_comma_separated_values: false,
        split_arguments_when_comma_terminated: false,
        split_before_arithmetic_operator: false,
        split_before_bitwise_operator: true,
        split_before_closing_bracket: true,
        split_before_dict_set_generator: true,
        split_before_dot: false,
        split_before_expression_after_opening_paren: false,
        split_before_first_argument: false,
        split_before_logical_operator: true,
        split_before_named_assigns: true,
        split_complex_comprehension: false,
        split_penalty_after_opening_bracket: 300,
        split_penalty_after_unary_operator: 10_000,
        split_penalty_arithmetic_operator: 300,
        split_penalty_before_if_expr: 0,
        split_penalty_bitwise_operator: 300,
        split_penalty_comprehension: 80,
        split_penalty_excess_character: 7000,
        split_penalty_for_added_line_split: 30,
        split_penalty_import_names: 0,
        split_penalty_logical_operator: 300,
        search_node_budget: DEFAULT_SEARCH_NODE_BUDGET,
    }
}

pub(super) fn google() -> Style {
    Style {
        column_limit: 80,
        i18n_comment: r"#\..*".to_owned(),
        i18n_function_call: vec!["N_".to_owned(), "_".to_owned()],
        join_multiple_lines: false,
        split_before_bitwise_operator: false,
        split_before_logical_operator: false,
        split_complex_comprehension: true,
        split_penalty_comprehension: 2100,
        ..pep8()
    }
}

pub(super) fn facebook() -> Style {
    Style {
        align_closing_bracket_with_visual_indent: false,
        column_limit: 80,
        dedent_closing_brackets: true,
        indent_dictionary_value: true,
        join_multiple_lines: false,
        split_penalty_after_opening_bracket: 0,
        split_penalty_before_if_expr: 30,
        split_penalty_for_added_line_split: 30,
        ..pep8()
    }
}
