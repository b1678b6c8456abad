use std::fs;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn style_table_overrides_preset() {
    let text = "[style]\nbased_on_style = \"google\"\ncolumn-limit = 100\n";
    let style = parse_style_file(Path::new(".weft.toml"), text).unwrap().unwrap();
    assert_eq!(style.column_limit, 100);
    assert_eq!(style.indent_width, Style::preset("google").unwrap().indent_width);
}

#[test]
fn top_level_keys_are_accepted() {
    let style = parse_style_file(Path::new(".weft.toml"), "column_limit = 60\n")
        .unwrap()
        .unwrap();
    assert_eq!(style.column_limit, 60);
}

#[test]
fn pyproject_without_section_does_not_configure() {
    let text = "[project]\nname = \"demo\"\n";
    assert!(parse_style_file(Path::new("pyproject.toml"), text).unwrap().is_none());
}

#[test]
fn pyproject_tool_section_is_read() {
    let text = "[project]\nname = \"demo\"\n\n[tool.weft]\nbased_on_style = \"facebook\"\n";
    let style = parse_style_file(Path::new("pyproject.toml"), text).unwrap().unwrap();
    assert_eq!(style, Style::preset("facebook").unwrap());
}

#[test]
fn unknown_key_is_an_error() {
    let err = parse_style_file(Path::new(".weft.toml"), "[style]\ncolum_limit = 3\n").unwrap_err();
    assert!(matches!(err, StyleError::Toml(_)));
}

#[test]
fn style_section_must_be_a_table() {
    let err = parse_style_file(Path::new(".weft.toml"), "style = 3\n").unwrap_err();
    assert!(matches!(err, StyleError::InvalidValue { .. }));
}

#[test]
fn style_arg_accepts_presets_in_any_case() {
    assert_eq!(load_style_arg("Google").unwrap(), Style::preset("google").unwrap());
}

#[test]
fn style_arg_rejects_unknown_names() {
    assert!(matches!(load_style_arg("no-such-style"), Err(CliError::Usage(_))));
}

#[test]
fn nearest_style_file_wins() {
    let root = tempfile::tempdir().unwrap();
    let nested = root.path().join("pkg/sub");
    fs::create_dir_all(&nested).unwrap();
    fs::write(root.path().join(STYLE_FILE), "[style]\ncolumn_limit = 100\n").unwrap();
    fs::write(
        root.path().join("pkg").join(PYPROJECT_FILE),
        "[tool.weft]\ncolumn_limit = 50\n",
    )
    .unwrap();

    let mut resolver = StyleResolver::discover();
    assert_eq!(resolver.resolve(&nested).unwrap().column_limit, 50);
    assert_eq!(resolver.resolve(root.path()).unwrap().column_limit, 100);
}

#[test]
fn fixed_style_ignores_files() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(STYLE_FILE), "column_limit = 100\n").unwrap();
    let mut resolver = StyleResolver::fixed(Style::preset("google").unwrap());
    assert_eq!(*resolver.resolve(root.path()).unwrap(), Style::preset("google").unwrap());
}

#[test]
fn broken_style_file_names_its_path() {
    let root = tempfile::tempdir().unwrap();
    fs::write(root.path().join(STYLE_FILE), "[style]\ncolumn_limit = \"wide\"\n").unwrap();
    let err = StyleResolver::discover().resolve(root.path()).unwrap_err();
    match err {
        CliError::Style { path, .. } => assert_eq!(path, root.path().join(STYLE_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}
