//! The `fmt` command: format Python source files.
//!
//! Supports single files, directories, and stdin. Styles are resolved for
//! every input before any file is read, so a broken style file stops the
//! run before anything is written. Per-file failures are collected and
//! reported after the batch.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use weft_fmt::{format_source, unified_diff, FormatOptions, LineRanges, Style};

use crate::error::CliError;
use crate::source;
use crate::style_file::{load_style_arg, StyleResolver};

/// What to do with the formatted text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write the formatted text to stdout.
    #[default]
    Print,
    /// List the files that would change; exit code 1 if any.
    Check,
    /// Print a unified diff per changed file.
    Diff,
    /// Rewrite changed files.
    InPlace,
}

/// Configuration for the format command.
#[derive(Debug)]
pub struct FormatConfig {
    pub mode: Mode,
    /// A preset name or style file; style files are discovered if unset.
    pub style: Option<String>,
    pub lines: Option<LineRanges>,
    pub verify: bool,
    pub parallel: bool,
    pub verbose: bool,
    /// Files, directories, or `-` for stdin.
    pub paths: Vec<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            mode: Mode::Print,
            style: None,
            lines: None,
            verify: true,
            parallel: false,
            verbose: false,
            paths: Vec::new(),
        }
    }
}

/// One thing to format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn label(&self) -> PathBuf {
        match self {
            Input::Stdin => PathBuf::from("<stdin>"),
            Input::File(path) => path.clone(),
        }
    }

    /// Directory whose style files apply to this input.
    fn style_dir(&self) -> PathBuf {
        match self {
            Input::Stdin => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            Input::File(path) => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }
}

/// A formatted input.
struct Formatted {
    input: Input,
    original: String,
    formatted: String,
}

impl Formatted {
    fn changed(&self) -> bool {
        self.original != self.formatted
    }
}

/// Run the format command and return the process exit code.
pub fn run_format(args: &[String]) -> i32 {
    let config = match parse_args(args) {
        Ok(Some(config)) => config,
        Ok(None) => return 0,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Run 'weft fmt --help' for usage");
            return 1;
        }
    };
    crate::init_tracing(config.verbose);

    let (inputs, mut errors) = collect_inputs(&config.paths);
    let jobs = match resolve_styles(&config, inputs) {
        Ok(jobs) => jobs,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    tracing::debug!(files = jobs.len(), parallel = config.parallel, "formatting");

    let results: Vec<Result<Formatted, CliError>> = if config.parallel {
        jobs.par_iter()
            .map(|(input, style)| format_input(input, style, &config))
            .collect()
    } else {
        jobs.iter()
            .map(|(input, style)| format_input(input, style, &config))
            .collect()
    };

    let mut changed = 0usize;
    let mut unchanged = 0usize;
    let mut stdout = io::stdout().lock();
    let mut stdout_open = true;
    for result in results {
        match result {
            Ok(file) => {
                if file.changed() {
                    changed += 1;
                } else {
                    unchanged += 1;
                }
                if stdout_open {
                    stdout_open = record_write(report(&mut stdout, &file, config.mode), &mut errors);
                }
            }
            Err(err) => errors.push(err),
        }
    }
    if stdout_open {
        record_write(stdout.flush(), &mut errors);
    }

    if matches!(config.mode, Mode::Check | Mode::InPlace) && changed + unchanged > 1 {
        let verb = if config.mode == Mode::Check {
            "would be reformatted"
        } else {
            "reformatted"
        };
        eprintln!("{changed} {verb}, {unchanged} unchanged");
    }
    for err in &errors {
        eprintln!("error: {err}");
        if let CliError::Format { source, .. } = err {
            if !source.is_input_error() {
                eprintln!("note: this is a formatter bug; the input was left unchanged");
            }
        }
    }

    let check_failed = config.mode == Mode::Check && changed > 0;
    i32::from(check_failed || !errors.is_empty())
}

/// Write what `mode` shows for one file. A closed stdout surfaces as
/// `BrokenPipe`.
fn report(out: &mut impl Write, file: &Formatted, mode: Mode) -> io::Result<()> {
    match mode {
        Mode::Print => out.write_all(file.formatted.as_bytes()),
        Mode::Check if file.changed() => writeln!(out, "would reformat {}", file.input.label().display()),
        Mode::Diff if file.changed() => {
            let label = file.input.label();
            let diff = unified_diff(&file.original, &file.formatted, &label.to_string_lossy());
            out.write_all(diff.as_bytes())
        }
        Mode::InPlace if file.changed() => {
            eprintln!("reformatted {}", file.input.label().display());
            Ok(())
        }
        Mode::Check | Mode::Diff | Mode::InPlace => Ok(()),
    }
}

/// Keep a failed stdout write as an error, unless the reader went away.
/// Returns whether stdout is still worth writing to.
fn record_write(result: io::Result<()>, errors: &mut Vec<CliError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => false,
        Err(err) => {
            errors.push(CliError::io("<stdout>", err));
            false
        }
    }
}

/// Parse `weft fmt` arguments. `Ok(None)` means help was printed.
pub fn parse_args(args: &[String]) -> Result<Option<FormatConfig>, CliError> {
    let mut config = FormatConfig::default();
    let mut modes = Vec::new();
    let mut lines: Option<LineRanges> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_owned())),
            _ => (arg.as_str(), None),
        };
        let mut value = |name: &str| -> Result<String, CliError> {
            inline
                .clone()
                .or_else(|| iter.next().cloned())
                .ok_or_else(|| CliError::Usage(format!("{name} requires a value")))
        };
        match flag {
            "--check" => modes.push(Mode::Check),
            "-d" | "--diff" => modes.push(Mode::Diff),
            "-i" | "--in-place" => modes.push(Mode::InPlace),
            "--style" => config.style = Some(value("--style")?),
            "-l" | "--lines" => {
                let range: LineRanges = value("--lines")?
                    .parse()
                    .map_err(|err: weft_fmt::LineRangeError| CliError::Usage(err.to_string()))?;
                lines.get_or_insert_with(LineRanges::new).extend([range]);
            }
            "--no-verify" => config.verify = false,
            "-p" | "--parallel" => config.parallel = true,
            "-v" | "--verbose" => config.verbose = true,
            "-h" | "--help" => {
                print_fmt_help();
                return Ok(None);
            }
            "-" => config.paths.push(arg.clone()),
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option: {flag}")));
            }
            _ => config.paths.push(arg.clone()),
        }
    }

    match modes.as_slice() {
        [] => {}
        [mode] => config.mode = *mode,
        _ => {
            return Err(CliError::Usage(
                "--check, --diff and --in-place are mutually exclusive".to_owned(),
            ))
        }
    }
    if config.paths.is_empty() {
        return Err(CliError::Usage("no input files (use `-` to read stdin)".to_owned()));
    }
    let stdin = config.paths.iter().any(|path| path == "-");
    if stdin && config.paths.len() > 1 {
        return Err(CliError::Usage("`-` cannot be combined with other paths".to_owned()));
    }
    if stdin && config.mode == Mode::InPlace {
        return Err(CliError::Usage("cannot rewrite stdin in place".to_owned()));
    }
    if lines.is_some() && (config.paths.len() > 1 || Path::new(&config.paths[0]).is_dir()) {
        return Err(CliError::Usage("--lines applies to a single file".to_owned()));
    }
    config.lines = lines;
    Ok(Some(config))
}

/// Expand the command-line paths into inputs. Paths that do not exist are
/// reported without stopping the batch.
pub fn collect_inputs(paths: &[String]) -> (Vec<Input>, Vec<CliError>) {
    let mut inputs = Vec::new();
    let mut errors = Vec::new();
    for path in paths {
        if path == "-" {
            inputs.push(Input::Stdin);
            continue;
        }
        let path = PathBuf::from(path);
        if path.is_dir() {
            let mut files = Vec::new();
            visit_py_files(&path, &mut files, &mut errors);
            files.sort();
            inputs.extend(files.into_iter().map(Input::File));
        } else if path.is_file() {
            inputs.push(Input::File(path));
        } else {
            let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory");
            errors.push(CliError::io(path, source));
        }
    }
    (inputs, errors)
}

/// Collect `*.py` files below `dir`, skipping hidden entries and
/// `__pycache__`.
fn visit_py_files(dir: &Path, files: &mut Vec<PathBuf>, errors: &mut Vec<CliError>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            errors.push(CliError::io(dir, source));
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') || name == "__pycache__" {
                continue;
            }
        }
        if path.is_dir() {
            visit_py_files(&path, files, errors);
        } else if path.extension().is_some_and(|ext| ext == "py") {
            files.push(path);
        }
    }
}

/// Pair every input with its style. Fails on the first unusable style.
fn resolve_styles(config: &FormatConfig, inputs: Vec<Input>) -> Result<Vec<(Input, Arc<Style>)>, CliError> {
    let mut resolver = match &config.style {
        Some(value) => StyleResolver::fixed(load_style_arg(value)?),
        None => StyleResolver::discover(),
    };
    inputs
        .into_iter()
        .map(|input| {
            let style = resolver.resolve(&input.style_dir())?;
            Ok((input, style))
        })
        .collect()
}

fn format_input(input: &Input, style: &Style, config: &FormatConfig) -> Result<Formatted, CliError> {
    let bytes = match input {
        Input::Stdin => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|source| CliError::io(input.label(), source))?;
            bytes
        }
        Input::File(path) => std::fs::read(path).map_err(|source| CliError::io(path, source))?,
    };
    let encoding_error = |source| CliError::Encoding {
        path: input.label(),
        source,
    };
    let (original, encoding) = source::decode(bytes).map_err(encoding_error)?;

    let options = FormatOptions {
        lines: config.lines.clone(),
        verify: config.verify,
        ..FormatOptions::default()
    };
    let formatted = format_source(&original, style, &options).map_err(|source| CliError::Format {
        path: input.label(),
        source,
    })?;
    let formatted = restore_line_endings(&original, formatted);

    if let (Mode::InPlace, Input::File(path)) = (config.mode, input) {
        if formatted != original {
            let bytes = source::encode(&formatted, encoding).map_err(encoding_error)?;
            std::fs::write(path, bytes).map_err(|source| CliError::io(path, source))?;
        }
    }
    Ok(Formatted {
        input: input.clone(),
        original,
        formatted,
    })
}

/// Give `formatted` the line endings of `original`, judged by its first
/// line break.
fn restore_line_endings(original: &str, formatted: String) -> String {
    let crlf = original
        .find('\n')
        .is_some_and(|index| original[..index].ends_with('\r'));
    if crlf {
        formatted.replace('\n', "\r\n")
    } else {
        formatted
    }
}

fn print_fmt_help() {
    println!("Format Python source files");
    println!();
    println!("Usage: weft fmt [options] <paths...|->");
    println!();
    println!("Arguments:");
    println!("  paths              Files or directories to format; `-` reads stdin");
    println!("                     Sources are UTF-8 unless a coding comment declares");
    println!("                     latin-1; other encodings are rejected");
    println!();
    println!("Options:");
    println!("  --check            List files that would change (exit 1 if any)");
    println!("  -d, --diff         Print a unified diff instead of the formatted text");
    println!("  -i, --in-place     Rewrite files that change");
    println!("  --style <style>    Preset (pep8, google, facebook) or style file");
    println!("  -l, --lines <A-B>  Only format these lines (repeatable, single file)");
    println!("  --no-verify        Skip re-parsing the formatted output");
    println!("  -p, --parallel     Format files in parallel");
    println!("  -v, --verbose      Log formatter decisions to stderr");
    println!("  -h, --help         Show this help message");
    println!();
    println!("Style files:");
    println!("  Without --style, the nearest .weft.toml ([style]) or pyproject.toml");
    println!("  ([tool.weft]) above each file configures it. Default: pep8.");
    println!();
    println!("Examples:");
    println!("  weft fmt main.py                 # Print formatted main.py");
    println!("  weft fmt -i -p src/              # Reformat a tree in place");
    println!("  weft fmt --check .               # Check formatting in CI");
    println!("  weft fmt --lines 10-20 main.py   # Format part of a file");
    println!("  cat main.py | weft fmt -         # Format stdin to stdout");
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state for clear failure messages"
)]
