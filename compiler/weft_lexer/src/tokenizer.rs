//! Line-oriented tokenizer.
//!
//! Source is consumed one physical line at a time. Indentation is measured
//! only at the start of a logical line outside brackets; INDENT and DEDENT
//! tokens are queued before the first token of such a line. Comment-only and
//! blank lines produce COMMENT/NL and never change indentation.

use std::collections::VecDeque;

use weft_grammar::TokenKind;

use crate::{LexError, LexErrorKind, Pos, Token};

/// Indentation width of a tab stop.
const TAB_SIZE: u32 = 8;

/// A string literal that continues past the end of its line.
#[derive(Clone, Copy, Debug)]
struct OpenString {
    start: Pos,
    line_start: usize,
    quote: &'static str,
}

enum StringScan {
    /// Byte offset just past the closing quote.
    Closed(usize),
    /// The literal runs past the end of the line.
    Open,
    /// A single-quoted literal hit an unescaped newline.
    Broken,
}

/// Lazy tokenizer over `\n`-terminated source text.
///
/// Cloning a tokenizer yields an independent cursor that replays the
/// remaining stream from the same point.
#[derive(Clone, Debug)]
pub struct Tokenizer<'src> {
    src: &'src str,
    line_starts: Vec<usize>,
    next_line: usize,
    pending: VecDeque<Token<'src>>,
    indents: Vec<u32>,
    depth: u32,
    continued: bool,
    string: Option<OpenString>,
    /// A significant token was emitted since the last NEWLINE.
    line_open: bool,
    finished: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(src: &'src str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', src.as_bytes()).map(|nl| nl + 1));
        if line_starts.last() == Some(&src.len()) {
            line_starts.pop();
        }
        Tokenizer {
            src,
            line_starts,
            next_line: 0,
            pending: VecDeque::new(),
            indents: vec![0],
            depth: 0,
            continued: false,
            string: None,
            line_open: false,
            finished: false,
        }
    }

    fn line_bounds(&self, index: usize) -> (usize, usize) {
        let start = self.line_starts[index];
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.src.len());
        (start, end)
    }

    fn pos(line_no: u32, line_start: usize, line: &str, byte: usize) -> Pos {
        Pos {
            line: line_no,
            column: line[..byte].chars().count() as u32,
            offset: line_start + byte,
        }
    }

    fn error(kind: LexErrorKind, at: Pos) -> LexError {
        LexError::new(kind, at.line, at.column + 1)
    }

    fn emit(&mut self, kind: TokenKind, text: &'src str, start: Pos, end: Pos, line: &'src str) {
        if !matches!(
            kind,
            TokenKind::Comment | TokenKind::Nl | TokenKind::Indent | TokenKind::Dedent
        ) {
            self.line_open = kind != TokenKind::Newline;
        }
        self.pending.push_back(Token {
            kind,
            text,
            start,
            end,
            line,
        });
    }

    fn process_line(&mut self, index: usize) -> Result<(), LexError> {
        let (line_start, line_end) = self.line_bounds(index);
        let line: &'src str = &self.src[line_start..line_end];
        let line_no = index as u32 + 1;
        let at = |byte: usize| Self::pos(line_no, line_start, line, byte);
        let mut pos = 0;

        if let Some(open) = self.string.take() {
            match scan_string_end(line, 0, open.quote) {
                StringScan::Closed(close) => {
                    let text = &self.src[open.start.offset..line_start + close];
                    let physical = &self.src[open.line_start..line_end];
                    self.emit(TokenKind::String, text, open.start, at(close), physical);
                    pos = close;
                }
                StringScan::Open => {
                    self.string = Some(open);
                    return Ok(());
                }
                StringScan::Broken => {
                    return Err(Self::error(LexErrorKind::UnterminatedString, open.start));
                }
            }
        } else if self.depth == 0 && !self.continued {
            let (column, indent_end) = measure_indent(line);
            let rest = &line[indent_end..];
            if rest.starts_with('#') {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.emit(
                    TokenKind::Comment,
                    &rest[..len],
                    at(indent_end),
                    at(indent_end + len),
                    line,
                );
                if rest[len..].starts_with('\n') {
                    self.emit(TokenKind::Nl, "\n", at(indent_end + len), at(indent_end + len + 1), line);
                }
                return Ok(());
            }
            if rest.is_empty() || rest == "\n" {
                if line.ends_with('\n') {
                    let nl = line.len() - 1;
                    self.emit(TokenKind::Nl, "\n", at(nl), at(line.len()), line);
                }
                return Ok(());
            }
            self.indent_to(column, line, at(0), at(indent_end))?;
            pos = indent_end;
        } else {
            self.continued = false;
        }

        self.scan_tokens(line, line_no, line_start, pos)
    }

    /// Queue INDENT/DEDENT tokens moving the indentation stack to `column`.
    fn indent_to(&mut self, column: u32, line: &'src str, start: Pos, end: Pos) -> Result<(), LexError> {
        let top = self.indents.last().copied().unwrap_or(0);
        if column > top {
            self.indents.push(column);
            let text = &line[..end.offset - start.offset];
            self.emit(TokenKind::Indent, text, start, end, line);
            return Ok(());
        }
        while self.indents.last().is_some_and(|&level| column < level) {
            self.indents.pop();
            self.emit(TokenKind::Dedent, "", end, end, line);
        }
        if self.indents.last().copied().unwrap_or(0) != column {
            return Err(Self::error(LexErrorKind::InconsistentDedent, end));
        }
        Ok(())
    }

    fn scan_tokens(
        &mut self,
        line: &'src str,
        line_no: u32,
        line_start: usize,
        mut pos: usize,
    ) -> Result<(), LexError> {
        let at = |byte: usize| Self::pos(line_no, line_start, line, byte);

        while pos < line.len() {
            let rest = &line[pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };
            match c {
                ' ' | '\t' | '\x0c' | '\u{feff}' => pos += c.len_utf8(),
                '#' => {
                    let len = rest.find('\n').unwrap_or(rest.len());
                    self.emit(TokenKind::Comment, &rest[..len], at(pos), at(pos + len), line);
                    pos += len;
                }
                '\n' => {
                    let kind = if self.depth == 0 && self.line_open {
                        TokenKind::Newline
                    } else {
                        TokenKind::Nl
                    };
                    self.emit(kind, "\n", at(pos), at(pos + 1), line);
                    pos += 1;
                }
                '\\' if rest[1..].starts_with('\n') => {
                    self.continued = true;
                    pos += 2;
                }
                c if c.is_ascii_digit()
                    || (c == '.' && rest[1..].starts_with(|d: char| d.is_ascii_digit())) =>
                {
                    let len = number_len(rest);
                    self.emit(TokenKind::Number, &rest[..len], at(pos), at(pos + len), line);
                    pos += len;
                }
                c if c.is_alphabetic() || c == '_' => {
                    let len = rest
                        .char_indices()
                        .find(|&(_, ch)| !(ch.is_alphanumeric() || ch == '_'))
                        .map_or(rest.len(), |(index, _)| index);
                    let after = &rest[len..];
                    if is_string_prefix(&rest[..len]) && after.starts_with(['\'', '"']) {
                        match self.scan_string(line, line_no, line_start, pos, pos + len)? {
                            Some(end) => pos = end,
                            None => return Ok(()),
                        }
                    } else {
                        self.emit(TokenKind::Name, &rest[..len], at(pos), at(pos + len), line);
                        pos += len;
                    }
                }
                '\'' | '"' => match self.scan_string(line, line_no, line_start, pos, pos)? {
                    Some(end) => pos = end,
                    None => return Ok(()),
                },
                _ => {
                    let (kind, len) = operator(rest)
                        .ok_or_else(|| Self::error(LexErrorKind::StrayCharacter(c), at(pos)))?;
                    if kind.is_opening_bracket() {
                        self.depth += 1;
                    } else if kind.is_closing_bracket() {
                        self.depth = self
                            .depth
                            .checked_sub(1)
                            .ok_or_else(|| Self::error(LexErrorKind::UnmatchedBracket(c), at(pos)))?;
                    }
                    self.emit(kind, &rest[..len], at(pos), at(pos + len), line);
                    pos += len;
                }
            }
        }
        Ok(())
    }

    /// Scan a string whose prefix starts at `start` and quote at `quote_at`.
    ///
    /// Returns the byte offset after the literal, or `None` when the literal
    /// continues on the next line.
    fn scan_string(
        &mut self,
        line: &'src str,
        line_no: u32,
        line_start: usize,
        start: usize,
        quote_at: usize,
    ) -> Result<Option<usize>, LexError> {
        let at = |byte: usize| Self::pos(line_no, line_start, line, byte);
        let quote = quote_kind(&line[quote_at..]);
        match scan_string_end(line, quote_at + quote.len(), quote) {
            StringScan::Closed(end) => {
                self.emit(TokenKind::String, &line[start..end], at(start), at(end), line);
                Ok(Some(end))
            }
            StringScan::Open => {
                self.line_open = true;
                self.string = Some(OpenString {
                    start: at(start),
                    line_start,
                    quote,
                });
                Ok(None)
            }
            StringScan::Broken => Err(Self::error(LexErrorKind::UnterminatedString, at(start))),
        }
    }

    fn finish(&mut self) -> Result<(), LexError> {
        let eof_line = self.line_starts.len() as u32 + 1;
        let eof = Pos {
            line: eof_line,
            column: 0,
            offset: self.src.len(),
        };
        if let Some(open) = self.string {
            return Err(Self::error(LexErrorKind::UnterminatedString, open.start));
        }
        if self.depth > 0 || self.continued {
            return Err(Self::error(LexErrorKind::UnexpectedEof, eof));
        }
        if self.line_open {
            let last = self.src.lines().last().unwrap_or("");
            let end = Pos {
                line: eof_line - 1,
                column: last.chars().count() as u32,
                offset: self.src.len(),
            };
            self.emit(TokenKind::Newline, "", end, end, last);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.emit(TokenKind::Dedent, "", eof, eof, "");
        }
        self.emit(TokenKind::Endmarker, "", eof, eof, "");
        Ok(())
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.finished {
                return None;
            }
            let step = if self.next_line < self.line_starts.len() {
                let index = self.next_line;
                self.next_line += 1;
                self.process_line(index)
            } else {
                self.finished = true;
                self.finish()
            };
            if let Err(err) = step {
                self.finished = true;
                self.pending.clear();
                return Some(Err(err));
            }
        }
    }
}

/// Column of the first non-blank character (tabs to 8-column stops, form
/// feed resets) and its byte offset.
fn measure_indent(line: &str) -> (u32, usize) {
    let mut column = 0;
    for (index, c) in line.char_indices() {
        match c {
            ' ' => column += 1,
            '\t' => column = (column / TAB_SIZE + 1) * TAB_SIZE,
            '\x0c' => column = 0,
            _ => return (column, index),
        }
    }
    (column, line.len())
}

fn is_string_prefix(name: &str) -> bool {
    name.len() <= 2
        && matches!(
            name.to_ascii_lowercase().as_str(),
            "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf"
        )
}

fn quote_kind(text: &str) -> &'static str {
    if text.starts_with("'''") {
        "'''"
    } else if text.starts_with("\"\"\"") {
        "\"\"\""
    } else if text.starts_with('\'') {
        "'"
    } else {
        "\""
    }
}

/// Find the end of a string body starting at `from`, honouring escapes.
fn scan_string_end(line: &str, from: usize, quote: &str) -> StringScan {
    let bytes = line.as_bytes();
    let mut index = from;
    while index < bytes.len() {
        if bytes[index] == b'\\' {
            index += 2;
            continue;
        }
        if quote.len() == 1 && bytes[index] == b'\n' {
            return StringScan::Broken;
        }
        if bytes[index..].starts_with(quote.as_bytes()) {
            return StringScan::Closed(index + quote.len());
        }
        index += 1;
    }
    StringScan::Open
}

/// Length of a numeric literal at the start of `text`.
fn number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits = |mut index: usize, hex: bool| {
        while index < bytes.len()
            && (bytes[index] == b'_'
                || if hex {
                    bytes[index].is_ascii_hexdigit()
                } else {
                    bytes[index].is_ascii_digit()
                })
        {
            index += 1;
        }
        index
    };

    if bytes.len() > 1 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B') {
        return digits(2, true);
    }
    let mut index = digits(0, false);
    if bytes.get(index) == Some(&b'.') {
        index = digits(index + 1, false);
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        let mut exponent = index + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        if bytes.get(exponent).is_some_and(u8::is_ascii_digit) {
            index = digits(exponent, false);
        }
    }
    if matches!(bytes.get(index), Some(b'j' | b'J' | b'l' | b'L')) {
        index += 1;
    }
    index
}

/// Longest operator at the start of `text`.
fn operator(text: &str) -> Option<(TokenKind, usize)> {
    (1..=3)
        .rev()
        .find_map(|len| text.get(..len).and_then(TokenKind::from_op).map(|kind| (kind, len)))
}
