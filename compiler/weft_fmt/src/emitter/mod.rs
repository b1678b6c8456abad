//! Output emitter.
//!
//! The renderer writes formatted lines through an [`Emitter`]. Lines are
//! written without their terminator; the emitter owns line breaks so that
//! blank lines never carry indentation and the output ends with exactly one
//! newline.

/// Sink for formatted output.
pub(crate) trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Write `count` line breaks; more than one leaves blank lines.
    fn emit_newlines(&mut self, count: usize);

    /// Emit indentation as the given number of spaces.
    fn emit_indent(&mut self, spaces: usize);
}

/// String-based emitter for in-memory formatting.
#[derive(Default)]
pub(crate) struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        StringEmitter {
            buffer: String::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The formatted text, ending in a single newline unless empty.
    pub fn output(mut self) -> String {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newlines(&mut self, count: usize) {
        for _ in 0..count {
            self.buffer.push('\n');
        }
    }

    fn emit_indent(&mut self, spaces: usize) {
        for _ in 0..spaces {
            self.buffer.push(' ');
        }
    }
}

#[cfg(test)]
mod tests;
