///
/// SourceWriter
///
/// Line-oriented text builder with four-space indentation. Consecutive blank
/// lines collapse into one.
///

#[derive(Debug, Default)]
pub struct SourceWriter {
    buf: String,
    indent: usize,
}

impl SourceWriter {
    const INDENT: &'static str = "    ";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.buf.push_str(Self::INDENT);
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }

    pub const fn indent(&mut self) {
        self.indent += 1;
    }

    pub const fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// `header {`, the indented body, then `}`.
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.line(format!("{} {{", header.as_ref()));
        self.indent();
        body(self);
        self.dedent();
        self.line("}");
    }

    /// Finish, trimming any trailing blank line.
    #[must_use]
    pub fn finish(mut self) -> String {
        while self.buf.ends_with("\n\n") {
            self.buf.pop();
        }

        self.buf
    }
}

///
/// TESTS
///
