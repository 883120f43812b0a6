//! Indentation-aware output buffer shared by renderers

const INDENT: &str = "  ";

/// Quote `value` as a double-quoted string literal
pub fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

/// Output buffer renderers write lines into
///
/// Lines are indented with two spaces per level. Opaque text passed to
/// [`CodeBuffer::lines`] or [`CodeBuffer::assignment`] is never trimmed, and a
/// line that starts inside a multi-line template literal is written exactly
/// as given, so literal contents survive byte for byte.
#[derive(Debug, Clone, Default)]
pub struct CodeBuffer {
    out: String,
    level: usize,
}

impl CodeBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            self.indent();
        }
        self.out.push_str(text);
        self.out.push('\n');
        self
    }

    fn indent(&mut self) {
        for _ in 0..self.level {
            self.out.push_str(INDENT);
        }
    }

    /// Write opaque multi-line `text` at the current indentation
    ///
    /// Trailing blank lines are dropped unless they sit inside a template
    /// literal.
    pub fn lines(&mut self, text: &str) -> &mut Self {
        self.opaque(None, text)
    }

    /// Write `prefix` followed by an opaque, possibly multi-line expression
    pub fn assignment(&mut self, prefix: &str, expression: &str) -> &mut Self {
        self.opaque(Some(prefix), expression)
    }

    fn opaque(&mut self, prefix: Option<&str>, text: &str) -> &mut Self {
        let mut lines = literal_lines(text);
        while lines.len() > 1 {
            match lines.last() {
                Some((line, false)) if line.trim().is_empty() => {
                    lines.pop();
                }
                _ => break,
            }
        }
        if lines.len() == 1 && lines[0].0.trim().is_empty() && !lines[0].1 {
            if let Some(prefix) = prefix {
                self.line(prefix.trim_end());
            }
            return self;
        }

        for (index, (line, in_literal)) in lines.into_iter().enumerate() {
            match (index, prefix) {
                (0, Some(prefix)) => {
                    self.line(format!("{}{}", prefix, line));
                }
                _ if in_literal => {
                    self.out.push_str(line);
                    self.out.push('\n');
                }
                _ => {
                    self.line(line);
                }
            }
        }
        self
    }

    /// Write a blank separator line, never two in a row
    pub fn blank_line(&mut self) -> &mut Self {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
        self
    }

    /// Write a `/** ... */` doc comment; single-line text stays on one line
    pub fn doc(&mut self, text: &str) -> &mut Self {
        let text = escape_comment(text.trim());
        let text = text.as_str();
        if text.is_empty() {
            return self;
        }
        if text.contains('\n') {
            self.doc_block(text)
        } else {
            self.line(format!("/** {} */", text))
        }
    }

    /// Write a multi-line `/** ... */` doc comment
    pub fn doc_block(&mut self, text: &str) -> &mut Self {
        self.line("/**");
        for line in escape_comment(text.trim()).lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line(" *");
            } else {
                self.line(format!(" * {}", line));
            }
        }
        self.line(" */")
    }

    /// Run `f` one indentation level deeper
    pub fn indented<E>(&mut self, f: impl FnOnce(&mut Self) -> Result<(), E>) -> Result<(), E> {
        self.level += 1;
        let result = f(self);
        self.level -= 1;
        result
    }

    /// Write `open`, run `f` indented, then write `close`
    pub fn block<E>(
        &mut self,
        open: &str,
        close: &str,
        f: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), E> {
        self.line(open);
        self.indented(f)?;
        self.line(close);
        Ok(())
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Current contents
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume the buffer, dropping trailing blank lines
    pub fn finish(self) -> String {
        let mut out = self.out;
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out
    }
}

/// Keep `*/` inside comment text from closing the comment
fn escape_comment(text: &str) -> String {
    text.replace("*/", "*\\/")
}

enum Scan {
    Code { braces: usize },
    Template,
}

/// Split `text` on `\n`, pairing each line with whether it starts inside a
/// template literal
///
/// Tracks backticks, `${ ... }` substitutions, quoted strings and `//`
/// comments well enough for generated TypeScript.
fn literal_lines(text: &str) -> Vec<(&str, bool)> {
    let mut stack = vec![Scan::Code { braces: 0 }];
    let mut lines = Vec::new();

    for line in text.split('\n') {
        lines.push((line, matches!(stack.last(), Some(Scan::Template))));
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if matches!(stack.last(), Some(Scan::Template)) {
                match c {
                    '\\' => {
                        chars.next();
                    }
                    '`' => {
                        stack.pop();
                    }
                    '$' if chars.peek() == Some(&'{') => {
                        chars.next();
                        stack.push(Scan::Code { braces: 0 });
                    }
                    _ => {}
                }
                continue;
            }

            match c {
                '`' => stack.push(Scan::Template),
                '{' => {
                    if let Some(Scan::Code { braces }) = stack.last_mut() {
                        *braces += 1;
                    }
                }
                '}' => {
                    let nested = matches!(stack.last(), Some(Scan::Code { braces }) if *braces > 0);
                    if nested {
                        if let Some(Scan::Code { braces }) = stack.last_mut() {
                            *braces -= 1;
                        }
                    } else if stack.len() > 1 {
                        stack.pop();
                    }
                }
                '\'' | '"' => {
                    while let Some(next) = chars.next() {
                        if next == '\\' {
                            chars.next();
                        } else if next == c {
                            break;
                        }
                    }
                }
                '/' if chars.peek() == Some(&'/') => break,
                _ => {}
            }
        }
    }
    lines
}
