// Terminal styling for command output

use std::io::IsTerminal;

use colored::{ColoredString, Colorize};

/// Colours are applied only when stdout is a terminal
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputStyle {
    /// Style that never emits color codes
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    fn marked(&self, marker: &str, paint: fn(&str) -> ColoredString, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", paint(marker), msg)
        } else {
            format!("{} {}", marker, msg)
        }
    }

    pub fn success(&self, msg: &str) -> String {
        self.marked("✓", |m| m.green().bold(), msg)
    }

    pub fn error(&self, msg: &str) -> String {
        self.marked("✗", |m| m.red().bold(), msg)
    }

    pub fn warning(&self, msg: &str) -> String {
        self.marked("⚠", |m| m.yellow(), msg)
    }

    pub fn info(&self, msg: &str) -> String {
        self.marked("ℹ", |m| m.blue(), msg)
    }

    /// Generated file path
    pub fn path(&self, path: &str) -> String {
        if self.use_colors {
            path.cyan().to_string()
        } else {
            path.to_string()
        }
    }

    /// `verb path` line for one written or planned file
    pub fn file_action(&self, verb: &str, path: &str) -> String {
        self.success(&format!("{} {}", verb, self.path(path)))
    }

    /// Heading underlined to its own width
    pub fn section(&self, title: &str) -> String {
        let rule = "─".repeat(title.chars().count());
        if self.use_colors {
            format!("\n{}\n{}", title.bold().underline(), rule)
        } else {
            format!("\n{}\n{}", title, rule)
        }
    }

    pub fn list_item(&self, item: &str) -> String {
        format!("  • {}", item)
    }

    pub fn key_value(&self, key: &str, value: &str) -> String {
        let key = if self.use_colors {
            key.bold().to_string()
        } else {
            key.to_string()
        };
        format!("  {}: {}", key, value)
    }
}

/// Print `msg` to stderr as an error line
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}
