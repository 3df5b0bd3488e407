// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output helpers. Colors are used only on a TTY without `--plain`.

use std::io::IsTerminal;

use colored::Colorize;

pub struct Output {
    color: bool,
}

impl Output {
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn success(&self, message: &str) {
        if self.color {
            println!("{} {message}", "✓".green());
        } else {
            println!("[OK] {message}");
        }
    }

    pub fn warn(&self, message: &str) {
        if self.color {
            println!("{} {}", "!".yellow(), message.yellow());
        } else {
            println!("[WARN] {message}");
        }
    }

    pub fn error(&self, message: &str) {
        if self.color {
            eprintln!("{} {message}", "error:".red().bold());
        } else {
            eprintln!("error: {message}");
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
