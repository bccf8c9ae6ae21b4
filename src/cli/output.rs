//! Colored output helpers for the CLI

use owo_colors::OwoColorize;

/// Terminal printer; plain text when colors are off.
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "relay".bright_cyan().bold(),
                version.dimmed(),
                "intent routing for tool-using assistants".bright_white()
            );
        } else {
            println!("\n   relay {}\n   intent routing for tool-using assistants\n", version);
        }
    }

    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// A tool name with its description underneath.
    pub fn tool(&self, name: &str, description: &str, args: &str) {
        if self.colored {
            println!("    {} {}", name.bright_cyan().bold(), args.dimmed());
            println!("      {}", description);
        } else {
            println!("    - {} {}", name, args);
            println!("      {}", description);
        }
    }

    /// The orchestrator's answer to a one-shot query.
    pub fn answer(&self, query: &str, result: &str) {
        if self.colored {
            println!("\n  {} {}", "?".bright_yellow().bold(), query.bright_white());
            println!("  {} {}\n", "→".green().bold(), result);
        } else {
            println!("\n  Q: {}\n  A: {}\n", query, result);
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }
}
