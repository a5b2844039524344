//! # Output Configuration
//!
//! Controls the appearance of the one-line user-facing messages the CLI
//! prints: whether emojis/colors are used, and whether success output is
//! suppressed entirely (`--quiet`).
//!
//! Color detection respects the usual conventions:
//! - `--color=never|always` - explicit CLI override
//! - `NO_COLOR` - disables colors when set (per https://no-color.org/)
//! - `TERM=dumb` - disables colors for dumb terminals
//! - otherwise the `console` crate's TTY detection decides

use std::env;

/// Output configuration for the CLI surface.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether emojis should decorate output.
    pub use_color: bool,
    /// Whether success messages are suppressed.
    pub quiet: bool,
}

impl OutputConfig {
    /// Build a configuration from the `--color` flag value (`always`,
    /// `never`, or `auto`) and the command's quiet flag.
    pub fn from_env_and_flags(color_flag: &str, quiet: bool) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color, quiet }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even empty) disables colors.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Print a one-line success message, unless quiet was requested.
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color {
            println!("✅ {}", message);
        } else {
            println!("{}", message);
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            use_color: false,
            quiet: false,
        }
    }
}
