use owo_colors::{OwoColorize, Rgb};
use spinoff::{spinners, Color as SpinoffColor, Spinner};

pub const ICON_SUCCESS: &str = "✓";
pub const ICON_WARNING: &str = "⚠";
pub const ICON_INFO: &str = "ℹ";
pub const ICON_POINTER: &str = "→";
pub const SEPARATOR: &str = "─";

pub fn primary() -> Rgb {
    Rgb(114, 227, 173)
}

pub fn warning() -> Rgb {
    Rgb(245, 158, 11)
}

pub fn info() -> Rgb {
    Rgb(59, 130, 246)
}

pub fn success() -> Rgb {
    Rgb(114, 227, 173)
}

pub fn primary_spinoff() -> SpinoffColor {
    SpinoffColor::TrueColor {
        r: 114,
        g: 227,
        b: 173,
    }
}

pub fn dimmed(text: &str) -> String {
    format!("{}", text.dimmed())
}

pub fn separator(width: usize) -> String {
    format!("{}", SEPARATOR.repeat(width).dimmed())
}

pub fn header(text: &str) -> String {
    format!("\n{}\n{}", text.bold().color(primary()), separator(60))
}

pub fn success_icon() -> String {
    format!("{}", ICON_SUCCESS.color(success()).bold())
}

pub fn warning_icon() -> String {
    format!("{}", ICON_WARNING.color(warning()).bold())
}

pub fn info_icon() -> String {
    format!("{}", ICON_INFO.color(info()).bold())
}

pub fn pointer_icon() -> String {
    format!("{}", ICON_POINTER.color(primary()))
}

pub fn success_message(msg: &str) -> String {
    format!("{} {}", success_icon(), msg)
}

pub fn warning_message(msg: &str) -> String {
    format!("{} {}", warning_icon(), msg)
}

pub fn info_message(msg: &str) -> String {
    format!("{} {}", info_icon(), msg)
}

pub fn step_message(msg: &str) -> String {
    format!("{} {}", pointer_icon(), msg.dimmed())
}

pub fn highlight(text: &str) -> String {
    format!("{}", text.color(primary()).bold())
}

/// Spinner shown while a phase runs; silent when stdout is not a terminal.
pub struct PhaseSpinner {
    spinner: Option<Spinner>,
}

impl PhaseSpinner {
    pub fn new(message: impl Into<String>) -> Self {
        use std::io::{stdout, IsTerminal};

        let spinner = if stdout().is_terminal() {
            Some(Spinner::new(
                spinners::Arc,
                format!("  └─ {}", message.into()),
                Some(primary_spinoff()),
            ))
        } else {
            None
        };

        Self { spinner }
    }

    pub fn finish(self) {
        if let Some(mut spinner) = self.spinner {
            spinner.clear();
        }
    }
}
