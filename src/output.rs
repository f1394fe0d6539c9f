//! Output mode selection and shared styling for `td`.
//!
//! JSON goes to stdout untouched, plain mode prints unstyled text, and rich
//! mode styles output through `rich_rust` when stdout is a terminal.

use std::io::IsTerminal;

use rich_rust::prelude::*;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Plain,
    Rich,
    Json,
}

/// Styles used by rich renderers.
#[derive(Clone)]
pub struct Theme {
    pub emphasis: Style,
    pub dimmed: Style,
    pub section: Style,
    pub accent: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub panel_title: Style,
}

fn color(name: &str) -> Color {
    Color::parse(name).unwrap_or_default()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            emphasis: Style::new().bold().color(color("cyan")),
            dimmed: Style::new().dim(),
            section: Style::new().bold(),
            accent: Style::new().color(color("blue")),
            success: Style::new().color(color("green")),
            warning: Style::new().color(color("yellow")),
            error: Style::new().bold().color(color("red")),
            panel_title: Style::new().bold().color(color("magenta")),
        }
    }
}

/// Resolved output settings for one invocation.
#[derive(Clone)]
pub struct OutputContext {
    mode: OutputMode,
    width: usize,
    theme: Theme,
}

const FALLBACK_WIDTH: usize = 80;

impl OutputContext {
    /// Pick the mode from flags: `--json` beats `--plain`; without either,
    /// rich output is used only when stdout is a terminal.
    #[must_use]
    pub fn from_flags(json: bool, plain: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else if plain || !std::io::stdout().is_terminal() {
            OutputMode::Plain
        } else {
            OutputMode::Rich
        };
        Self::new(mode)
    }

    #[must_use]
    pub fn new(mode: OutputMode) -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .ok()
            .filter(|cols| *cols >= 20)
            .unwrap_or(FALLBACK_WIDTH);
        Self {
            mode,
            width,
            theme: Theme::default(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    #[must_use]
    pub const fn is_rich(&self) -> bool {
        matches!(self.mode, OutputMode::Rich)
    }

    /// Terminal width in columns (80 when unknown).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Print a value as pretty JSON on stdout.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(payload) => println!("{payload}"),
            Err(err) => tracing::error!(error = %err, "failed to serialize output"),
        }
    }

    /// Print a one-line status message in the active mode.
    ///
    /// JSON mode prints nothing; commands emit their own JSON payloads.
    pub fn message(&self, text: &str) {
        match self.mode {
            OutputMode::Json => {}
            OutputMode::Plain => println!("{text}"),
            OutputMode::Rich => {
                let mut line = Text::new("");
                line.append_styled(text, self.theme.success.clone());
                Console::default().print_renderable(&line);
            }
        }
    }

    /// Print a warning-styled line (stdout, not in JSON mode).
    pub fn notice(&self, text: &str) {
        match self.mode {
            OutputMode::Json => {}
            OutputMode::Plain => println!("{text}"),
            OutputMode::Rich => {
                let mut line = Text::new("");
                line.append_styled(text, self.theme.warning.clone());
                Console::default().print_renderable(&line);
            }
        }
    }
}
