//! Stage status lines for TTY runs, and number formatting for summaries.
//!
//! TTY mode: one spinner per analysis stage.
//! Non-TTY mode: hidden bars; the log lines are the only progress output.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Steps of one `citeline analyze` run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Analyze,
    Report,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Analyze => "analyze",
            Self::Report => "report",
        }
    }
}

/// Owns the `MultiProgress` that stage spinners and the log bridge share.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Create new context, detecting TTY on stderr.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    /// Spinner line for one stage. Hidden when stderr is not a terminal.
    ///
    /// Update with `pb.set_message(...)`, end with `pb.finish_with_message(...)`.
    pub fn stage_line(&self, stage: Stage) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{spinner:.green} {prefix:<8.cyan.bold} {wide_msg} {elapsed:>4}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = self.multi.add(ProgressBar::new_spinner().with_style(style));
        pb.set_prefix(stage.label());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// `MultiProgress` handle for the log bridge.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedProgress = Arc<ProgressContext>;

/// `1234567` -> `"1,234,567"`.
pub fn fmt_num(n: usize) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}
