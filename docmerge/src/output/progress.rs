//! Terminal progress bar for the merge loop.
//!
//! The merge engine reports `(current, total, message)` tuples; the bar
//! renders them in place on stdout when stdout is a terminal.
//!
//! # Examples
//!
//! ```
//! use docmerge::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(3, ProgressStyle::Bar);
//! for i in 1..=3 {
//!     progress.report(i, 3, "Merging");
//! }
//! progress.finish();
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 30;

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// `[=====>    ] 50% 2/4`
    Bar,
    /// Spinner with elapsed time, for unknown totals
    Spinner,
    /// `2/4`
    Counter,
}

/// Progress indicator for document merging.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    message: Option<String>,
    start_time: Instant,
    last_update: Instant,
    update_interval: Duration,
    enabled: bool,
    spinner_frame: usize,
}

impl ProgressBar {
    /// Create a new progress bar, enabled when stdout is a terminal.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(80),
            enabled: Self::is_terminal(),
            spinner_frame: 0,
        }
    }

    /// Bar style for a known total, spinner otherwise.
    pub fn auto(total: usize) -> Self {
        let style = if total > 0 {
            ProgressStyle::Bar
        } else {
            ProgressStyle::Spinner
        };
        Self::new(total, style)
    }

    /// A progress bar that never prints.
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// True when the bar writes to the terminal.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the message shown next to the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Apply one progress report from the merge engine.
    ///
    /// Reports arriving faster than the refresh interval are folded into the
    /// next render, except the final one.
    pub fn report(&mut self, current: usize, total: usize, message: &str) {
        self.total = total;
        self.current = current.min(total);
        self.message = Some(message.to_string());

        if self.last_update.elapsed() < self.update_interval && self.current < self.total {
            return;
        }

        self.last_update = Instant::now();
        self.render();
    }

    /// Move to an absolute position without changing the message.
    pub fn update(&mut self, current: usize) {
        let message = self.message.clone().unwrap_or_default();
        self.report(current, self.total, &message);
    }

    /// Advance by one.
    pub fn increment(&mut self) {
        self.update(self.current + 1);
    }

    /// Fill the bar and end the line.
    pub fn finish(&mut self) {
        self.current = self.total;
        if self.enabled {
            self.render();
            println!();
        }
    }

    /// Erase the bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&mut self) {
        if !self.enabled {
            return;
        }

        let output = self.render_line();
        print!("\r\x1b[K{output}");
        io::stdout().flush().ok();
    }

    fn render_line(&mut self) -> String {
        let elapsed = format_duration(self.start_time.elapsed());
        let mut parts = match self.style {
            ProgressStyle::Bar => vec![
                self.render_bar(),
                format!("{:.0}%", self.percent()),
                format!("{}/{}", self.current, self.total),
                elapsed,
            ],
            ProgressStyle::Spinner => {
                let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
                let frame = frames[self.spinner_frame % frames.len()];
                self.spinner_frame += 1;
                vec![frame.to_string(), elapsed]
            }
            ProgressStyle::Counter => vec![format!("{}/{}", self.current, self.total), elapsed],
        };

        if let Some(ref msg) = self.message {
            parts.insert(0, msg.clone());
        }

        parts.join(" ")
    }

    fn render_bar(&self) -> String {
        let filled = (BAR_WIDTH * self.current) / self.total.max(1);
        let head = if filled > 0 && filled < BAR_WIDTH { ">" } else { "" };
        let body = if head.is_empty() { filled } else { filled - 1 };
        format!(
            "[{}{}{}]",
            "=".repeat(body),
            head,
            " ".repeat(BAR_WIDTH - filled)
        )
    }

    /// Completion as a percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Time since the bar was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
