//! Terminal logging with colored module prefixes and a transient save status.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for diagnostics that only show with `--verbose`
//! - `StatusLine` for the overwriting "saving / saved / failed" display
//!
//! # Example
//!
//! ```ignore
//! log!("validate"; "{} errors", count);
//! debug!("index"; "subtab {} skipped", id);
//!
//! status_saving("acme/store.example.com");
//! status_saved("acme/store.example.com");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "index" => prefix.bright_blue().bold().to_string(),
        "save" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "validate" => prefix.bright_magenta().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status Line (single-block status with overwrite)
// ============================================================================

/// Current UTC wall clock formatted as HH:MM:SS
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Overwriting status display for the save lifecycle
///
/// Each message replaces the previous one, so a "saving" line is turned
/// into "saved" or "failed" in place once the persistence call settles.
pub struct StatusLine {
    /// Lines of previous output to clear
    last_lines: usize,
}

/// Global status display shared by every command that saves.
static STATUS_LINE: LazyLock<Mutex<StatusLine>> = LazyLock::new(|| Mutex::new(StatusLine::new()));

impl StatusLine {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// In-flight message (… prefix, dimmed).
    pub fn pending(&mut self, message: &str) {
        self.display(format!("{}", "…".dimmed()), message);
    }

    /// Success message (✓ prefix, green).
    pub fn success(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Error message (✗ prefix, red) with optional detail.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = format!("[{}]", now()).dimmed().to_string();
        writeln!(stdout, "{timestamp} {symbol} {message}").ok();
        stdout.flush().ok();

        self.last_lines = message.matches('\n').count() + 1;
    }

    /// Forget the previous block so the next message starts on a new line.
    pub fn detach(&mut self) {
        self.last_lines = 0;
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Global status: save started
pub fn status_saving(target: &str) {
    STATUS_LINE.lock().pending(&format!("saving {target}"));
}

/// Global status: save finished
pub fn status_saved(target: &str) {
    let mut line = STATUS_LINE.lock();
    line.success(&format!("saved {target}"));
    line.detach();
}

/// Global status: save failed
pub fn status_failed(target: &str, detail: &str) {
    let mut line = STATUS_LINE.lock();
    line.error(&format!("failed to save {target}"), detail);
    line.detach();
}
