//! Console and log-file logging for the versionfile CLI
//!
//! Every record is appended to the run's log file with a timestamp. What
//! reaches the console depends on the verbosity chosen at startup:
//!
//! | verbosity | console |
//! |---|---|
//! | 0 | warnings, errors, spinner |
//! | 1 (`-v`) | + info, debug, success |
//! | 2 (`-vv`) | + steps |

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

const LOG_FILE_NAME: &str = "versionfile.log";
const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

struct State {
    log_file: Option<PathBuf>,
    verbosity: u8,
    spinner: Option<ProgressBar>,
}

static STATE: Mutex<State> = Mutex::new(State {
    log_file: None,
    verbosity: 0,
    spinner: None,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Error,
    Warn,
    Success,
    Info,
    Debug,
    Step,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Success => "SUCCESS",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Step => "STEP",
        }
    }

    /// Lowest verbosity at which the level reaches the console
    fn console_threshold(self) -> u8 {
        match self {
            Level::Error | Level::Warn => 0,
            Level::Success | Level::Info | Level::Debug => 1,
            Level::Step => 2,
        }
    }
}

fn with_state<T>(f: impl FnOnce(&mut State) -> T) -> Option<T> {
    STATE.lock().ok().map(|mut state| f(&mut state))
}

/// Get the current verbosity level
pub fn get_verbosity() -> u8 {
    with_state(|state| state.verbosity).unwrap_or(0)
}

/// `tracing` filter directive matching the verbosity: warn, debug or trace
pub fn verbosity_to_filter() -> &'static str {
    match get_verbosity() {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Set the verbosity and log to `<config dir>/versionfile/versionfile.log`
pub fn init_with_verbosity(verbosity: u8) -> Result<(), String> {
    with_state(|state| state.verbosity = verbosity);

    let dir = config_dir()?;
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    init_at(&dir.join(LOG_FILE_NAME))
}

/// Log to `log_file`, discarding the previous run's contents
pub fn init_at(log_file: &Path) -> Result<(), String> {
    if log_file.exists() {
        fs::remove_file(log_file)
            .map_err(|e| format!("Failed to reset {}: {}", log_file.display(), e))?;
    }

    with_state(|state| state.log_file = Some(log_file.to_path_buf()))
        .ok_or_else(|| "Logger state is poisoned".to_string())
}

fn config_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let base = dirs::home_dir().map(|home| home.join(".config"));

    #[cfg(target_os = "windows")]
    let base = dirs::config_dir();

    base.map(|dir| dir.join("versionfile"))
        .ok_or_else(|| "Could not determine the configuration directory".to_string())
}

fn append(line: &str) {
    let Some(Some(path)) = with_state(|state| state.log_file.clone()) else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {}", timestamp, line);
    }
}

fn emit(level: Level, message: &str) {
    append(&format!("{} {}", level.tag(), message));
    if get_verbosity() < level.console_threshold() {
        return;
    }

    match level {
        Level::Error => eprintln!("{} {}", "Error:".red().bold(), message),
        Level::Warn => eprintln!("{} {}", "warning:".yellow().bold(), message),
        Level::Success => eprintln!("{} {}", "\u{2714}".green().bold(), message),
        Level::Info => eprintln!("{}", message),
        Level::Debug => eprintln!("{} {}", "DEBUG:".blue().bold(), message),
        Level::Step => eprintln!("{} {}", "TRACE:".dimmed(), message),
    }
}

pub fn error(message: &str) {
    emit(Level::Error, message);
}

/// Record an error in the log file only, for callers that print their own
/// rendering of it
pub fn error_to_file(message: &str) {
    append(&format!("{} {}", Level::Error.tag(), message));
}

pub fn warn(message: &str) {
    emit(Level::Warn, message);
}

pub fn success(message: &str) {
    emit(Level::Success, message);
}

pub fn info(message: &str) {
    emit(Level::Info, message);
}

pub fn debug(message: &str) {
    emit(Level::Debug, message);
}

pub fn step(message: &str) {
    emit(Level::Step, message);
}

/// Write a finished command's exit status and output to the log file
pub fn capture_output(command: &str, output: &Output) {
    append(&format!(
        "COMMAND {} (exit code: {:?})",
        command,
        output.status.code()
    ));

    for (stream, bytes) in [("STDOUT", &output.stdout), ("STDERR", &output.stderr)] {
        if !bytes.is_empty() {
            append(&format!("  {}:\n{}", stream, String::from_utf8_lossy(bytes)));
        }
    }
}

pub fn get_log_path() -> Option<PathBuf> {
    with_state(|state| state.log_file.clone()).flatten()
}

/// Tell the user where the log file is
pub fn show_log_path() {
    match get_log_path().or_else(|| config_dir().ok().map(|d| d.join(LOG_FILE_NAME))) {
        Some(path) => eprintln!("Log file: {}", path.display()),
        None => eprintln!("Log file location not available"),
    }
}

/// Show a spinner while a long command runs; skipped when verbose, since the
/// debug output would interleave with it
pub fn spinner_start(message: &str) {
    append(&format!("{} {}", Level::Step.tag(), message));
    if get_verbosity() > 0 {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(SPINNER_TICKS)
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    with_state(|state| state.spinner = Some(spinner));
}

/// Clear the spinner and print a failure mark
pub fn spinner_error(message: &str) {
    spinner_stop();
    append(&format!("{} {}", Level::Error.tag(), message));
    eprintln!("  {} {}", "\u{2717}".red().bold(), message);
}

pub fn spinner_stop() {
    if let Some(Some(spinner)) = with_state(|state| state.spinner.take()) {
        spinner.finish_and_clear();
    }
}
