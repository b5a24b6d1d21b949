use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use crate::get_create_gita_dir;

const KEEP_LOG_FILES: usize = 5;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages
///
/// The level can be set via the `LOG_LEVEL` environment variable or at runtime
/// using `Logger::set_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }
}

/// Rotates log files, keeping only the last 5 log files
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match log_file.try_exists() {
        Ok(true) => {}
        // Nothing to rotate, or no permission to check.
        Ok(false) | Err(_) => return Ok(()),
    }

    let metadata = std::fs::metadata(log_file)?;
    let modified = metadata.modified()?;

    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let new_path = parent.join(format!("log.{}.txt", timestamp));

    std::fs::rename(log_file, &new_path)?;

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                filename.starts_with("log.") && filename.ends_with(".txt") && filename != "log.txt"
            } else {
                false
            }
        })
        .collect();

    // The timestamped names sort by date.
    log_files.sort();

    if log_files.len() > KEEP_LOG_FILES {
        for file in &log_files[0..log_files.len() - KEEP_LOG_FILES] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

pub struct Logger {
    log_file: PathBuf,
    disable_log: bool,
    enable_print_log: bool,
    level: Mutex<Level>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = get_create_gita_dir()
            .map_err(|e| format!("Failed to get gita_dir: {}", e))?;
        Self::new_in_dir(&data_dir)
    }

    pub fn new_in_dir(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(data_dir)?;
        let log_file = data_dir.join("log.txt");

        if let Err(e) = rotate_log_files(&log_file) {
            eprintln!("Failed to rotate log files: {}", e);
        }

        let disable_log = std::env::var("DISABLE_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let enable_print_log = std::env::var("ENABLE_PRINT_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_str(&v))
            .unwrap_or(Level::Info);

        Ok(Logger {
            log_file,
            disable_log,
            enable_print_log,
            level: Mutex::new(level),
        })
    }

    fn disabled() -> Self {
        Logger {
            log_file: PathBuf::new(),
            disable_log: true,
            enable_print_log: false,
            level: Mutex::new(Level::Info),
        }
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    fn write_to_file(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        if self.disable_log {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        let log_line = format!("[{}] {}\n", timestamp, message);

        file.write_all(log_line.as_bytes())?;

        Ok(())
    }

    fn enabled(&self, at: Level) -> bool {
        *self.level.lock() >= at
    }

    pub fn debug(&self, msg: &str) {
        if !self.enabled(Level::Debug) {
            return;
        }
        if self.enable_print_log {
            tracing::debug!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("DEBUG: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.enabled(Level::Info) {
            return;
        }
        if self.enable_print_log {
            tracing::info!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("INFO: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.enabled(Level::Warn) {
            return;
        }
        if self.enable_print_log {
            tracing::warn!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("WARN: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn error(&self, msg: &str) {
        if !self.enabled(Level::Error) {
            return;
        }
        if self.enable_print_log {
            tracing::error!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("ERROR: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn get_level(&self) -> Level {
        *self.level.lock()
    }

    pub fn set_level(&self, new_level: Level) {
        *self.level.lock() = new_level;
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// DISABLE_LOG=true turns the global logger off before it touches the data dir.
/// Unit tests never write to the per-user data dir.
fn log_disabled_by_env() -> bool {
    cfg!(test)
        || std::env::var("DISABLE_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false)
}

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    let logger = LOGGER.get_or_init(|| {
        if log_disabled_by_env() {
            return Logger::disabled();
        }

        TRACING_INITIALIZED.get_or_init(|| {
            if let Err(e) = Logger::init_tracing() {
                eprintln!("Failed to initialize tracing: {}", e);
            }
        });

        match Logger::new() {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Failed to create logger: {}", e);
                Logger::disabled()
            }
        }
    });

    f(logger)
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.info(msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg));
}
