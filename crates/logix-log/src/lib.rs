//! Leveled terminal logging for the Logix toolchain.
//!
//! The logger is a process-wide singleton with an atomic level, so the lexer,
//! parser and compile driver can all log without threading a handle around.
//! Every macro records `module_path!()` as the message target.
//!
//! Messages at [`Level::Error`] and [`Level::Warn`] go to stderr, everything
//! else to stdout.
//!
//! # Example
//!
//! ```
//! use logix_log::{debug, info, Level};
//!
//! logix_log::set_level(Level::Debug);
//!
//! let files = 3;
//! info!("compiling {} files", files);
//! debug!("phase timings: {:?}", [("lex", 1), ("parse", 2)]);
//! ```

use std::fmt::{self, Arguments};
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Name of the environment variable read by [`init_from_env`].
pub const ENV_VAR: &str = "LOGIX_LOG";

/// Severity of a log message.
///
/// Ordered from most severe (`Error`) to least severe (`Trace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures that abort a file or the whole run.
    Error = 0,
    /// Suspicious situations that do not stop the run.
    Warn = 1,
    /// Progress and final verdicts.
    Info = 2,
    /// Phase timings and AST dumps.
    Debug = 3,
    /// Per-token tracing.
    Trace = 4,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Whether messages at this level are written to stderr.
    pub const fn is_diagnostic(self) -> bool {
        matches!(self, Level::Error | Level::Warn)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Level`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log level `{}` (expected error, warn, info, debug or trace)",
            self.input
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name case-insensitively. `warning` is accepted as an
    /// alias of `warn`.
    ///
    /// ```
    /// use logix_log::Level;
    ///
    /// assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    /// assert_eq!("WARNING".parse::<Level>(), Ok(Level::Warn));
    /// assert!("loud".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// The process-wide logger.
///
/// Obtain it through [`get_logger`]; the free functions in this crate are
/// shorthands for the same instance.
pub struct Logger {
    level: AtomicU8,
    colors: AtomicU8,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            colors: AtomicU8::new(1),
        }
    }

    /// Sets the least severe level that is still printed.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Checks if a message at `level` would be printed.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Turns ANSI coloring of the level tag on or off.
    pub fn set_colors(&self, on: bool) {
        self.colors.store(u8::from(on), Ordering::SeqCst);
    }

    /// Whether the level tag is colored.
    pub fn colors(&self) -> bool {
        self.colors.load(Ordering::Relaxed) != 0
    }

    fn format(&self, level: Level, target: &str, args: Arguments<'_>) -> String {
        if self.colors() {
            let color = level.color_code();
            format!("{color}[{level}]{RESET} {target}: {args}")
        } else {
            format!("[{level}] {target}: {args}")
        }
    }
}

const RESET: &str = "\x1b[0m";

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at [`Level::Info`] on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Info))
}

/// Sets the level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the level of the global logger from a level name.
///
/// ```
/// logix_log::set_level_from_str("trace").unwrap();
/// assert!(logix_log::set_level_from_str("nope").is_err());
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    set_level(s.parse()?);
    Ok(())
}

/// Seeds the level from the `LOGIX_LOG` environment variable.
///
/// Returns the level that was applied, or `None` when the variable is unset
/// or does not name a level (the current level is then left alone).
pub fn init_from_env() -> Option<Level> {
    let raw = std::env::var(ENV_VAR).ok()?;
    let level = raw.parse().ok()?;
    set_level(level);
    Some(level)
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments<'_>) {
    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    let line = logger.format(level, target, args);
    if level.is_diagnostic() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Logs a message at an explicit level.
///
/// ```
/// use logix_log::{log, Level};
///
/// log!(level: Level::Info, "{} files discovered", 2);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            let level = $level;
            if $crate::get_logger().enabled(level) {
                $crate::__log_with_target(level, module_path!(), format_args!($($arg)*));
            }
        }
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
