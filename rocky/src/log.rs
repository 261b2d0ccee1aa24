use std::env;
use std::sync::{Mutex, PoisonError};
use std::thread;

use lazy_static::lazy_static;

#[macro_export]
macro_rules! log {
    (ERROR, $($arg:tt)*) => { $crate::log::log_error(&format!($($arg)*)) };
    (INFO, $($arg:tt)*) => { $crate::log::log_info(&format!($($arg)*)) };
    (VERBOSE, $($arg:tt)*) => { $crate::log::log_verbose(&format!($($arg)*)) };
    ($($arg:tt)*) => { $crate::log::log_verbose(&format!($($arg)*)) };
}

#[macro_export]
macro_rules! log_level {
    ($l:ident) => { $crate::log::set_log_level($crate::log::LogLevel::$l) };
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    NONE,
    ERROR,
    INFO,
    VERBOSE,
}

impl LogLevel {
    pub fn value(&self) -> u8 {
        match *self {
            LogLevel::NONE => 3,
            LogLevel::ERROR => 2,
            LogLevel::INFO => 1,
            LogLevel::VERBOSE => 0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NONE" | "OFF" => Some(LogLevel::NONE),
            "ERROR" => Some(LogLevel::ERROR),
            "INFO" => Some(LogLevel::INFO),
            "VERBOSE" | "DEBUG" => Some(LogLevel::VERBOSE),
            _ => None,
        }
    }
}

pub const LOG_ENV_VAR: &str = "ROCKY_LOG";

lazy_static! {
    static ref LOG_LEVEL: Mutex<LogLevel> = Mutex::new(
        env::var(LOG_ENV_VAR).ok()
            .and_then(|name| LogLevel::from_name(&name))
            .unwrap_or(LogLevel::INFO)
    );
}

const TAG: &str = "rocky";

pub fn set_log_level(level: LogLevel) {
    *LOG_LEVEL.lock().unwrap_or_else(PoisonError::into_inner) = level;
}

pub fn log_level() -> LogLevel {
    *LOG_LEVEL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn enabled(level: LogLevel) -> bool {
    level != LogLevel::NONE && level.value() >= log_level().value()
}

fn format_line(level: char, string: &str) -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => format!("{} {} [{}]: {}", level, TAG, name, string),
        None => format!("{} {}: {}", level, TAG, string),
    }
}

pub fn log_error(string: &str) {
    if enabled(LogLevel::ERROR) {
        eprintln!("{}", format_line('E', string));
    }
}

pub fn log_info(string: &str) {
    if enabled(LogLevel::INFO) {
        println!("{}", format_line('I', string));
    }
}

pub fn log_verbose(string: &str) {
    if enabled(LogLevel::VERBOSE) {
        println!("{}", format_line('V', string));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::from_name("error"), Some(LogLevel::ERROR));
        assert_eq!(LogLevel::from_name(" Verbose "), Some(LogLevel::VERBOSE));
        assert_eq!(LogLevel::from_name("off"), Some(LogLevel::NONE));
        assert_eq!(LogLevel::from_name("loud"), None);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::ERROR.value() > LogLevel::INFO.value());
        assert!(LogLevel::INFO.value() > LogLevel::VERBOSE.value());
        assert!(LogLevel::NONE.value() > LogLevel::ERROR.value());
    }

    #[test]
    fn test_format_line_names_thread() {
        let line = thread::Builder::new()
            .name("format test".to_string())
            .spawn(|| format_line('I', "hello"))
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(line, "I rocky [format test]: hello");
    }
}
