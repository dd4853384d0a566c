//! Logging utilities for CLI output

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if permits(level, required) {
        println!("{msg}");
    }
}

fn permits(level: LogLevel, required: LogLevel) -> bool {
    level != LogLevel::Quiet && (level == required || required == LogLevel::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_prints_nothing() {
        assert!(!permits(LogLevel::Quiet, LogLevel::Normal));
        assert!(!permits(LogLevel::Quiet, LogLevel::Verbose));
    }

    #[test]
    fn test_verbose_messages_need_verbose_level() {
        assert!(!permits(LogLevel::Normal, LogLevel::Verbose));
        assert!(permits(LogLevel::Verbose, LogLevel::Verbose));
        assert!(permits(LogLevel::Verbose, LogLevel::Normal));
        assert!(permits(LogLevel::Normal, LogLevel::Normal));
    }
}
