//! Logging setup: `env_logger` filtering, optionally routed through indicatif

use indicatif::MultiProgress;

/// How chatty the binary should be when `RUST_LOG` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if debug {
            Self::Debug
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    fn default_filter(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            // Keep dependency noise out of debug output
            Self::Debug => "warn,citeline=debug,citeline_core=debug,citeline_resolve=debug,citeline_graph=debug,citeline_pipeline=debug",
        }
    }
}

/// Padded label and ANSI color for a log level.
fn level_label(level: log::Level, color: bool) -> String {
    let (label, ansi) = match level {
        log::Level::Error => ("ERROR", "\x1b[31m"),
        log::Level::Warn => ("WARN ", "\x1b[33m"),
        log::Level::Info => ("INFO ", "\x1b[32m"),
        log::Level::Debug => ("DEBUG", "\x1b[36m"),
        log::Level::Trace => ("TRACE", "\x1b[35m"),
    };
    if color {
        format!("{ansi}{label}\x1b[0m")
    } else {
        label.to_string()
    }
}

/// Crate name without the `citeline_` prefix, for compact debug lines.
fn short_target(target: &str) -> &str {
    let krate = target.split("::").next().unwrap_or(target);
    krate.strip_prefix("citeline_").unwrap_or(krate)
}

/// Logger that prints through `MultiProgress` so stage spinners stay intact.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }
        let label = level_label(record.level(), true);
        let line = if record.level() >= log::Level::Debug {
            format!("[{label}] {}: {}", short_target(record.target()), record.args())
        } else {
            format!("[{label}] {}", record.args())
        };
        self.multi.suspend(|| eprintln!("{line}"));
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the global logger.
///
/// With `multi` set (TTY), log lines are printed above the progress spinners.
/// Without it, plain uncolored lines go to stderr for log aggregation.
/// Fails if a global logger is already installed.
pub fn init_logging(
    verbosity: Verbosity,
    multi: Option<&MultiProgress>,
) -> Result<(), log::SetLoggerError> {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(verbosity.default_filter());

    if let Some(multi) = multi {
        let logger = env_logger::Builder::from_env(env).build();
        let max_level = logger.filter();
        log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone())))?;
        log::set_max_level(max_level);
        Ok(())
    } else {
        env_logger::Builder::from_env(env)
            .format(|buf, record| {
                let label = level_label(record.level(), false);
                if record.level() >= log::Level::Debug {
                    writeln!(
                        buf,
                        "[{label}] {}: {}",
                        short_target(record.target()),
                        record.args()
                    )
                } else {
                    writeln!(buf, "[{label}] {}", record.args())
                }
            })
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_precedence() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn second_install_is_reported() {
        let _ = init_logging(Verbosity::Quiet, None);
        assert!(init_logging(Verbosity::Quiet, None).is_err());
    }

    #[test]
    fn short_target_strips_prefix() {
        assert_eq!(short_target("citeline_graph::pagerank"), "graph");
        assert_eq!(short_target("citeline"), "citeline");
        assert_eq!(short_target("rayon_core::registry"), "rayon_core");
    }

    #[test]
    fn plain_label_has_no_ansi() {
        assert_eq!(level_label(log::Level::Warn, false), "WARN ");
        assert!(level_label(log::Level::Warn, true).contains("\x1b[33m"));
    }
}
