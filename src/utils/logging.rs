// Sat Oct 17 2026 - Alex

use log::LevelFilter;
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs an `env_logger` at `level`. A second call is a no-op.
    pub fn init_logger(level: LevelFilter) -> bool {
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()
            .is_ok()
    }

    pub fn init_from_level_name(name: &str) -> bool {
        Self::init_logger(Self::level_from_str(name))
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Warn,
        }
    }
}

/// Logs the lifetime of a scope at trace level.
pub struct ScopedTimer {
    name: &'static str,
    start: Option<Instant>,
}

impl ScopedTimer {
    pub fn new(name: &'static str) -> Self {
        let start = log::log_enabled!(log::Level::Trace).then(Instant::now);
        Self { name, start }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            let elapsed = start.elapsed();
            log::trace!("[TIMER] {} took {:.3}ms", self.name, elapsed.as_secs_f64() * 1000.0);
        }
    }
}
