//! `log` facade backend writing to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = record.args().to_string();
        match record.level() {
            Level::Error => gloo::console::error!(msg),
            Level::Warn => gloo::console::warn!(msg),
            Level::Info => gloo::console::log!(msg),
            Level::Debug | Level::Trace => gloo::console::debug!(msg),
        }
    }

    fn flush(&self) {}
}

/// Install once; later calls only adjust the level.
pub fn install(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
