//! Forwarding of `log` records to the browser console.
//!
//! The core crate logs through the `log` facade. Nothing is printed until
//! the host opts in with `enableConsoleLogging`.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

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

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug => console::debug_1(&message),
            Level::Trace => console::log_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Route log output to the browser console at `level`.
///
/// `level` is one of `off`, `error`, `warn`, `info`, `debug` or `trace`
/// (case-insensitive). Calling again only changes the level.
#[wasm_bindgen(js_name = enableConsoleLogging)]
pub fn enable_console_logging(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e))?;

    // Already installed on repeat calls
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("Unknown log level: {}", level))
}
