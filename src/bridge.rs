// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration with the `log` crate.
//!
//! The bridge forwards records emitted through `log` macros to the current
//! target, resolving through the same current-then-default indirection as
//! [`stump`][crate::stump].

use crate::registry;
use crate::Priority;
use crate::Severity;

struct LogCrateLogger(());

fn severity(level: log::Level) -> Severity {
    match level {
        log::Level::Error => Severity::Error,
        log::Level::Warn => Severity::Warning,
        log::Level::Info => Severity::Info,
        log::Level::Debug | log::Level::Trace => Severity::Debug,
    }
}

impl log::Log for LogCrateLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let Ok(target) = registry::get_current_target() else {
            return;
        };
        let facility = target.default_facility().unwrap_or_default();
        let priority = Priority::new(facility, severity(record.level()));
        let _ = target.add_log(priority, *record.args());
    }

    fn flush(&self) {}
}

/// Set up the log crate global logger.
///
/// All records emitted through the `log` macros are forwarded to the
/// current target, with levels mapped to severities (`error` → `err`,
/// `warn` → `warning`, `info` → `info`, `debug` and `trace` → `debug`)
/// and the target's default facility applied.
///
/// This should be called early in the execution of a Rust program. This
/// function sets the global maximum log level to `Trace`; to override
/// this, call [`log::set_max_level`] afterwards.
///
/// # Errors
///
/// Returns an error if the log crate global logger has already been set.
pub fn try_setup_log_crate() -> std::result::Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panics if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "stumpless::bridge::setup_log_crate must be called before the log crate global logger initialized",
    );
}
