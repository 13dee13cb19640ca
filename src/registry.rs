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

//! Process-wide target resolution.
//!
//! Two atomic slots drive target-less logging: the current target (the
//! last target opened or the one installed with [`set_current_target`])
//! and the lazily constructed default target. [`stump`] and [`stumplog`]
//! resolve through the current slot first and fall back to the default.
//!
//! The module also keeps a registry of all live targets so that
//! [`free_all`] can tear down process state in one call.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;

use arc_swap::ArcSwapOption;

use crate::target::close_target;
use crate::Priority;
use crate::Result;
use crate::Target;
use crate::TargetKind;

static CURRENT_TARGET: ArcSwapOption<Target> = ArcSwapOption::const_empty();
static DEFAULT_TARGET: ArcSwapOption<Target> = ArcSwapOption::const_empty();
static DEFAULT_TARGET_INIT: Mutex<()> = Mutex::new(());
static LIVE_TARGETS: Mutex<Vec<Weak<Target>>> = Mutex::new(Vec::new());

/// Installs `target` as the current target used by target-less logging
/// calls.
///
/// A single atomic store; safe to call from signal handlers.
pub fn set_current_target(target: &Arc<Target>) {
    CURRENT_TARGET.store(Some(Arc::clone(target)));
}

/// Returns the current target.
///
/// This is the last target opened or the one installed with
/// [`set_current_target`], as long as it is still open; otherwise the
/// default target, constructing it if need be.
pub fn get_current_target() -> Result<Arc<Target>> {
    if let Some(current) = CURRENT_TARGET.load_full() {
        if current.is_open().is_some() {
            return Ok(current);
        }
    }
    get_default_target()
}

/// Returns the default target, constructing and opening it on first use.
///
/// The backend depends on what the build supports: an event log named
/// [`DEFAULT_TARGET_NAME`][crate::DEFAULT_TARGET_NAME] where event log
/// delivery is available, else on Unix-like platforms a datagram socket to
/// the system log (`/var/run/syslog` when that path exists, `/dev/log`
/// otherwise), else [`DEFAULT_FILE`][crate::DEFAULT_FILE] in the working
/// directory. The default target has no options set and a default facility
/// of `user`; it lives until [`free_all`] tears it down.
pub fn get_default_target() -> Result<Arc<Target>> {
    if let Some(default) = DEFAULT_TARGET.load_full() {
        return Ok(default);
    }

    let _init = DEFAULT_TARGET_INIT
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    // double-checked: another thread may have won the construction race
    if let Some(default) = DEFAULT_TARGET.load_full() {
        return Ok(default);
    }

    let target = new_default_target()?;
    target.open_backend()?;
    DEFAULT_TARGET.store(Some(Arc::clone(&target)));
    Ok(target)
}

fn new_default_target() -> Result<Arc<Target>> {
    if TargetKind::WindowsEventLog.is_supported() {
        return Target::new_windows_event_log(crate::DEFAULT_TARGET_NAME);
    }

    #[cfg(unix)]
    {
        // /var/run/syslog is where Darwin listens; everything else uses
        // /dev/log
        let path = if std::path::Path::new("/var/run/syslog").exists() {
            "/var/run/syslog"
        } else {
            crate::DEFAULT_SOCKET
        };
        Target::new_socket(path)
    }
    #[cfg(not(unix))]
    {
        Target::new_file(crate::DEFAULT_FILE)
    }
}

/// Logs a message to the current target.
///
/// # Examples
///
/// ```no_run
/// stumpless::stump(format_args!("cache warmed in {}ms", 12)).unwrap();
/// ```
pub fn stump(message: fmt::Arguments<'_>) -> Result<usize> {
    get_current_target()?.add_message(message)
}

/// Logs a message with the given priority to the current target.
///
/// A drop-in replacement for the traditional `syslog` call shape; errors
/// are only reported through the [error channel][crate::last_error].
pub fn stumplog(priority: Priority, message: fmt::Arguments<'_>) {
    if let Ok(target) = get_current_target() {
        let _ = target.add_log(priority, message);
    }
}

/// Closes every live target and clears all process-wide state.
///
/// Targets are closed in registration order, the default target included.
/// Safe to call more than once; subsequent calls are no-ops.
pub fn free_all() {
    let targets: Vec<Arc<Target>> = {
        let mut live = LIVE_TARGETS.lock().unwrap_or_else(|err| err.into_inner());
        live.drain(..).filter_map(|weak| weak.upgrade()).collect()
    };

    for target in targets {
        if target.kind().is_supported() && !target.is_closed() {
            close_target(&target);
        }
    }

    CURRENT_TARGET.store(None);
    DEFAULT_TARGET.store(None);
}

/// Records a newly created target in the live registry.
pub(crate) fn register(target: &Arc<Target>) {
    LIVE_TARGETS
        .lock()
        .unwrap_or_else(|err| err.into_inner())
        .push(Arc::downgrade(target));
}

/// Drops a closed target's registration and resets the current-target slot
/// when it pointed at the closed target.
pub(crate) fn forget(target: &Target) {
    LIVE_TARGETS
        .lock()
        .unwrap_or_else(|err| err.into_inner())
        .retain(|weak| weak.upgrade().is_some_and(|live| live.id() != target.id()));

    let current = CURRENT_TARGET.load_full();
    if current.is_some_and(|current| current.id() == target.id()) {
        CURRENT_TARGET.store(None);
    }
}
