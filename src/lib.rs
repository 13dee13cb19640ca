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

#![deny(missing_docs)]

//! Stumpless is an RFC 5424 structured logging library with pluggable
//! targets.
//!
//! # Overview
//!
//! Log entries are dispatched to [`Target`]s: in-memory buffers, files,
//! arbitrary streams, Unix sockets, TCP/UDP syslog endpoints, the systemd
//! journal, or user callbacks. Every target presents the same
//! configuration and dispatch contract regardless of its backend, and all
//! of them are safe to share across threads.
//!
//! Target-less calls like [`stump`] resolve through a process-wide current
//! target, falling back to a lazily constructed platform default.
//!
//! # Examples
//!
//! Logging to an explicit target:
//!
//! ```
//! use stumpless::open_target;
//! use stumpless::Facility;
//! use stumpless::Target;
//!
//! let target = Target::new_buffer("example", 4096).unwrap();
//! target.set_default_facility(Facility::Local0).unwrap();
//! open_target(&target).unwrap();
//!
//! target.add_message(format_args!("answer is {}", 42)).unwrap();
//!
//! let contents = String::from_utf8(target.read_buffer().unwrap()).unwrap();
//! assert!(contents.starts_with("<134>1 "));
//! assert!(contents.ends_with("answer is 42\n"));
//! ```
//!
//! Logging to the current target:
//!
//! ```no_run
//! use stumpless::Facility;
//! use stumpless::Priority;
//! use stumpless::Severity;
//!
//! stumpless::stump(format_args!("ready")).unwrap();
//!
//! let priority = Priority::new(Facility::Daemon, Severity::Notice);
//! stumpless::stumplog(priority, format_args!("worker {} started", 3));
//! ```

pub mod bridge;
pub mod target;

mod entry;
mod error;
mod facility;
mod format;
mod priority;
mod registry;
mod severity;

pub use self::entry::Element;
pub use self::entry::Entry;
pub use self::entry::EntryBuilder;
pub use self::entry::Param;
pub use self::entry::MAX_APP_NAME_LENGTH;
pub use self::entry::MAX_MSGID_LENGTH;
pub use self::entry::MAX_SD_NAME_LENGTH;
pub use self::error::clear_error;
pub use self::error::last_error;
pub use self::error::CodeType;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::error::Result;
pub use self::facility::Facility;
pub use self::priority::Priority;
pub use self::registry::free_all;
pub use self::registry::get_current_target;
pub use self::registry::get_default_target;
pub use self::registry::set_current_target;
pub use self::registry::stump;
pub use self::registry::stumplog;
pub use self::severity::Severity;
pub use self::target::close_target;
pub use self::target::open_target;
pub use self::target::LogHandler;
pub use self::target::Target;
pub use self::target::TargetKind;
pub use self::target::Transport;

/// The file written by the default target on platforms without a system
/// log socket.
pub const DEFAULT_FILE: &str = "stumpless-default.log";

/// The name given to the default target on builds where event log
/// delivery is available; other backends derive the name from a path.
pub const DEFAULT_TARGET_NAME: &str = "stumpless-default";

/// The datagram socket used by the default target on Unix-like platforms,
/// unless `/var/run/syslog` exists.
#[cfg(unix)]
pub const DEFAULT_SOCKET: &str = "/dev/log";
