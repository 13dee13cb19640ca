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

//! Log entry targets and the dispatch pipeline.
//!
//! A [`Target`] is a sink for log entries. Every target carries the same
//! configuration surface (default facility, app name, msgid, option bits)
//! regardless of its backend family, and every backend family presents the
//! same dispatch contract: serialize the entry, hand it off, report the
//! byte count or the failure.
//!
//! Targets are created paused by the `new_*` constructors, promoted with
//! [`open_target`], and torn down with [`close_target`] or
//! [`free_all`][crate::free_all].
//!
//! # Examples
//!
//! ```
//! use stumpless::open_target;
//! use stumpless::Target;
//!
//! let target = Target::new_buffer("example", 4096).unwrap();
//! open_target(&target).unwrap();
//! target.add_message(format_args!("hello, world")).unwrap();
//!
//! let contents = target.read_buffer().unwrap();
//! assert!(!contents.is_empty());
//! ```

use std::fmt;
use std::io;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;

use crate::entry;
use crate::error;
use crate::format;
use crate::registry;
use crate::Entry;
use crate::Error;
use crate::ErrorKind;
use crate::Facility;
use crate::Priority;
use crate::Result;

mod buffer;
mod file;
mod function;
#[cfg(all(target_os = "linux", feature = "journald"))]
mod journald;
mod network;
#[cfg(unix)]
mod socket;
mod stream;

pub use function::LogHandler;
pub use network::Transport;

/// Backend-agnostic option bits for targets.
///
/// Only [`PID`][options::PID] changes dispatch behavior today; the
/// remaining bits are carried for syslog compatibility and round-trip
/// unchanged.
pub mod options {
    /// Include the current process id as a structured-data element on
    /// every dispatched entry.
    pub const PID: u32 = 1 << 0;
    /// Fall back to the system console when delivery fails.
    pub const CONS: u32 = 1 << 1;
    /// Open the backend connection immediately rather than on first use.
    pub const NDELAY: u32 = 1 << 2;
    /// Do not wait for child processes while logging.
    pub const NOWAIT: u32 = 1 << 3;
    /// Also write entries to standard error.
    pub const PERROR: u32 = 1 << 4;
}

/// The backend family of a target. Fixed for the target's lifetime.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TargetKind {
    /// An in-memory circular buffer.
    Buffer,
    /// An append-mode file.
    File,
    /// A synchronous user callback.
    Function,
    /// The systemd journal.
    Journald,
    /// A TCP or UDP syslog endpoint.
    Network,
    /// A Unix datagram socket.
    Socket,
    /// An arbitrary byte stream such as standard output.
    Stream,
    /// The Windows Event Log.
    WindowsEventLog,
}

impl TargetKind {
    /// True when this backend family is available in the current build.
    ///
    /// Every operation on a target of an unavailable family fails with
    /// [`ErrorKind::TargetUnsupported`] without touching the backend.
    pub const fn is_supported(self) -> bool {
        match self {
            TargetKind::Journald => cfg!(all(target_os = "linux", feature = "journald")),
            TargetKind::Socket => cfg!(unix),
            TargetKind::WindowsEventLog => false,
            _ => true,
        }
    }
}

const STATE_PAUSED: u8 = 0;
const STATE_OPEN: u8 = 1;
const STATE_CLOSED: u8 = 2;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct Config {
    options: u32,
    default_priority: Priority,
    default_app_name: String,
    default_msgid: String,
    mask: u8,
}

#[derive(Debug)]
enum Backend {
    Buffer(buffer::BufferSink),
    File(file::FileSink),
    Function(function::FunctionSink),
    #[cfg(all(target_os = "linux", feature = "journald"))]
    Journald(journald::JournaldSink),
    Network(network::NetworkSink),
    #[cfg(unix)]
    Socket(socket::SocketSink),
    Stream(stream::StreamSink),
    /// Stand-in for families disabled in this build. Never reached by
    /// dispatch; the kind check fails first.
    Unsupported,
}

impl Backend {
    fn write(&self, target: &Target, entry: &Entry, defaults: &format::Defaults) -> Result<usize> {
        // function targets consume the entry itself, not serialized text
        if let Backend::Function(sink) = self {
            return sink.write(target, entry);
        }

        let captured = SystemTime::now();
        let bytes = format::rfc5424(entry, defaults, captured);
        match self {
            Backend::Buffer(sink) => sink.write(&bytes),
            Backend::File(sink) => sink.write(&bytes),
            #[cfg(all(target_os = "linux", feature = "journald"))]
            Backend::Journald(sink) => {
                sink.write(entry.priority().unwrap_or(defaults.priority), &bytes)
            }
            Backend::Network(sink) => sink.write(&bytes),
            #[cfg(unix)]
            Backend::Socket(sink) => sink.write(&target.name, &bytes),
            Backend::Stream(sink) => sink.write(&bytes),
            Backend::Function(_) | Backend::Unsupported => error::fail(Error::new(
                ErrorKind::TargetUnsupported,
                "this backend family is not available in this build",
            )),
        }
    }

    fn open(&self, name: &str) -> Result<()> {
        match self {
            Backend::Buffer(_) | Backend::Function(_) | Backend::Stream(_) => Ok(()),
            Backend::File(sink) => sink.open(name),
            #[cfg(all(target_os = "linux", feature = "journald"))]
            Backend::Journald(sink) => sink.open(),
            Backend::Network(sink) => sink.open(name),
            #[cfg(unix)]
            Backend::Socket(sink) => sink.open(),
            Backend::Unsupported => error::fail(Error::new(
                ErrorKind::TargetUnsupported,
                "this backend family is not available in this build",
            )),
        }
    }

    fn close(&self) {
        match self {
            Backend::Buffer(_) | Backend::Function(_) | Backend::Unsupported => {}
            Backend::File(sink) => sink.close(),
            #[cfg(all(target_os = "linux", feature = "journald"))]
            Backend::Journald(sink) => sink.close(),
            Backend::Network(sink) => sink.close(),
            #[cfg(unix)]
            Backend::Socket(sink) => sink.close(),
            Backend::Stream(sink) => sink.close(),
        }
    }
}

/// A sink for log entries.
///
/// All configuration accessors are thread safe; the per-target lock
/// serializes them with each other and with state transitions, and is
/// never held across backend I/O. [`Target::is_open`] is async-signal-safe
/// as it performs a single atomic load.
#[derive(Debug)]
pub struct Target {
    id: u64,
    kind: TargetKind,
    name: String,
    state: AtomicU8,
    config: Mutex<Config>,
    backend: Backend,
}

impl Target {
    fn create(kind: TargetKind, name: String, backend: Backend) -> Arc<Target> {
        let target = Arc::new(Target {
            id: NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            name,
            state: AtomicU8::new(STATE_PAUSED),
            config: Mutex::new(Config {
                options: 0,
                default_priority: Priority::default(),
                default_app_name: "-".to_string(),
                default_msgid: "-".to_string(),
                mask: 0xFF,
            }),
            backend,
        });
        registry::register(&target);
        target
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return error::fail(Error::new(
                ErrorKind::ArgumentEmpty,
                "target names must not be empty",
            ));
        }
        Ok(())
    }

    /// Creates a paused buffer target over a circular buffer of `capacity`
    /// bytes. Once the buffer fills, the oldest bytes are overwritten.
    pub fn new_buffer(name: impl Into<String>, capacity: usize) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        if capacity == 0 {
            return error::fail(Error::new(
                ErrorKind::ArgumentEmpty,
                "buffer targets need a non-zero capacity",
            ));
        }
        Ok(Self::create(
            TargetKind::Buffer,
            name,
            Backend::Buffer(buffer::BufferSink::new(capacity)),
        ))
    }

    /// Creates a paused file target. The name is the path of the log file,
    /// which is created on open if it does not exist and always appended to.
    pub fn new_file(name: impl Into<String>) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self::create(
            TargetKind::File,
            name,
            Backend::File(file::FileSink::new()),
        ))
    }

    /// Creates a paused stream target over any writer.
    pub fn new_stream(
        name: impl Into<String>,
        stream: impl io::Write + Send + 'static,
    ) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self::create(
            TargetKind::Stream,
            name,
            Backend::Stream(stream::StreamSink::new(Box::new(stream))),
        ))
    }

    /// Creates a paused stream target writing to standard output.
    pub fn new_stdout(name: impl Into<String>) -> Result<Arc<Target>> {
        Self::new_stream(name, io::stdout())
    }

    /// Creates a paused stream target writing to standard error.
    pub fn new_stderr(name: impl Into<String>) -> Result<Arc<Target>> {
        Self::new_stream(name, io::stderr())
    }

    /// Creates a paused function target that hands each dispatched entry to
    /// `handler`.
    pub fn new_function(
        name: impl Into<String>,
        handler: impl Fn(&Target, &Entry) -> io::Result<usize> + Send + Sync + 'static,
    ) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self::create(
            TargetKind::Function,
            name,
            Backend::Function(function::FunctionSink::new(Box::new(handler))),
        ))
    }

    /// Creates a paused network target. The name is the endpoint address,
    /// for example `"logs.example.com:514"`.
    pub fn new_network(name: impl Into<String>, transport: Transport) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self::create(
            TargetKind::Network,
            name,
            Backend::Network(network::NetworkSink::new(transport)),
        ))
    }

    /// Creates a paused socket target. The name is the path of the
    /// destination Unix datagram socket, for example `"/dev/log"`.
    ///
    /// On non-Unix platforms the target is created but unsupported: every
    /// operation on it fails with [`ErrorKind::TargetUnsupported`].
    pub fn new_socket(name: impl Into<String>) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        #[cfg(unix)]
        let backend = Backend::Socket(socket::SocketSink::new());
        #[cfg(not(unix))]
        let backend = Backend::Unsupported;
        Ok(Self::create(TargetKind::Socket, name, backend))
    }

    /// Creates a paused journald target.
    ///
    /// On builds without the `journald` feature (or off Linux) the target
    /// is created but unsupported: every operation on it fails with
    /// [`ErrorKind::TargetUnsupported`].
    pub fn new_journald(name: impl Into<String>) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        #[cfg(all(target_os = "linux", feature = "journald"))]
        let backend = Backend::Journald(journald::JournaldSink::new());
        #[cfg(not(all(target_os = "linux", feature = "journald")))]
        let backend = Backend::Unsupported;
        Ok(Self::create(TargetKind::Journald, name, backend))
    }

    /// Creates a paused Windows Event Log target.
    ///
    /// Event log delivery is not available on the builds this crate
    /// currently targets; every operation on the target fails with
    /// [`ErrorKind::TargetUnsupported`].
    pub fn new_windows_event_log(name: impl Into<String>) -> Result<Arc<Target>> {
        let name = name.into();
        Self::check_name(&name)?;
        Ok(Self::create(
            TargetKind::WindowsEventLog,
            name,
            Backend::Unsupported,
        ))
    }

    /// The process-unique identifier of this target.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The backend family of this target.
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    fn config(&self) -> MutexGuard<'_, Config> {
        // a panicked writer must not wedge every logger on this target
        self.config.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn state(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state() == STATE_CLOSED
    }

    fn ensure_usable(&self) -> Result<()> {
        if !self.kind.is_supported() {
            return error::fail(Error::new(
                ErrorKind::TargetUnsupported,
                "this backend family is not available in this build",
            ));
        }
        if self.is_closed() {
            return error::fail(Error::new(
                ErrorKind::InvalidId,
                "the target has been closed",
            ));
        }
        Ok(())
    }

    /// Returns the target's name.
    pub fn name(&self) -> Result<String> {
        self.ensure_usable()?;
        Ok(self.name.clone())
    }

    /// Returns the facility applied to entries without one.
    pub fn default_facility(&self) -> Result<Facility> {
        self.ensure_usable()?;
        Ok(self.config().default_priority.facility())
    }

    /// Sets the facility applied to entries without one.
    pub fn set_default_facility(&self, facility: Facility) -> Result<&Self> {
        self.ensure_usable()?;
        let mut config = self.config();
        config.default_priority = Priority::new(facility, config.default_priority.severity());
        Ok(self)
    }

    /// Returns the app name applied to entries without one.
    pub fn default_app_name(&self) -> Result<String> {
        self.ensure_usable()?;
        Ok(self.config().default_app_name.clone())
    }

    /// Sets the app name applied to entries without one.
    ///
    /// # Errors
    ///
    /// The previous value is preserved when `app_name` is longer than
    /// [`MAX_APP_NAME_LENGTH`][crate::MAX_APP_NAME_LENGTH]
    /// ([`ErrorKind::ArgumentTooBig`]) or contains non-printable bytes
    /// ([`ErrorKind::InvalidEncoding`]).
    pub fn set_default_app_name(&self, app_name: &str) -> Result<&Self> {
        self.ensure_usable()?;
        entry::validate_app_name(app_name)?;
        self.config().default_app_name = app_name.to_string();
        Ok(self)
    }

    /// Returns the msgid applied to entries without one.
    pub fn default_msgid(&self) -> Result<String> {
        self.ensure_usable()?;
        Ok(self.config().default_msgid.clone())
    }

    /// Sets the msgid applied to entries without one.
    ///
    /// # Errors
    ///
    /// The previous value is preserved when `msgid` is longer than
    /// [`MAX_MSGID_LENGTH`][crate::MAX_MSGID_LENGTH]
    /// ([`ErrorKind::ArgumentTooBig`]) or contains bytes outside ASCII
    /// 33..=126 ([`ErrorKind::InvalidEncoding`]).
    pub fn set_default_msgid(&self, msgid: &str) -> Result<&Self> {
        self.ensure_usable()?;
        entry::validate_msgid(msgid)?;
        self.config().default_msgid = msgid.to_string();
        Ok(self)
    }

    /// Returns `option` if it is set on this target, and zero otherwise.
    pub fn option(&self, option: u32) -> Result<u32> {
        self.ensure_usable()?;
        Ok(self.config().options & option)
    }

    /// Sets the given option bits.
    pub fn set_option(&self, option: u32) -> Result<&Self> {
        self.ensure_usable()?;
        self.config().options |= option;
        Ok(self)
    }

    /// Clears the given option bits.
    pub fn unset_option(&self, option: u32) -> Result<&Self> {
        self.ensure_usable()?;
        self.config().options &= !option;
        Ok(self)
    }

    /// Returns the log mask. The mask is carried but not acted on.
    pub fn mask(&self) -> Result<u8> {
        self.ensure_usable()?;
        Ok(self.config().mask)
    }

    /// Sets the log mask. The mask is carried but not acted on.
    pub fn set_mask(&self, mask: u8) -> Result<&Self> {
        self.ensure_usable()?;
        self.config().mask = mask;
        Ok(self)
    }

    /// Returns this target when it is open, and `None` otherwise.
    ///
    /// A single atomic load; safe to call from signal handlers. No error is
    /// raised for paused or closed targets.
    pub fn is_open(&self) -> Option<&Self> {
        (self.state.load(Ordering::Acquire) == STATE_OPEN).then_some(self)
    }

    /// Transitions Paused to Open without touching the current-target slot.
    pub(crate) fn open_backend(&self) -> Result<()> {
        // state transitions are serialized with configuration changes
        let _config = self.config();
        if self.state.load(Ordering::Acquire) == STATE_OPEN {
            return Ok(());
        }
        self.backend.open(&self.name)?;
        self.state.store(STATE_OPEN, Ordering::Release);
        Ok(())
    }

    /// Sends `entry` to this target and returns the number of bytes handed
    /// to the backend.
    ///
    /// Header fields the entry leaves unset are filled from this target's
    /// defaults; the timestamp is captured here unless the entry pinned
    /// one. A transport failure on a network target pauses it until
    /// [`open_target`] is retried.
    pub fn add_entry(&self, entry: &Entry) -> Result<usize> {
        self.ensure_usable()?;
        match self.state() {
            STATE_OPEN => {}
            _ => {
                return error::fail(Error::new(
                    ErrorKind::TargetPaused,
                    "the target is paused; open it before logging",
                ));
            }
        }

        let defaults = {
            let config = self.config();
            format::Defaults {
                priority: config.default_priority,
                app_name: config.default_app_name.clone(),
                msgid: config.default_msgid.clone(),
                include_pid: config.options & options::PID != 0,
            }
        };

        let result = self.backend.write(self, entry, &defaults);
        if result.is_err() && self.kind == TargetKind::Network {
            // recoverable transport fault: pause until reopened, unless a
            // racing close already retired the target
            let _ = self.state.compare_exchange(
                STATE_OPEN,
                STATE_PAUSED,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
        result
    }

    /// Logs a message with this target's defaults.
    ///
    /// The message may be empty, in which case only the header is emitted.
    pub fn add_message(&self, message: fmt::Arguments<'_>) -> Result<usize> {
        let entry = Entry::builder().message(message.to_string()).build()?;
        self.add_entry(&entry)
    }

    /// Logs a message with the given priority, overriding this target's
    /// default priority for this call only.
    pub fn add_log(&self, priority: Priority, message: fmt::Arguments<'_>) -> Result<usize> {
        let entry = Entry::builder()
            .priority(priority)
            .message(message.to_string())
            .build()?;
        self.add_entry(&entry)
    }

    /// Removes and returns the bytes currently held by a buffer target,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TargetIncompatible`] for any other target kind.
    pub fn read_buffer(&self) -> Result<Vec<u8>> {
        self.ensure_usable()?;
        match &self.backend {
            Backend::Buffer(sink) => Ok(sink.read_all()),
            _ => error::fail(Error::new(
                ErrorKind::TargetIncompatible,
                "only buffer targets can be read",
            )),
        }
    }
}

/// Opens a paused target, acquiring backend resources and installing it as
/// the current target.
///
/// Opening an already-open target only reinstalls it as current. On failure
/// the target stays paused and can be reopened once the cause is resolved;
/// the returned target is the given one.
pub fn open_target(target: &Arc<Target>) -> Result<Arc<Target>> {
    target.ensure_usable()?;
    target.open_backend()?;
    registry::set_current_target(target);
    Ok(Arc::clone(target))
}

/// Closes a target of any kind, releasing its backend resources.
///
/// If the target was the current target, the current-target slot is reset
/// so bare logging calls fall back to the default target. Errors are
/// reported through the [error channel][crate::last_error]: closing a
/// target of an unsupported kind records
/// [`ErrorKind::TargetUnsupported`] and does nothing else, and closing an
/// already-closed target records [`ErrorKind::InvalidId`].
pub fn close_target(target: &Arc<Target>) {
    if !target.kind.is_supported() {
        error::raise(Error::new(
            ErrorKind::TargetUnsupported,
            "this backend family is not available in this build",
        ));
        return;
    }

    {
        let _config = target.config();
        if target.state.load(Ordering::Acquire) == STATE_CLOSED {
            error::raise(Error::new(
                ErrorKind::InvalidId,
                "the target has already been closed",
            ));
            return;
        }
        target.state.store(STATE_CLOSED, Ordering::Release);
        target.backend.close();
    }

    registry::forget(target);
}
