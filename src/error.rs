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

//! Error kinds and the per-thread last-error channel.
//!
//! Every fallible operation in this crate returns a [`Result`] carrying an
//! [`Error`]. In addition, a failing operation records the error in a
//! thread-local slot before returning so that callers which discard the
//! `Result` (for example via [`stumplog`][crate::stumplog]) can still
//! inspect what went wrong with [`last_error`]. Successful operations never
//! clear the slot; use [`clear_error`] for that.

use std::cell::RefCell;
use std::io;

/// A specialized result type for stumpless operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a failure raised by this crate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required argument was missing or empty.
    ArgumentEmpty,
    /// An argument exceeded a size bound.
    ArgumentTooBig,
    /// The callback of a function target reported failure.
    FunctionTargetFailure,
    /// A string contained bytes outside the charset allowed for its field.
    InvalidEncoding,
    /// A facility code was outside the RFC 5424 range.
    InvalidFacility,
    /// The target has been closed and is no longer usable.
    InvalidId,
    /// A severity code was outside the RFC 5424 range.
    InvalidSeverity,
    /// An allocation failed while servicing the operation.
    MemoryAllocationFailure,
    /// A datagram or stream socket send failed.
    SocketSendFailure,
    /// A write to a file or stream sink failed.
    StreamWriteFailure,
    /// The operation does not apply to the target's backend family.
    TargetIncompatible,
    /// The target exists but is not currently delivering entries.
    TargetPaused,
    /// The target's backend family is not available in this build.
    TargetUnsupported,
    /// The transport refused the message, for example due to its size.
    TransportProtocolUnsupported,
}

/// How the OS code attached to an [`Error`] should be interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CodeType {
    /// No OS code is attached.
    #[default]
    None,
    /// The code is an errno value from the platform libc.
    Errno,
}

/// An error raised by a stumpless operation.
///
/// Carries a [kind][ErrorKind], a static human-readable message, and an
/// optional OS error code with a tag describing how to interpret it.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
    code: Option<i32>,
    code_type: CodeType,
}

impl Error {
    pub(crate) const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            code: None,
            code_type: CodeType::None,
        }
    }

    /// Attach the raw OS code of `err`, when it has one.
    pub(crate) fn with_io_error(kind: ErrorKind, message: &'static str, err: &io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) => Self {
                kind,
                message,
                code: Some(code),
                code_type: CodeType::Errno,
            },
            None => Self::new(kind, message),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The static description of this error.
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// The OS code attached to this error, if any.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// How [`code`][Self::code] should be interpreted.
    pub fn code_type(&self) -> CodeType {
        self.code_type
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<Error>> = const { RefCell::new(None) };
}

/// Returns the last error raised on the calling thread, if any.
///
/// The slot is overwritten by each failing operation and survives successful
/// ones; it reflects the most recent failure, not the most recent call.
pub fn last_error() -> Option<Error> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Clears the calling thread's last-error slot.
pub fn clear_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Records `err` in the thread-local slot and hands it back.
pub(crate) fn raise(err: Error) -> Error {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(err.clone()));
    err
}

/// Shorthand for failing an operation through the error channel.
pub(crate) fn fail<T>(err: Error) -> Result<T> {
    Err(raise(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_populates_thread_local_slot() {
        clear_error();
        assert!(last_error().is_none());

        let _ = fail::<()>(Error::new(ErrorKind::ArgumentEmpty, "missing name"));
        let err = last_error().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentEmpty);
        assert_eq!(err.message(), "missing name");
    }

    #[test]
    fn slot_survives_until_overwritten() {
        clear_error();
        let _ = fail::<()>(Error::new(ErrorKind::TargetPaused, "paused"));
        let _ = fail::<()>(Error::new(ErrorKind::InvalidId, "closed"));
        assert_eq!(last_error().unwrap().kind(), ErrorKind::InvalidId);

        clear_error();
        assert!(last_error().is_none());
    }

    #[test]
    fn io_errors_carry_the_os_code() {
        let io_err = io::Error::from_raw_os_error(13);
        let err = Error::with_io_error(ErrorKind::StreamWriteFailure, "write failed", &io_err);
        assert_eq!(err.code(), Some(13));
        assert_eq!(err.code_type(), CodeType::Errno);
    }
}
