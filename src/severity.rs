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

use std::fmt;

use crate::error;
use crate::ErrorKind;
use crate::Result;

/// A syslog severity as defined by RFC 5424.
///
/// The default severity is [`Info`][Severity::Info].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Severity {
    /// The system is unusable.
    Emergency = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical conditions.
    Critical = 2,
    /// Error conditions.
    Error = 3,
    /// Warning conditions.
    Warning = 4,
    /// Normal but significant conditions.
    Notice = 5,
    /// Informational messages.
    #[default]
    Info = 6,
    /// Debug-level messages.
    Debug = 7,
}

impl Severity {
    /// The numeric severity code used in prival computation.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up the severity with the given code.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidSeverity`] for codes outside 0..=7.
    pub fn from_code(code: u8) -> Result<Severity> {
        use Severity::*;

        match code {
            0 => Ok(Emergency),
            1 => Ok(Alert),
            2 => Ok(Critical),
            3 => Ok(Error),
            4 => Ok(Warning),
            5 => Ok(Notice),
            6 => Ok(Info),
            7 => Ok(Debug),
            _ => error::fail(crate::Error::new(
                ErrorKind::InvalidSeverity,
                "severity codes must be in the range 0 through 7",
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Severity::Emergency => "emerg",
            Severity::Alert => "alert",
            Severity::Critical => "crit",
            Severity::Error => "err",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        };
        f.write_str(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=7 {
            assert_eq!(Severity::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        let err = Severity::from_code(8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSeverity);
    }
}
