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
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// A syslog facility as defined by RFC 5424.
///
/// The default facility is [`User`][Facility::User].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Facility {
    /// Kernel messages.
    Kern = 0,
    /// User-level messages.
    #[default]
    User = 1,
    /// Mail system.
    Mail = 2,
    /// System daemons.
    Daemon = 3,
    /// Security and authorization messages.
    Auth = 4,
    /// Messages generated internally by syslogd.
    Syslog = 5,
    /// Line printer subsystem.
    Lpr = 6,
    /// Network news subsystem.
    News = 7,
    /// UUCP subsystem.
    Uucp = 8,
    /// Clock daemon.
    Cron = 9,
    /// Security and authorization messages considered sensitive.
    AuthPriv = 10,
    /// FTP daemon.
    Ftp = 11,
    /// NTP subsystem.
    Ntp = 12,
    /// Log audit.
    Audit = 13,
    /// Log alert.
    Alert = 14,
    /// Second clock daemon facility.
    Cron2 = 15,
    /// Reserved for local use.
    Local0 = 16,
    /// Reserved for local use.
    Local1 = 17,
    /// Reserved for local use.
    Local2 = 18,
    /// Reserved for local use.
    Local3 = 19,
    /// Reserved for local use.
    Local4 = 20,
    /// Reserved for local use.
    Local5 = 21,
    /// Reserved for local use.
    Local6 = 22,
    /// Reserved for local use.
    Local7 = 23,
}

impl Facility {
    /// The numeric facility code used in prival computation.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up the facility with the given code.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidFacility`] for codes outside 0..=23.
    pub fn from_code(code: u8) -> Result<Facility> {
        use Facility::*;

        match code {
            0 => Ok(Kern),
            1 => Ok(User),
            2 => Ok(Mail),
            3 => Ok(Daemon),
            4 => Ok(Auth),
            5 => Ok(Syslog),
            6 => Ok(Lpr),
            7 => Ok(News),
            8 => Ok(Uucp),
            9 => Ok(Cron),
            10 => Ok(AuthPriv),
            11 => Ok(Ftp),
            12 => Ok(Ntp),
            13 => Ok(Audit),
            14 => Ok(Alert),
            15 => Ok(Cron2),
            16 => Ok(Local0),
            17 => Ok(Local1),
            18 => Ok(Local2),
            19 => Ok(Local3),
            20 => Ok(Local4),
            21 => Ok(Local5),
            22 => Ok(Local6),
            23 => Ok(Local7),
            _ => error::fail(Error::new(
                ErrorKind::InvalidFacility,
                "facility codes must be in the range 0 through 23",
            )),
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Facility::Kern => "kern",
            Facility::User => "user",
            Facility::Mail => "mail",
            Facility::Daemon => "daemon",
            Facility::Auth => "auth",
            Facility::Syslog => "syslog",
            Facility::Lpr => "lpr",
            Facility::News => "news",
            Facility::Uucp => "uucp",
            Facility::Cron => "cron",
            Facility::AuthPriv => "authpriv",
            Facility::Ftp => "ftp",
            Facility::Ntp => "ntp",
            Facility::Audit => "audit",
            Facility::Alert => "alert",
            Facility::Cron2 => "cron2",
            Facility::Local0 => "local0",
            Facility::Local1 => "local1",
            Facility::Local2 => "local2",
            Facility::Local3 => "local3",
            Facility::Local4 => "local4",
            Facility::Local5 => "local5",
            Facility::Local6 => "local6",
            Facility::Local7 => "local7",
        };
        f.write_str(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=23 {
            assert_eq!(Facility::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn out_of_range_code_is_rejected() {
        let err = Facility::from_code(24).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFacility);
    }
}
