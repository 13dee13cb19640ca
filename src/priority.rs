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

use crate::Facility;
use crate::Result;
use crate::Severity;

/// A facility and severity pair, encoding the RFC 5424 prival.
///
/// The prival is `facility * 8 + severity`; the default priority is
/// `user.info` (prival 14).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Priority {
    facility: Facility,
    severity: Severity,
}

impl Priority {
    /// Creates a priority from its parts.
    pub const fn new(facility: Facility, severity: Severity) -> Self {
        Self { facility, severity }
    }

    /// Decodes a prival into a priority.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidFacility`][crate::ErrorKind::InvalidFacility]
    /// when the facility portion is out of range. The severity portion of a
    /// byte can never be out of range.
    pub fn from_prival(prival: u8) -> Result<Priority> {
        let facility = Facility::from_code(prival >> 3)?;
        let severity = Severity::from_code(prival & 0x7)?;
        Ok(Self { facility, severity })
    }

    /// The facility portion.
    pub const fn facility(self) -> Facility {
        self.facility
    }

    /// The severity portion.
    pub const fn severity(self) -> Severity {
        self.severity
    }

    /// The combined prival value.
    pub const fn prival(self) -> u8 {
        self.facility.code() * 8 + self.severity.code()
    }
}

impl From<(Facility, Severity)> for Priority {
    fn from((facility, severity): (Facility, Severity)) -> Self {
        Self::new(facility, severity)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.facility, self.severity)
    }
}
