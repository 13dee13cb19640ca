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

//! The RFC 5424 log record model.
//!
//! An [`Entry`] carries the header fields and structured data of a single
//! log record. Fields left unset are filled in from the receiving target's
//! defaults when the entry is dispatched, so a bare entry with only a
//! message is perfectly usable.

use std::fmt;
use std::time::SystemTime;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Priority;
use crate::Result;

/// The longest app name accepted on an entry or as a target default.
pub const MAX_APP_NAME_LENGTH: usize = 48;

/// The longest msgid accepted on an entry or as a target default.
pub const MAX_MSGID_LENGTH: usize = 32;

/// The longest structured-data element or parameter name.
pub const MAX_SD_NAME_LENGTH: usize = 32;

/// True when every byte of `s` is printable ASCII (33 through 126).
pub(crate) fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (33..=126).contains(&b))
}

/// True when `s` is a valid SD-NAME: printable ASCII without `=`, `]`,
/// or `"`.
fn is_sd_name(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_SD_NAME_LENGTH
        && s.bytes()
            .all(|b| (33..=126).contains(&b) && b != b'=' && b != b']' && b != b'"')
}

pub(crate) fn validate_app_name(app_name: &str) -> Result<()> {
    if app_name.len() > MAX_APP_NAME_LENGTH {
        return error::fail(Error::new(
            ErrorKind::ArgumentTooBig,
            "app names are limited to 48 characters",
        ));
    }
    if !is_printable_ascii(app_name) {
        return error::fail(Error::new(
            ErrorKind::InvalidEncoding,
            "app names may only contain printable ASCII characters",
        ));
    }
    Ok(())
}

pub(crate) fn validate_msgid(msgid: &str) -> Result<()> {
    if msgid.len() > MAX_MSGID_LENGTH {
        return error::fail(Error::new(
            ErrorKind::ArgumentTooBig,
            "msgids are limited to 32 characters",
        ));
    }
    if !is_printable_ascii(msgid) {
        return error::fail(Error::new(
            ErrorKind::InvalidEncoding,
            "msgids may only contain printable ASCII characters",
        ));
    }
    Ok(())
}

/// A parameter of a structured-data element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param {
    name: String,
    value: String,
}

impl Param {
    /// Creates a parameter with the given name and value.
    ///
    /// The value is unrestricted; it is escaped during serialization. The
    /// name must be a valid SD-NAME.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Param> {
        let name = name.into();
        if !is_sd_name(&name) {
            return error::fail(Error::new(
                ErrorKind::InvalidEncoding,
                "param names must be printable ASCII without '=', ']', or '\"'",
            ));
        }
        Ok(Param {
            name,
            value: value.into(),
        })
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A structured-data element: a name plus a list of parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    name: String,
    params: Vec<Param>,
}

impl Element {
    /// Creates an element with the given SD-NAME and no parameters.
    pub fn new(name: impl Into<String>) -> Result<Element> {
        let name = name.into();
        if !is_sd_name(&name) {
            return error::fail(Error::new(
                ErrorKind::InvalidEncoding,
                "element names must be printable ASCII without '=', ']', or '\"'",
            ));
        }
        Ok(Element {
            name,
            params: Vec::new(),
        })
    }

    /// Appends a parameter to this element.
    pub fn with_param(mut self, param: Param) -> Element {
        self.params.push(param);
        self
    }

    /// The element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element's parameters, in insertion order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// A single RFC 5424 log record.
///
/// Unset header fields serialize as the nil value `-` unless the receiving
/// target has a default for them.
#[derive(Clone, Debug, Default)]
pub struct Entry {
    priority: Option<Priority>,
    timestamp: Option<SystemTime>,
    hostname: Option<String>,
    app_name: Option<String>,
    procid: Option<String>,
    msgid: Option<String>,
    elements: Vec<Element>,
    message: Option<String>,
}

impl Entry {
    /// Starts building an entry.
    pub fn builder() -> EntryBuilder {
        EntryBuilder::default()
    }

    /// Creates an entry with the fields most commonly set together.
    pub fn new(
        priority: Priority,
        app_name: &str,
        msgid: &str,
        message: impl fmt::Display,
    ) -> Result<Entry> {
        Entry::builder()
            .priority(priority)
            .app_name(app_name)
            .msgid(msgid)
            .message(message.to_string())
            .build()
    }

    /// The priority, when one was set.
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// The capture timestamp, when one was pinned explicitly.
    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    /// The originating hostname, when set.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// The app name, when set.
    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    /// The process id field, when set.
    pub fn procid(&self) -> Option<&str> {
        self.procid.as_deref()
    }

    /// The msgid, when set.
    pub fn msgid(&self) -> Option<&str> {
        self.msgid.as_deref()
    }

    /// The structured-data elements, in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The free-form message, when set.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// A builder for [`Entry`] values.
///
/// Setters are infallible; all validation happens in [`build`][Self::build]
/// so chains read cleanly.
#[derive(Clone, Debug, Default)]
pub struct EntryBuilder {
    entry: Entry,
}

impl EntryBuilder {
    /// Sets the priority, overriding any target default.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.entry.priority = Some(priority);
        self
    }

    /// Pins the timestamp instead of capturing one at dispatch time.
    pub fn timestamp(mut self, timestamp: SystemTime) -> Self {
        self.entry.timestamp = Some(timestamp);
        self
    }

    /// Sets the originating hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.entry.hostname = Some(hostname.into());
        self
    }

    /// Sets the app name.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.entry.app_name = Some(app_name.into());
        self
    }

    /// Sets the process id field.
    pub fn procid(mut self, procid: impl Into<String>) -> Self {
        self.entry.procid = Some(procid.into());
        self
    }

    /// Sets the msgid.
    pub fn msgid(mut self, msgid: impl Into<String>) -> Self {
        self.entry.msgid = Some(msgid.into());
        self
    }

    /// Appends a structured-data element.
    pub fn element(mut self, element: Element) -> Self {
        self.entry.elements.push(element);
        self
    }

    /// Sets the free-form message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.entry.message = Some(message.into());
        self
    }

    /// Validates the accumulated fields and produces the entry.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ArgumentTooBig`] when a field exceeds its RFC
    /// 5424 length bound, or [`ErrorKind::InvalidEncoding`] when a field
    /// contains bytes outside its allowed charset.
    pub fn build(self) -> Result<Entry> {
        if let Some(app_name) = &self.entry.app_name {
            validate_app_name(app_name)?;
        }
        if let Some(msgid) = &self.entry.msgid {
            validate_msgid(msgid)?;
        }
        if let Some(hostname) = &self.entry.hostname {
            if hostname.len() > 255 || !is_printable_ascii(hostname) {
                return error::fail(Error::new(
                    ErrorKind::InvalidEncoding,
                    "hostnames must be printable ASCII of at most 255 characters",
                ));
            }
        }
        if let Some(procid) = &self.entry.procid {
            if procid.len() > 128 || !is_printable_ascii(procid) {
                return error::fail(Error::new(
                    ErrorKind::InvalidEncoding,
                    "procids must be printable ASCII of at most 128 characters",
                ));
            }
        }
        Ok(self.entry)
    }
}
