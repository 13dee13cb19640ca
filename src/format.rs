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

//! RFC 5424 text serialization.
//!
//! Output format:
//!
//! ```text
//! <14>1 2024-08-02T12:49:03.102343Z - portal - TCPIN [exampleSDID@32473 eventSource="Application"] listener started
//! ```
//!
//! The serializer emits no trailing newline; line-oriented sinks append one.

use std::time::SystemTime;

use crate::entry::Element;
use crate::Entry;
use crate::Priority;

/// A snapshot of the target defaults that apply to one dispatch.
#[derive(Clone, Debug)]
pub(crate) struct Defaults {
    pub(crate) priority: Priority,
    pub(crate) app_name: String,
    pub(crate) msgid: String,
    pub(crate) include_pid: bool,
}

fn nil_or(field: Option<&str>) -> &str {
    match field {
        Some(value) if !value.is_empty() => value,
        _ => "-",
    }
}

fn put_param_value(out: &mut String, value: &str) {
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
}

fn put_element(out: &mut String, element: &Element) {
    out.push('[');
    out.push_str(element.name());
    for param in element.params() {
        out.push(' ');
        out.push_str(param.name());
        out.push_str("=\"");
        put_param_value(out, param.value());
        out.push('"');
    }
    out.push(']');
}

/// Serializes `entry` to RFC 5424 text, filling unset header fields from
/// `defaults` and stamping `captured` when the entry has no pinned
/// timestamp.
pub(crate) fn rfc5424(entry: &Entry, defaults: &Defaults, captured: SystemTime) -> Vec<u8> {
    let prival = entry.priority().unwrap_or(defaults.priority).prival();
    let timestamp = humantime::format_rfc3339_micros(entry.timestamp().unwrap_or(captured));

    let mut out = format!(
        "<{prival}>1 {timestamp} {hostname} {app_name} {procid} {msgid}",
        hostname = nil_or(entry.hostname()),
        app_name = nil_or(entry.app_name().or(Some(defaults.app_name.as_str()))),
        procid = nil_or(entry.procid()),
        msgid = nil_or(entry.msgid().or(Some(defaults.msgid.as_str()))),
    );

    out.push(' ');
    if entry.elements().is_empty() && !defaults.include_pid {
        out.push('-');
    } else {
        for element in entry.elements() {
            put_element(&mut out, element);
        }
        if defaults.include_pid {
            out.push_str("[origin pid=\"");
            out.push_str(&std::process::id().to_string());
            out.push_str("\"]");
        }
    }

    match entry.message() {
        Some(message) if !message.is_empty() => {
            out.push(' ');
            out.push_str(message);
        }
        _ => {}
    }

    out.into_bytes()
}
