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

use std::io::Write;
use std::os::unix::net::UnixDatagram;
use std::sync::Mutex;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Priority;
use crate::Result;

const JOURNALD_PATH: &str = "/run/systemd/journal/socket";

/// A sink that submits entries to the systemd journal over its native
/// datagram socket.
///
/// Each submission carries `PRIORITY`, `SYSLOG_FACILITY`, `SYSLOG_PID`, and
/// the serialized entry as `MESSAGE`. The message field is length-encoded
/// so embedded newlines survive.
#[derive(Debug)]
pub(crate) struct JournaldSink {
    socket: Mutex<Option<UnixDatagram>>,
}

impl JournaldSink {
    pub(crate) fn new() -> JournaldSink {
        JournaldSink {
            socket: Mutex::new(None),
        }
    }

    pub(crate) fn open(&self) -> Result<()> {
        let socket = UnixDatagram::unbound()
            .and_then(|socket| {
                // an empty payload is discarded by journald but verifies the
                // socket is reachable, e.g. outside containers without it
                socket.send_to(&[], JOURNALD_PATH)?;
                Ok(socket)
            })
            .map_err(|err| {
                error::raise(Error::with_io_error(
                    ErrorKind::SocketSendFailure,
                    "failed to reach the journald socket",
                    &err,
                ))
            })?;
        *self.socket.lock().unwrap_or_else(|err| err.into_inner()) = Some(socket);
        Ok(())
    }

    pub(crate) fn write(&self, priority: Priority, bytes: &[u8]) -> Result<usize> {
        let guard = self.socket.lock().unwrap_or_else(|err| err.into_inner());
        let Some(socket) = guard.as_ref() else {
            return error::fail(Error::new(
                ErrorKind::SocketSendFailure,
                "the journald target is not open",
            ));
        };

        let mut payload = Vec::with_capacity(bytes.len() + 64);
        // numeric fields cannot contain newlines, so plain key=value works
        let _ = writeln!(payload, "PRIORITY={}", priority.severity().code());
        let _ = writeln!(payload, "SYSLOG_FACILITY={}", priority.facility().code());
        let _ = writeln!(payload, "SYSLOG_PID={}", std::process::id());
        put_field_length_encoded(&mut payload, "MESSAGE", bytes);

        socket.send_to(&payload, JOURNALD_PATH).map_err(|err| {
            if err.raw_os_error() == Some(libc::EMSGSIZE) {
                error::raise(Error::with_io_error(
                    ErrorKind::TransportProtocolUnsupported,
                    "journald refused the payload size",
                    &err,
                ))
            } else {
                error::raise(Error::with_io_error(
                    ErrorKind::SocketSendFailure,
                    "failed to send to journald",
                    &err,
                ))
            }
        })
    }

    pub(crate) fn close(&self) {
        self.socket
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .take();
    }
}

/// Journal field with the binary-safe encoding: name, newline, 64-bit
/// little-endian length, value, newline.
fn put_field_length_encoded(payload: &mut Vec<u8>, name: &str, value: &[u8]) {
    payload.extend_from_slice(name.as_bytes());
    payload.push(b'\n');
    payload.extend_from_slice(&(value.len() as u64).to_le_bytes());
    payload.extend_from_slice(value);
    payload.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_encoded_fields_carry_their_size() {
        let mut payload = Vec::new();
        put_field_length_encoded(&mut payload, "MESSAGE", b"two\nlines");

        let mut expected = b"MESSAGE\n".to_vec();
        expected.extend_from_slice(&9u64.to_le_bytes());
        expected.extend_from_slice(b"two\nlines\n");
        assert_eq!(payload, expected);
    }
}
