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

use std::os::unix::net::UnixDatagram;
use std::sync::Mutex;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// A sink that sends each entry as one datagram to a Unix socket.
///
/// The target name is the destination socket path. The local socket stays
/// unbound; nothing is transmitted until the first entry is dispatched, so
/// opening succeeds even when the destination does not exist yet.
#[derive(Debug)]
pub(crate) struct SocketSink {
    socket: Mutex<Option<UnixDatagram>>,
}

impl SocketSink {
    pub(crate) fn new() -> SocketSink {
        SocketSink {
            socket: Mutex::new(None),
        }
    }

    pub(crate) fn open(&self) -> Result<()> {
        let socket = UnixDatagram::unbound().map_err(|err| {
            error::raise(Error::with_io_error(
                ErrorKind::SocketSendFailure,
                "failed to create the local datagram socket",
                &err,
            ))
        })?;
        *self.socket.lock().unwrap_or_else(|err| err.into_inner()) = Some(socket);
        Ok(())
    }

    pub(crate) fn write(&self, path: &str, bytes: &[u8]) -> Result<usize> {
        let guard = self.socket.lock().unwrap_or_else(|err| err.into_inner());
        let Some(socket) = guard.as_ref() else {
            return error::fail(Error::new(
                ErrorKind::SocketSendFailure,
                "the socket target is not open",
            ));
        };

        socket.send_to(bytes, path).map_err(|err| {
            if err.raw_os_error() == Some(libc::EMSGSIZE) {
                error::raise(Error::with_io_error(
                    ErrorKind::TransportProtocolUnsupported,
                    "the datagram socket refused the message size",
                    &err,
                ))
            } else {
                error::raise(Error::with_io_error(
                    ErrorKind::SocketSendFailure,
                    "failed to send to the socket target",
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
