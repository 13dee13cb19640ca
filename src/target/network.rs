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
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::net::UdpSocket;
use std::sync::Mutex;
use std::time::Duration;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// The transport protocol of a network target.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Transport {
    /// Stream delivery with RFC 6587 octet-counting framing.
    Tcp,
    /// One datagram per entry.
    Udp,
}

/// The connect and send timeout applied to network targets.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A sink that delivers entries to a TCP or UDP syslog endpoint.
///
/// The target name is the endpoint address. TCP connections are established
/// by `open` with a bounded timeout; a failed send tears the connection down
/// so the owning target can pause and later be reopened.
#[derive(Debug)]
pub(crate) struct NetworkSink {
    transport: Transport,
    conn: Mutex<Conn>,
}

#[derive(Debug)]
enum Conn {
    Closed,
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl NetworkSink {
    pub(crate) fn new(transport: Transport) -> NetworkSink {
        NetworkSink {
            transport,
            conn: Mutex::new(Conn::Closed),
        }
    }

    pub(crate) fn transport(&self) -> Transport {
        self.transport
    }

    pub(crate) fn open(&self, destination: &str) -> Result<()> {
        let conn = match self.transport {
            Transport::Tcp => Conn::Tcp(connect_tcp(destination)?),
            Transport::Udp => Conn::Udp(connect_udp(destination)?),
        };
        *self.conn.lock().unwrap_or_else(|err| err.into_inner()) = conn;
        Ok(())
    }

    pub(crate) fn write(&self, bytes: &[u8]) -> Result<usize> {
        let mut guard = self.conn.lock().unwrap_or_else(|err| err.into_inner());
        match &mut *guard {
            Conn::Closed => error::fail(Error::new(
                ErrorKind::SocketSendFailure,
                "the network target is not connected",
            )),
            Conn::Tcp(stream) => {
                // RFC 6587 octet counting: the message length in decimal,
                // a space, then the message itself.
                let frame_header = format!("{} ", bytes.len());
                let result = stream
                    .write_all(frame_header.as_bytes())
                    .and_then(|()| stream.write_all(bytes));
                match result {
                    Ok(()) => Ok(frame_header.len() + bytes.len()),
                    Err(err) => {
                        // a broken stream cannot be retried; reconnect on reopen
                        *guard = Conn::Closed;
                        error::fail(Error::with_io_error(
                            ErrorKind::SocketSendFailure,
                            "failed to send to the network target",
                            &err,
                        ))
                    }
                }
            }
            Conn::Udp(socket) => socket.send(bytes).map_err(|err| {
                error::raise(Error::with_io_error(
                    ErrorKind::SocketSendFailure,
                    "failed to send to the network target",
                    &err,
                ))
            }),
        }
    }

    pub(crate) fn close(&self) {
        *self.conn.lock().unwrap_or_else(|err| err.into_inner()) = Conn::Closed;
    }
}

fn connect_tcp(destination: &str) -> Result<TcpStream> {
    let addrs = destination.to_socket_addrs().map_err(|err| {
        error::raise(Error::with_io_error(
            ErrorKind::SocketSendFailure,
            "could not resolve the network target address",
            &err,
        ))
    })?;

    let mut last_failure = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, SEND_TIMEOUT) {
            Ok(stream) => {
                stream
                    .set_write_timeout(Some(SEND_TIMEOUT))
                    .map_err(|err| {
                        error::raise(Error::with_io_error(
                            ErrorKind::SocketSendFailure,
                            "could not configure the network target connection",
                            &err,
                        ))
                    })?;
                return Ok(stream);
            }
            Err(err) => last_failure = Some(err),
        }
    }

    match last_failure {
        Some(err) => error::fail(Error::with_io_error(
            ErrorKind::SocketSendFailure,
            "failed to connect to the network target",
            &err,
        )),
        None => error::fail(Error::new(
            ErrorKind::SocketSendFailure,
            "the network target address resolved to nothing",
        )),
    }
}

fn connect_udp(destination: &str) -> Result<UdpSocket> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))
        .and_then(|socket| {
            socket.connect(destination)?;
            socket.set_write_timeout(Some(SEND_TIMEOUT))?;
            Ok(socket)
        })
        .map_err(|err| {
            error::raise(Error::with_io_error(
                ErrorKind::SocketSendFailure,
                "failed to open the network target socket",
                &err,
            ))
        })?;
    Ok(socket)
}
