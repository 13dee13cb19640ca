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

use std::sync::Mutex;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// A bounded circular byte sink.
///
/// Writes append the serialized entry plus a newline; once the buffer is
/// full the oldest bytes are overwritten. The sink's own lock serializes
/// writes, which makes entry ordering on a buffer target linearizable.
#[derive(Debug)]
pub(crate) struct BufferSink {
    ring: Mutex<Ring>,
}

#[derive(Debug)]
struct Ring {
    buf: Box<[u8]>,
    /// Index of the oldest unread byte.
    read: usize,
    /// Number of readable bytes.
    len: usize,
}

impl Ring {
    fn push(&mut self, bytes: &[u8]) {
        let capacity = self.buf.len();
        for &byte in bytes {
            let write = (self.read + self.len) % capacity;
            self.buf[write] = byte;
            if self.len == capacity {
                self.read = (self.read + 1) % capacity;
            } else {
                self.len += 1;
            }
        }
    }

    fn drain(&mut self) -> Vec<u8> {
        let capacity = self.buf.len();
        let mut out = Vec::with_capacity(self.len);
        for offset in 0..self.len {
            out.push(self.buf[(self.read + offset) % capacity]);
        }
        self.read = 0;
        self.len = 0;
        out
    }
}

impl BufferSink {
    pub(crate) fn new(capacity: usize) -> BufferSink {
        BufferSink {
            ring: Mutex::new(Ring {
                buf: vec![0; capacity].into_boxed_slice(),
                read: 0,
                len: 0,
            }),
        }
    }

    pub(crate) fn write(&self, bytes: &[u8]) -> Result<usize> {
        let mut ring = self.ring.lock().unwrap_or_else(|err| err.into_inner());
        if bytes.len() + 1 > ring.buf.len() {
            return error::fail(Error::new(
                ErrorKind::ArgumentTooBig,
                "the message does not fit in the buffer",
            ));
        }
        ring.push(bytes);
        ring.push(b"\n");
        Ok(bytes.len() + 1)
    }

    /// Removes and returns all readable bytes, oldest first.
    pub(crate) fn read_all(&self) -> Vec<u8> {
        self.ring
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_append_with_newline() {
        let sink = BufferSink::new(64);
        sink.write(b"one").unwrap();
        sink.write(b"two").unwrap();
        assert_eq!(sink.read_all(), b"one\ntwo\n");
    }

    #[test]
    fn read_drains_the_buffer() {
        let sink = BufferSink::new(64);
        sink.write(b"one").unwrap();
        assert_eq!(sink.read_all(), b"one\n");
        assert!(sink.read_all().is_empty());
    }

    #[test]
    fn overflow_overwrites_the_oldest_bytes() {
        let sink = BufferSink::new(8);
        sink.write(b"abc").unwrap();
        sink.write(b"defgh").unwrap();

        // capacity 8 holds the tail of "abc\ndefgh\n"
        assert_eq!(sink.read_all(), b"c\ndefgh\n");
    }

    #[test]
    fn oversized_messages_are_rejected() {
        let sink = BufferSink::new(4);
        let err = sink.write(b"too long").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentTooBig);
        assert!(sink.read_all().is_empty());
    }
}
