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
use std::io::Write;
use std::sync::Mutex;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// A sink over an arbitrary byte stream. One newline-terminated line per
/// entry, flushed after each write so interleaved process output stays
/// readable.
pub(crate) struct StreamSink {
    stream: Mutex<Option<Box<dyn Write + Send>>>,
}

impl fmt::Debug for StreamSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSink").finish_non_exhaustive()
    }
}

impl StreamSink {
    pub(crate) fn new(stream: Box<dyn Write + Send>) -> StreamSink {
        StreamSink {
            stream: Mutex::new(Some(stream)),
        }
    }

    pub(crate) fn write(&self, bytes: &[u8]) -> Result<usize> {
        let mut guard = self.stream.lock().unwrap_or_else(|err| err.into_inner());
        let Some(stream) = guard.as_mut() else {
            return error::fail(Error::new(
                ErrorKind::StreamWriteFailure,
                "the stream target is not open",
            ));
        };

        stream
            .write_all(bytes)
            .and_then(|()| stream.write_all(b"\n"))
            .and_then(|()| stream.flush())
            .map_err(|err| {
                error::raise(Error::with_io_error(
                    ErrorKind::StreamWriteFailure,
                    "failed to write to the stream",
                    &err,
                ))
            })?;
        Ok(bytes.len() + 1)
    }

    pub(crate) fn close(&self) {
        self.stream
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .take();
    }
}
