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

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::error;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// An append-mode file sink. One newline-terminated line per entry.
#[derive(Debug)]
pub(crate) struct FileSink {
    file: Mutex<Option<File>>,
}

impl FileSink {
    pub(crate) fn new() -> FileSink {
        FileSink {
            file: Mutex::new(None),
        }
    }

    pub(crate) fn open(&self, path: &str) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| {
                error::raise(Error::with_io_error(
                    ErrorKind::StreamWriteFailure,
                    "failed to open the log file",
                    &err,
                ))
            })?;
        *self.file.lock().unwrap_or_else(|err| err.into_inner()) = Some(file);
        Ok(())
    }

    pub(crate) fn write(&self, bytes: &[u8]) -> Result<usize> {
        let mut guard = self.file.lock().unwrap_or_else(|err| err.into_inner());
        let Some(file) = guard.as_mut() else {
            return error::fail(Error::new(
                ErrorKind::StreamWriteFailure,
                "the log file is not open",
            ));
        };

        file.write_all(bytes)
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|err| {
                error::raise(Error::with_io_error(
                    ErrorKind::StreamWriteFailure,
                    "failed to write to the log file",
                    &err,
                ))
            })?;
        Ok(bytes.len() + 1)
    }

    pub(crate) fn close(&self) {
        self.file
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .take();
    }
}
