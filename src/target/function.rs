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
use std::io;

use crate::error;
use crate::Entry;
use crate::Error;
use crate::ErrorKind;
use crate::Result;
use crate::Target;

/// The callback invoked by a function target for each dispatched entry.
///
/// The callback runs synchronously on the logging thread and receives the
/// target and the original entry, before target defaults are applied. The
/// returned byte count is reported to the caller; an error maps to
/// [`ErrorKind::FunctionTargetFailure`].
pub type LogHandler = dyn Fn(&Target, &Entry) -> io::Result<usize> + Send + Sync;

/// A sink that hands entries to a user callback.
pub(crate) struct FunctionSink {
    handler: Box<LogHandler>,
}

impl fmt::Debug for FunctionSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSink").finish_non_exhaustive()
    }
}

impl FunctionSink {
    pub(crate) fn new(handler: Box<LogHandler>) -> FunctionSink {
        FunctionSink { handler }
    }

    pub(crate) fn write(&self, target: &Target, entry: &Entry) -> Result<usize> {
        (self.handler)(target, entry).map_err(|err| {
            error::raise(Error::with_io_error(
                ErrorKind::FunctionTargetFailure,
                "the log handler reported failure",
                &err,
            ))
        })
    }
}
