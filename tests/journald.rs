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

//! Behavior of journald targets on builds without the `journald` feature:
//! the target kind exists, but every operation reports it as unsupported
//! and performs no backend work.

#![cfg(not(feature = "journald"))]

use stumpless::close_target;
use stumpless::Entry;
use stumpless::ErrorKind;
use stumpless::Target;
use stumpless::TargetKind;

#[test]
fn add_entry_reports_the_target_as_unsupported() {
    let target = Target::new_journald("journal").unwrap();
    assert_eq!(target.kind(), TargetKind::Journald);
    assert!(!target.kind().is_supported());

    let entry = Entry::builder().message("dropped").build().unwrap();
    let err = target.add_entry(&entry).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TargetUnsupported);
    assert_eq!(
        stumpless::last_error().unwrap().kind(),
        ErrorKind::TargetUnsupported
    );
}

#[test]
fn open_and_configuration_report_the_target_as_unsupported() {
    let target = Target::new_journald("journal").unwrap();

    assert_eq!(stumpless::open_target(&target).unwrap_err().kind(), ErrorKind::TargetUnsupported);
    assert_eq!(
        target.set_option(stumpless::target::options::PID).unwrap_err().kind(),
        ErrorKind::TargetUnsupported
    );
    assert_eq!(target.name().unwrap_err().kind(), ErrorKind::TargetUnsupported);
}

#[test]
fn generic_close_sets_the_error_and_does_nothing_else() {
    let target = Target::new_journald("journal").unwrap();

    stumpless::clear_error();
    close_target(&target);
    assert_eq!(
        stumpless::last_error().unwrap().kind(),
        ErrorKind::TargetUnsupported
    );

    // the target was not torn down; a second close reports the same
    stumpless::clear_error();
    close_target(&target);
    assert_eq!(
        stumpless::last_error().unwrap().kind(),
        ErrorKind::TargetUnsupported
    );
}

#[test]
fn the_default_target_is_never_journald() {
    let default = stumpless::get_default_target().unwrap();
    assert_ne!(default.kind(), TargetKind::Journald);
    stumpless::free_all();
}
