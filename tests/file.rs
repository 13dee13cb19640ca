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

use stumpless::close_target;
use stumpless::ErrorKind;
use stumpless::Target;

#[test]
fn file_targets_append_newline_terminated_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service.log");
    let path = path.to_str().unwrap();

    let target = Target::new_file(path).unwrap();
    target.set_default_app_name("service").unwrap();
    stumpless::open_target(&target).unwrap();

    target.add_message(format_args!("starting up")).unwrap();
    target.add_message(format_args!("ready")).unwrap();
    close_target(&target);

    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.ends_with('\n'));
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("<14>1 "), "got: {contents}");
    assert!(lines[0].contains(" service - - - starting up"), "got: {contents}");
    assert!(lines[1].ends_with("ready"), "got: {contents}");
}

#[test]
fn reopening_appends_to_the_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appended.log");
    let path = path.to_str().unwrap();

    let first = Target::new_file(path).unwrap();
    stumpless::open_target(&first).unwrap();
    first.add_message(format_args!("from the first run")).unwrap();
    close_target(&first);

    let second = Target::new_file(path).unwrap();
    stumpless::open_target(&second).unwrap();
    second.add_message(format_args!("from the second run")).unwrap();
    close_target(&second);

    let contents = std::fs::read_to_string(path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn unopenable_paths_fail_to_open_and_stay_paused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested.log");

    let target = Target::new_file(path.to_str().unwrap()).unwrap();
    let err = stumpless::open_target(&target).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StreamWriteFailure);
    assert!(err.code().is_some());
    assert!(target.is_open().is_none());
}
