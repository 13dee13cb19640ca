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

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use stumpless::Facility;
use stumpless::Target;
use stumpless::TargetKind;

fn read_to_string(target: &Target) -> String {
    String::from_utf8(target.read_buffer().unwrap()).unwrap()
}

#[test]
fn message_round_trips_through_the_buffer() {
    let target = Target::new_buffer("round-trip", 4096).unwrap();
    stumpless::open_target(&target).unwrap();

    let written = target.add_message(format_args!("hello {}", 42)).unwrap();
    let contents = read_to_string(&target);
    assert_eq!(contents.len(), written);

    // <14>1 2024-08-02T12:49:03.102343Z - - - - - hello 42\n
    assert!(contents.starts_with("<14>1 "), "got: {contents}");
    assert!(contents.ends_with(" - - - - - hello 42\n"), "got: {contents}");

    let timestamp = contents
        .split_whitespace()
        .nth(1)
        .expect("missing timestamp field");
    assert_eq!(timestamp.len(), "2024-08-02T12:49:03.102343Z".len());
    assert!(timestamp.ends_with('Z'), "got: {timestamp}");
}

#[test]
fn default_facility_override_changes_the_prival() {
    let target = Target::new_buffer("facility", 4096).unwrap();
    target.set_default_facility(Facility::Local0).unwrap();
    stumpless::open_target(&target).unwrap();

    target.add_message(format_args!("x")).unwrap();

    // local0.info = 16 * 8 + 6
    let contents = read_to_string(&target);
    assert!(contents.starts_with("<134>1 "), "got: {contents}");
}

#[test]
fn reading_drains_the_buffer() {
    let target = Target::new_buffer("drain", 4096).unwrap();
    stumpless::open_target(&target).unwrap();

    target.add_message(format_args!("once")).unwrap();
    assert!(!target.read_buffer().unwrap().is_empty());
    assert!(target.read_buffer().unwrap().is_empty());
}

#[test]
fn read_buffer_rejects_other_target_kinds() {
    let target = Target::new_function("not-a-buffer", |_, _| Ok(0)).unwrap();
    let err = target.read_buffer().unwrap_err();
    assert_eq!(err.kind(), stumpless::ErrorKind::TargetIncompatible);
}

#[test]
fn concurrent_writers_never_interleave() {
    const WRITERS: usize = 8;
    const MESSAGES: usize = 25;

    let target = Target::new_buffer("concurrent", 64 * 1024).unwrap();
    stumpless::open_target(&target).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let target = Arc::clone(&target);
            thread::spawn(move || {
                for message in 0..MESSAGES {
                    target
                        .add_message(format_args!("payload writer={writer} message={message}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let contents = read_to_string(&target);
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), WRITERS * MESSAGES);

    // every line is one complete serialized entry, no duplication or loss
    let mut seen = HashSet::new();
    for line in lines {
        assert!(line.starts_with("<14>1 "), "torn line: {line}");
        let payload = line
            .split_once(" - - - - - ")
            .unwrap_or_else(|| panic!("torn line: {line}"))
            .1;
        assert!(seen.insert(payload.to_string()), "duplicated: {payload}");
    }
    assert_eq!(seen.len(), WRITERS * MESSAGES);
}

#[test]
fn target_kind_is_stable_across_operations() {
    let target = Target::new_buffer("kind", 4096).unwrap();
    assert_eq!(target.kind(), TargetKind::Buffer);

    target.set_default_facility(Facility::Daemon).unwrap();
    stumpless::open_target(&target).unwrap();
    target.add_message(format_args!("x")).unwrap();
    target.read_buffer().unwrap();

    assert_eq!(target.kind(), TargetKind::Buffer);
}
