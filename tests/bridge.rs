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

use stumpless::Target;

#[test]
fn log_crate_records_reach_the_current_target() {
    stumpless::bridge::setup_log_crate();

    let target = Target::new_buffer("bridge", 8192).unwrap();
    stumpless::open_target(&target).unwrap();

    log::info!("an info record");
    log::error!("an error record");

    let contents = String::from_utf8(target.read_buffer().unwrap()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    // info maps to user.info, error to user.err
    assert!(lines[0].starts_with("<14>1 "), "got: {contents}");
    assert!(lines[0].ends_with("an info record"), "got: {contents}");
    assert!(lines[1].starts_with("<11>1 "), "got: {contents}");
    assert!(lines[1].ends_with("an error record"), "got: {contents}");

    stumpless::free_all();
}
