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

use std::io::Read;
use std::net::TcpListener;
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

use stumpless::ErrorKind;
use stumpless::Target;
use stumpless::Transport;

#[test]
fn tcp_frames_messages_with_octet_counting() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        conn.read_to_end(&mut received).unwrap();
        received
    });

    let target = Target::new_network(addr.to_string(), Transport::Tcp).unwrap();
    stumpless::open_target(&target).unwrap();
    let written = target.add_message(format_args!("framed")).unwrap();
    stumpless::close_target(&target);

    let received = server.join().unwrap();
    assert_eq!(received.len(), written);

    // RFC 6587: "<length> <message>", no trailing newline
    let text = String::from_utf8(received).unwrap();
    let (length, message) = text.split_once(' ').unwrap();
    assert_eq!(length.parse::<usize>().unwrap(), message.len());
    assert!(message.starts_with("<14>1 "), "got: {message}");
    assert!(message.ends_with("framed"), "got: {message}");
}

#[test]
fn tcp_open_failure_leaves_the_target_paused_and_reopenable() {
    // grab a port, then free it so the connect is refused
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let target = Target::new_network(addr.to_string(), Transport::Tcp).unwrap();
    let err = stumpless::open_target(&target).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SocketSendFailure);
    assert!(target.is_open().is_none());

    assert_eq!(
        target.add_message(format_args!("x")).unwrap_err().kind(),
        ErrorKind::TargetPaused
    );

    // a listener appears; reopening succeeds
    let listener = TcpListener::bind(addr).unwrap();
    stumpless::open_target(&target).unwrap();
    assert!(target.is_open().is_some());

    drop(listener);
    stumpless::close_target(&target);
}

#[test]
fn tcp_send_failure_pauses_the_target() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let target = Target::new_network(addr.to_string(), Transport::Tcp).unwrap();
    stumpless::open_target(&target).unwrap();

    // accept and immediately drop the connection, then release the port
    let (conn, _) = listener.accept().unwrap();
    drop(conn);
    drop(listener);

    // the first write may land in the kernel buffer before the reset
    // arrives; keep writing until the failure surfaces
    let mut failure = None;
    for _ in 0..50 {
        match target.add_message(format_args!("doomed")) {
            Ok(_) => thread::sleep(Duration::from_millis(20)),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let failure = failure.expect("sends kept succeeding on a dead connection");
    assert_eq!(failure.kind(), ErrorKind::SocketSendFailure);
    assert!(target.is_open().is_none());

    // the paused target refuses further entries until reopened
    assert_eq!(
        target.add_message(format_args!("x")).unwrap_err().kind(),
        ErrorKind::TargetPaused
    );
}

#[test]
fn udp_sends_one_datagram_per_entry() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let addr = receiver.local_addr().unwrap();

    let target = Target::new_network(addr.to_string(), Transport::Udp).unwrap();
    stumpless::open_target(&target).unwrap();
    target.add_message(format_args!("first datagram")).unwrap();
    target.add_message(format_args!("second datagram")).unwrap();

    let mut buf = [0u8; 2048];
    let first = receiver.recv(&mut buf).unwrap();
    let first = String::from_utf8_lossy(&buf[..first]).into_owned();
    let second = receiver.recv(&mut buf).unwrap();
    let second = String::from_utf8_lossy(&buf[..second]).into_owned();

    assert!(first.starts_with("<14>1 "), "got: {first}");
    assert!(first.ends_with("first datagram"), "got: {first}");
    assert!(second.ends_with("second datagram"), "got: {second}");

    stumpless::close_target(&target);
}

#[test]
fn unresolvable_addresses_fail_to_open() {
    let target = Target::new_network("not an address", Transport::Tcp).unwrap();
    let err = stumpless::open_target(&target).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SocketSendFailure);
    assert!(target.is_open().is_none());
}
