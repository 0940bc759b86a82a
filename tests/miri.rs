//! Tests specifically for miri

#![cfg(miri)]

use std::sync::Arc;
use std::thread;

use crossing::Channel;

/// Cross-thread hand-off through the channel, small enough for miri to
/// execute in reasonable time.
#[test]
fn channel_handoff() {
    let channel = Arc::new(Channel::new());

    let producer = {
        let channel = Arc::clone(&channel);
        thread::spawn(move || {
            for value in 0..4u32 {
                channel.send(value);
            }
        })
    };

    for value in 0..4u32 {
        assert_eq!(channel.recv(), value);
    }
    producer.join().unwrap();
}
