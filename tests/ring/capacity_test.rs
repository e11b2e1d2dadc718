/*!
 * Ring Buffer Capacity Tests
 * Writers block at capacity and resume after a drain
 */

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use sync_pipelines::{BoundedRingBuffer, BufferError};

#[test]
fn test_capacity_plus_one_write_blocks_until_drain() {
    const CAPACITY: usize = 16;
    let buffer = Arc::new(BoundedRingBuffer::new(CAPACITY).unwrap());

    for i in 0..CAPACITY {
        buffer.write(i).unwrap();
    }
    assert_eq!(buffer.len(), CAPACITY);

    let blocked_writes = Arc::new(AtomicUsize::new(0));
    let writer = {
        let buffer = buffer.clone();
        let blocked_writes = blocked_writes.clone();
        thread::spawn(move || {
            buffer.write(CAPACITY).unwrap();
            blocked_writes.fetch_add(1, Ordering::SeqCst);
        })
    };

    // Give the writer time to park on the full buffer
    thread::sleep(Duration::from_millis(100));
    assert_eq!(blocked_writes.load(Ordering::SeqCst), 0);
    assert_eq!(buffer.len(), CAPACITY);

    let drained = buffer.drain_all().unwrap();
    assert_eq!(drained, (0..CAPACITY).collect::<Vec<_>>());

    writer.join().unwrap();
    assert_eq!(blocked_writes.load(Ordering::SeqCst), 1);
    assert_eq!(buffer.drain_all().unwrap(), vec![CAPACITY]);
}

#[test]
fn test_partial_fill_drains_exactly_k() {
    let buffer = BoundedRingBuffer::new(10).unwrap();
    for k in [1usize, 4, 10] {
        for i in 0..k {
            buffer.write(i * 100).unwrap();
        }
        let drained = buffer.drain_all().unwrap();
        assert_eq!(drained.len(), k);
        assert_eq!(drained, (0..k).map(|i| i * 100).collect::<Vec<_>>());
    }
}

#[test]
fn test_write_timeout_succeeds_once_space_frees() {
    let buffer = Arc::new(BoundedRingBuffer::new(1).unwrap());
    buffer.write(1).unwrap();

    let drainer = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            buffer.drain_all().unwrap()
        })
    };

    buffer.write_timeout(2, Duration::from_secs(5)).unwrap();
    assert_eq!(drainer.join().unwrap(), vec![1]);
    assert_eq!(buffer.drain_all().unwrap(), vec![2]);
}

#[test]
fn test_close_releases_every_blocked_writer() {
    let buffer = Arc::new(BoundedRingBuffer::new(1).unwrap());
    buffer.write(0).unwrap();

    let writers: Vec<_> = (1..=4)
        .map(|i| {
            let buffer = buffer.clone();
            thread::spawn(move || buffer.write(i))
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    buffer.close();

    for writer in writers {
        assert_eq!(writer.join().unwrap(), Err(BufferError::Closed));
    }
    assert_eq!(buffer.drain_all().unwrap(), vec![0]);
}
