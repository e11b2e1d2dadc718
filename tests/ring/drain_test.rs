/*!
 * Ring Buffer Drain Tests
 * Concurrent writers never cause a drain to duplicate or lose a sample
 */

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use sync_pipelines::{BoundedRingBuffer, BufferError};

const WRITERS: u64 = 6;
const PER_WRITER: u64 = 2_000;

#[test]
fn test_drains_partition_all_writes() {
    let buffer = Arc::new(BoundedRingBuffer::<(u64, u64)>::new(64).unwrap());

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for seq in 0..PER_WRITER {
                    buffer.write((writer, seq)).unwrap();
                }
            })
        })
        .collect();

    let drainer = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            let mut drains = Vec::new();
            loop {
                match buffer.drain_all_timeout(Duration::from_millis(200)) {
                    Ok(snapshot) => drains.push(snapshot),
                    Err(BufferError::Closed) => break,
                    Err(BufferError::Timeout { .. }) => continue,
                    Err(e) => panic!("unexpected drain error: {}", e),
                }
            }
            drains
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    buffer.close();
    let drains = drainer.join().unwrap();

    let mut seen = HashSet::new();
    let mut last_seq = vec![None::<u64>; WRITERS as usize];

    for snapshot in &drains {
        assert!(!snapshot.is_empty());
        assert!(snapshot.len() <= 64);
        for &(writer, seq) in snapshot {
            assert!(seen.insert((writer, seq)), "duplicate sample {:?}", (writer, seq));

            // Each writer's samples come out in the order it wrote them
            let last = &mut last_seq[writer as usize];
            assert!(last.map_or(true, |prev| seq > prev));
            *last = Some(seq);
        }
    }

    assert_eq!(seen.len() as u64, WRITERS * PER_WRITER);

    let stats = buffer.stats();
    assert_eq!(stats.written, WRITERS * PER_WRITER);
    assert_eq!(stats.drained, WRITERS * PER_WRITER);
    assert_eq!(stats.buffered, 0);
}

#[test]
fn test_drain_sees_all_writes_completed_before_it() {
    let buffer = Arc::new(BoundedRingBuffer::new(128).unwrap());
    for i in 0..50 {
        buffer.write(i).unwrap();
    }

    let writer = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            for i in 50..100 {
                buffer.write(i).unwrap();
            }
        })
    };

    let first = buffer.drain_all().unwrap();
    writer.join().unwrap();
    let rest = buffer.drain_all_timeout(Duration::from_millis(100)).unwrap_or_default();

    // Everything written before the first drain is in it, in order
    assert!(first.len() >= 50);
    assert_eq!(&first[..50], &(0..50).collect::<Vec<_>>()[..]);

    let all: Vec<i32> = first.into_iter().chain(rest).collect();
    assert_eq!(all, (0..100).collect::<Vec<_>>());
}

#[test]
fn test_blocked_drainer_wakes_on_write() {
    let buffer = Arc::new(BoundedRingBuffer::new(4).unwrap());
    let drainer = {
        let buffer = buffer.clone();
        thread::spawn(move || buffer.drain_all())
    };

    thread::sleep(Duration::from_millis(50));
    buffer.write("reading").unwrap();

    assert_eq!(drainer.join().unwrap(), Ok(vec!["reading"]));
}
