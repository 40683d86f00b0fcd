//! Tests for the alarm queue.

use super::*;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Long enough for a spawned thread to reach its blocking point.
const SETTLE: Duration = Duration::from_millis(50);
/// Upper bound for a wakeup that must happen.
const WAKE_TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_alarm_delivered_before_normals() -> Result<()> {
    let queue = AlarmQueue::new();

    queue.send(1, MsgKind::Normal)?;
    queue.send(2, MsgKind::Normal)?;
    queue.send(9, MsgKind::Alarm)?;

    assert_eq!(queue.size()?, 3);
    assert_eq!(queue.alarm_count()?, 1);

    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Alarm, 9));
    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Normal, 1));
    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Normal, 2));

    assert_eq!(queue.size()?, 0);
    assert_eq!(queue.alarm_count()?, 0);
    Ok(())
}

#[test]
fn test_normals_fifo() -> Result<()> {
    let queue = AlarmQueue::new();

    for i in 0..10 {
        queue.send(i, MsgKind::Normal)?;
    }
    for i in 0..10 {
        let msg = queue.receive()?;
        assert_eq!(msg.kind, MsgKind::Normal);
        assert_eq!(msg.payload, i);
    }
    Ok(())
}

#[test]
fn test_size_counts_alarm_and_normals() -> Result<()> {
    let queue = AlarmQueue::new();
    assert_eq!(queue.size()?, 0);

    queue.send("n1", MsgKind::Normal)?;
    assert_eq!(queue.size()?, 1);
    assert_eq!(queue.alarm_count()?, 0);

    queue.send("a", MsgKind::Alarm)?;
    assert_eq!(queue.size()?, 2);
    assert_eq!(queue.alarm_count()?, 1);

    queue.receive()?;
    assert_eq!(queue.size()?, 1);
    assert_eq!(queue.alarm_count()?, 0);
    Ok(())
}

#[test]
fn test_try_send_alarm_no_room() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.try_send(1, MsgKind::Alarm)?;

    let err = queue.try_send(2, MsgKind::Alarm).unwrap_err();
    assert_eq!(err.error(), Error::NoRoom);
    assert_eq!(err.into_inner(), 2);

    // Rejection leaves the queue untouched
    assert_eq!(queue.size()?, 1);
    assert_eq!(queue.receive()?.payload, 1);
    Ok(())
}

#[test]
fn test_try_send_normal_with_alarm_queued() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.try_send(1, MsgKind::Alarm)?;
    queue.try_send(2, MsgKind::Normal)?;
    assert_eq!(queue.size()?, 2);
    Ok(())
}

#[test]
fn test_try_receive_empty() -> Result<()> {
    let queue: AlarmQueue<u8> = AlarmQueue::new();
    assert_eq!(queue.try_receive(), Err(Error::NoMessage));

    queue.send(4, MsgKind::Normal)?;
    assert_eq!(queue.try_receive()?.payload, 4);
    assert_eq!(queue.try_receive(), Err(Error::NoMessage));
    Ok(())
}

#[test]
fn test_blocked_receiver_wakes_on_send() -> Result<()> {
    let queue = AlarmQueue::new();
    let (tx, rx) = mpsc::channel();

    let receiver = {
        let queue = queue.clone();
        thread::spawn(move || {
            let msg = queue.receive();
            tx.send(msg).unwrap();
        })
    };

    thread::sleep(SETTLE);
    assert!(rx.try_recv().is_err(), "receiver returned from an empty queue");

    queue.send(42, MsgKind::Normal)?;
    let msg = rx.recv_timeout(WAKE_TIMEOUT).expect("receiver was not woken")?;
    assert_eq!(msg.into_parts(), (MsgKind::Normal, 42));

    receiver.join().unwrap();
    Ok(())
}

#[test]
fn test_second_alarm_blocks_until_first_received() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.send(1, MsgKind::Alarm)?;

    let (tx, rx) = mpsc::channel();
    let sender = {
        let queue = queue.clone();
        thread::spawn(move || {
            let result = queue.send(2, MsgKind::Alarm).map_err(Error::from);
            tx.send(result).unwrap();
        })
    };

    thread::sleep(SETTLE);
    assert!(rx.try_recv().is_err(), "second alarm send did not block");
    assert_eq!(queue.alarm_count()?, 1);

    // Normal sends are never held back by the blocked alarm
    queue.send(3, MsgKind::Normal)?;

    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Alarm, 1));
    rx.recv_timeout(WAKE_TIMEOUT)
        .expect("alarm sender was not released")?;
    sender.join().unwrap();

    assert_eq!(queue.alarm_count()?, 1);
    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Alarm, 2));
    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Normal, 3));
    assert_eq!(queue.alarm_count()?, 0);
    Ok(())
}

#[test]
fn test_released_alarm_overtakes_older_normal() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.send(10, MsgKind::Normal)?;
    queue.send(1, MsgKind::Alarm)?;

    let (tx, rx) = mpsc::channel();
    let sender = {
        let queue = queue.clone();
        thread::spawn(move || {
            tx.send(queue.send(2, MsgKind::Alarm).map_err(Error::from))
                .unwrap();
        })
    };

    thread::sleep(SETTLE);
    // The queued alarm goes first, which frees the slot
    assert_eq!(queue.receive()?.payload, 1);
    rx.recv_timeout(WAKE_TIMEOUT).expect("sender not released")?;
    sender.join().unwrap();

    // The second alarm still beats the older normal
    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Alarm, 2));
    assert_eq!(queue.receive()?.into_parts(), (MsgKind::Normal, 10));
    Ok(())
}

#[test]
fn test_destroy_drains_in_delivery_order() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.send("n1", MsgKind::Normal)?;
    queue.send("n2", MsgKind::Normal)?;
    queue.send("a", MsgKind::Alarm)?;

    let drained: Vec<_> = queue.destroy().into_iter().map(Message::into_parts).collect();
    assert_eq!(
        drained,
        vec![
            (MsgKind::Alarm, "a"),
            (MsgKind::Normal, "n1"),
            (MsgKind::Normal, "n2"),
        ]
    );

    assert!(queue.is_destroyed());
    assert!(queue.destroy().is_empty());
    Ok(())
}

#[test]
fn test_operations_after_destroy() {
    let queue = AlarmQueue::new();
    queue.destroy();

    assert_eq!(queue.size(), Err(Error::Uninitialized));
    assert_eq!(queue.alarm_count(), Err(Error::Uninitialized));
    assert_eq!(queue.receive(), Err(Error::Uninitialized));
    assert_eq!(queue.try_receive(), Err(Error::Uninitialized));

    let err = queue.send(5, MsgKind::Normal).unwrap_err();
    assert_eq!(err.error(), Error::Uninitialized);
    assert_eq!(err.into_inner(), 5);

    let err = queue.try_send(6, MsgKind::Alarm).unwrap_err();
    assert_eq!(err.error(), Error::Uninitialized);
}

#[test]
fn test_destroy_wakes_blocked_receiver() {
    let queue: AlarmQueue<u32> = AlarmQueue::new();
    let (tx, rx) = mpsc::channel();

    let receiver = {
        let queue = queue.clone();
        thread::spawn(move || tx.send(queue.receive()).unwrap())
    };

    thread::sleep(SETTLE);
    assert!(queue.destroy().is_empty());

    let result = rx.recv_timeout(WAKE_TIMEOUT).expect("receiver not woken");
    assert_eq!(result, Err(Error::Uninitialized));
    receiver.join().unwrap();
}

#[test]
fn test_destroy_wakes_blocked_alarm_sender() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.send(1, MsgKind::Alarm)?;
    let (tx, rx) = mpsc::channel();

    let sender = {
        let queue = queue.clone();
        thread::spawn(move || {
            let payload = queue.send(2, MsgKind::Alarm).map_err(|e| (e.error(), e.into_inner()));
            tx.send(payload).unwrap();
        })
    };

    thread::sleep(SETTLE);
    let drained = queue.destroy();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].payload, 1);

    let result = rx.recv_timeout(WAKE_TIMEOUT).expect("sender not woken");
    assert_eq!(result, Err((Error::Uninitialized, 2)));
    sender.join().unwrap();
    Ok(())
}

#[test]
fn test_payload_not_copied() -> Result<()> {
    use std::sync::Arc;

    let payload = Arc::new(String::from("shared"));
    let queue = AlarmQueue::new();
    queue.send(Arc::clone(&payload), MsgKind::Normal)?;

    let received = queue.receive()?.payload;
    assert!(Arc::ptr_eq(&payload, &received));
    Ok(())
}

#[test]
fn test_debug_reports_counts() -> Result<()> {
    let queue = AlarmQueue::new();
    queue.send((), MsgKind::Alarm)?;
    queue.send((), MsgKind::Normal)?;

    let debug = format!("{queue:?}");
    assert!(debug.contains("size: 2"));
    assert!(debug.contains("alarms: 1"));
    Ok(())
}
