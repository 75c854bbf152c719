use fs2::FileExt;
use logwatch::truncate::compact;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_keeps_newer_half_of_large_log() {
    let temp_dir = tempdir().unwrap();
    let log = temp_dir.path().join("app.log");

    // Larger than the copy buffer so both copy loops run more than once
    let old = vec![b'o'; 300 * 1024];
    let new: Vec<u8> = (0..300 * 1024 + 1).map(|i| (i % 251) as u8).collect();
    let mut content = old.clone();
    content.extend_from_slice(&new);
    fs::write(&log, &content).unwrap();

    let len = content.len() as u64;
    let kept = compact(&log, len).unwrap();

    assert_eq!(kept, len - len / 2);
    assert_eq!(fs::read(&log).unwrap(), &content[(len / 2) as usize..]);
}

#[test]
fn test_empty_log_is_identity() {
    let temp_dir = tempdir().unwrap();
    let log = temp_dir.path().join("app.log");
    fs::write(&log, b"").unwrap();

    compact(&log, 0).unwrap();
    assert!(fs::read(&log).unwrap().is_empty());
}

#[test]
fn test_waits_for_cooperating_lock_holder() {
    let temp_dir = tempdir().unwrap();
    let log = temp_dir.path().join("app.log");
    fs::write(&log, b"aaaabbbb").unwrap();

    let mut holder = OpenOptions::new().append(true).open(&log).unwrap();
    holder.lock_exclusive().unwrap();

    let (tx, rx) = mpsc::channel();
    let path = log.clone();
    let handle = thread::spawn(move || {
        let result = compact(&path, 8);
        tx.send(()).unwrap();
        result
    });

    // Still blocked on the lock; the file is untouched.
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    assert_eq!(fs::read(&log).unwrap(), b"aaaabbbb");

    // A cooperating writer appends while it holds the lock.
    holder.write_all(b"cc").unwrap();
    FileExt::unlock(&holder).unwrap();

    rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(handle.join().unwrap().unwrap(), 6);
    assert_eq!(fs::read(&log).unwrap(), b"bbbbcc");
}

#[test]
fn test_lock_is_released_afterwards() {
    let temp_dir = tempdir().unwrap();
    let log = temp_dir.path().join("app.log");
    fs::write(&log, b"0123").unwrap();

    compact(&log, 4).unwrap();

    let file = OpenOptions::new().read(true).write(true).open(&log).unwrap();
    file.try_lock_exclusive().unwrap();
    FileExt::unlock(&file).unwrap();
}
