// tests/slot_table.rs

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use tokio::time::Instant;

use dropwatch::slots::{self, ContentKind, MAX_NAME_LEN, SlotError, SlotTable, Visit, lock_slots};
use dropwatch::types::WatchId;

#[test]
fn allocate_initialises_a_fresh_slot() {
    let now = Instant::now();
    let mut table = SlotTable::new(4);

    let id = table.allocate("movie1", now).unwrap();
    let slot = table.get(id).unwrap();

    assert_eq!(slot.name(), "movie1");
    assert!(slot.flags().is_empty());
    assert_eq!(slot.last_activity(), now);
    assert_eq!(slot.watch(), None);
    assert_eq!(table.len(), 1);
}

#[test]
fn allocate_uses_first_free_slot_in_order() {
    let now = Instant::now();
    let mut table = SlotTable::new(3);

    let a = table.allocate("a", now).unwrap();
    let b = table.allocate("b", now).unwrap();
    let c = table.allocate("c", now).unwrap();
    assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));

    table.release(b);
    let d = table.allocate("d", now).unwrap();
    assert_eq!(d, b);
}

#[test]
fn allocate_fails_closed_when_full() {
    let now = Instant::now();
    let mut table = SlotTable::new(2);
    table.allocate("a", now).unwrap();
    table.allocate("b", now).unwrap();

    let err = table.allocate("c", now).unwrap_err();
    assert_eq!(err, SlotError::Full { capacity: 2 });

    // Existing slots untouched.
    assert_eq!(table.names(), vec!["a", "b"]);
    assert!(table.is_full());
}

#[test]
fn allocate_rejects_duplicate_names() {
    let now = Instant::now();
    let mut table = SlotTable::new(4);
    table.allocate("movie1", now).unwrap();

    let err = table.allocate("movie1", now).unwrap_err();
    assert_eq!(err, SlotError::AlreadyTracked("movie1".to_string()));
    assert_eq!(table.len(), 1);
}

#[test]
fn allocate_rejects_overlong_names() {
    let mut table = SlotTable::new(1);
    let name = "x".repeat(MAX_NAME_LEN + 1);

    let err = table.allocate(&name, Instant::now()).unwrap_err();
    assert!(matches!(err, SlotError::NameTooLong { .. }));
    assert!(table.is_empty());

    let ok = "y".repeat(MAX_NAME_LEN);
    assert!(table.allocate(&ok, Instant::now()).is_ok());
}

#[test]
fn lookup_finds_only_attached_occupied_slots() {
    let now = Instant::now();
    let mut table = SlotTable::new(2);
    let id = table.allocate("a", now).unwrap();

    assert_eq!(table.lookup(WatchId::new(7)), None);
    assert!(table.attach(id, WatchId::new(7)));
    assert_eq!(table.lookup(WatchId::new(7)), Some(id));

    table.release(id);
    assert_eq!(table.lookup(WatchId::new(7)), None);
    assert!(!table.attach(id, WatchId::new(8)));
}

#[test]
fn released_slot_is_reused_with_reset_state() {
    let now = Instant::now();
    let mut table = SlotTable::new(1);

    let id = table.allocate("first", now).unwrap();
    table.attach(id, WatchId::new(1));
    {
        let slot = table.get_mut(id).unwrap();
        slot.record(ContentKind::Media);
        slot.record(ContentKind::Text);
    }

    let released = table.release(id).unwrap();
    assert_eq!(released.name(), "first");
    assert!(released.flags().contains(ContentKind::Media));
    assert!(table.release(id).is_none());

    let later = now + Duration::from_secs(30);
    let again = table.allocate("second", later).unwrap();
    assert_eq!(again, id);

    let slot = table.get(again).unwrap();
    assert_eq!(slot.name(), "second");
    assert!(slot.flags().is_empty());
    assert_eq!(slot.watch(), None);
    assert_eq!(slot.last_activity(), later);
}

#[test]
fn touch_never_moves_backwards() {
    let now = Instant::now();
    let mut table = SlotTable::new(1);
    let id = table.allocate("a", now).unwrap();
    let slot = table.get_mut(id).unwrap();

    slot.touch(now + Duration::from_secs(5));
    slot.touch(now + Duration::from_secs(2));
    assert_eq!(slot.last_activity(), now + Duration::from_secs(5));
}

#[test]
fn for_each_occupied_releases_what_the_visitor_asks_for() {
    let now = Instant::now();
    let mut table = SlotTable::new(4);
    for name in ["a", "b", "c"] {
        table.allocate(name, now).unwrap();
    }

    let mut visited = Vec::new();
    let released = table.for_each_occupied(|_, slot| {
        visited.push(slot.name().to_string());
        if slot.name() == "b" { Visit::Release } else { Visit::Keep }
    });

    assert_eq!(visited, vec!["a", "b", "c"]);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].name(), "b");
    assert_eq!(table.names(), vec!["a", "c"]);
}

#[test]
fn concurrent_allocations_never_share_a_slot() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 16;

    let shared = slots::shared(THREADS * PER_THREAD);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let shared = Arc::clone(&shared);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|i| {
                        lock_slots(&shared)
                            .allocate(&format!("dir-{t}-{i}"), Instant::now())
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "slot {id} handed out twice");
        }
    }

    assert_eq!(seen.len(), THREADS * PER_THREAD);
    assert!(lock_slots(&shared).is_full());
}
