// tests/notify_backend.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{
    AccessKind, AccessMode, CreateKind, DataChange, Flag, MetadataKind, ModifyKind, RemoveKind,
    RenameMode,
};
use notify::{Event, EventKind};
use tokio::sync::mpsc;
use tokio::time::Instant;

use dropwatch::engine::{Dispatch, EventDispatcher, RuntimeEvent};
use dropwatch::slots::{self, ContentClassifier, lock_slots};
use dropwatch::types::WatchId;
use dropwatch::watch::path_utils::{change_kind, translate};
use dropwatch::watch::{ChangeKind, FsEvent, NotifyWatchBackend, WatchBackend, WatchRegistry};
use dropwatch_test_utils::{FakeWatchBackend, init_tracing};

fn registry_with(paths: &[&str]) -> (WatchRegistry, Vec<WatchId>) {
    let mut registry = WatchRegistry::new();
    let ids = paths
        .iter()
        .map(|p| registry.reserve(Path::new(p)).unwrap())
        .collect();
    (registry, ids)
}

#[test]
fn reserve_refuses_duplicates_and_remove_frees_the_path() {
    let (mut registry, ids) = registry_with(&["/srv/incoming"]);
    let root = ids[0];
    assert_eq!(root.raw(), 1);

    assert_eq!(registry.reserve(Path::new("/srv/incoming")), None);
    assert_eq!(registry.path_of(root), Some(Path::new("/srv/incoming")));

    assert_eq!(registry.remove(root), Some(PathBuf::from("/srv/incoming")));
    assert_eq!(registry.remove(root), None);
    assert!(registry.is_empty());

    let again = registry.reserve(Path::new("/srv/incoming")).unwrap();
    assert_ne!(again, root);
}

#[test]
fn creations_go_to_the_parent_watch() {
    let (registry, ids) = registry_with(&["/srv/incoming", "/srv/incoming/movie1"]);
    let (root, movie1) = (ids[0], ids[1]);

    assert_eq!(
        registry.attribute(Path::new("/srv/incoming/movie1"), true),
        Some((root, Some("movie1".to_string())))
    );
    assert_eq!(
        registry.attribute(Path::new("/srv/incoming/movie1/a.mp4"), true),
        Some((movie1, Some("a.mp4".to_string())))
    );
    assert_eq!(registry.attribute(Path::new("/srv/incoming/movie1/sub/x.txt"), true), None);
    assert_eq!(registry.attribute(Path::new("/elsewhere/x"), true), None);
}

#[test]
fn other_events_on_a_watched_path_go_to_its_own_watch() {
    let (registry, ids) = registry_with(&["/srv/incoming", "/srv/incoming/movie1"]);
    let (root, movie1) = (ids[0], ids[1]);

    assert_eq!(registry.attribute(Path::new("/srv/incoming/movie1"), false), Some((movie1, None)));
    assert_eq!(registry.attribute(Path::new("/srv/incoming"), false), Some((root, None)));
    assert_eq!(
        registry.attribute(Path::new("/srv/incoming/movie1/a.mp4"), false),
        Some((movie1, Some("a.mp4".to_string())))
    );
    // An unwatched entry of the root still belongs to the root watch.
    assert_eq!(
        registry.attribute(Path::new("/srv/incoming/notes.txt"), false),
        Some((root, Some("notes.txt".to_string())))
    );
}

#[test]
fn change_kinds_are_mapped() {
    let p = Path::new("/definitely/not/here");

    assert_eq!(change_kind(&EventKind::Create(CreateKind::Folder), p), ChangeKind::DirCreated);
    assert_eq!(change_kind(&EventKind::Create(CreateKind::File), p), ChangeKind::FileCreated);
    // Unknown creation kind on a path that is not a directory.
    assert_eq!(change_kind(&EventKind::Create(CreateKind::Any), p), ChangeKind::FileCreated);
    assert_eq!(
        change_kind(&EventKind::Access(AccessKind::Close(AccessMode::Write)), p),
        ChangeKind::WriteClosed
    );
    assert_eq!(
        change_kind(&EventKind::Access(AccessKind::Close(AccessMode::Read)), p),
        ChangeKind::Accessed
    );
    assert_eq!(
        change_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content)), p),
        ChangeKind::Modified
    );
    assert_eq!(
        change_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To)), p),
        ChangeKind::Renamed
    );
    assert_eq!(change_kind(&EventKind::Remove(RemoveKind::Folder), p), ChangeKind::Removed);
    assert_eq!(change_kind(&EventKind::Other, p), ChangeKind::Other);
}

#[test]
fn unknown_creation_kind_checks_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        change_kind(&EventKind::Create(CreateKind::Any), dir.path()),
        ChangeKind::DirCreated
    );
}

#[test]
fn translate_attributes_every_known_path() {
    let (registry, ids) = registry_with(&["/srv/incoming", "/srv/incoming/movie1"]);
    let (root, movie1) = (ids[0], ids[1]);

    let event = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write)))
        .add_path(PathBuf::from("/srv/incoming/movie1/movie1.mp4"))
        .add_path(PathBuf::from("/unwatched/file.txt"));
    assert_eq!(
        translate(&event, &registry),
        vec![FsEvent::named(movie1, ChangeKind::WriteClosed, "movie1.mp4")]
    );

    let event = Event::new(EventKind::Create(CreateKind::Folder))
        .add_path(PathBuf::from("/srv/incoming/movie2"))
        .set_flag(Flag::Rescan);
    assert_eq!(
        translate(&event, &registry),
        vec![FsEvent::named(root, ChangeKind::DirCreated, "movie2")]
    );

    let event = Event::new(EventKind::Remove(RemoveKind::Folder)).add_path(PathBuf::from("/srv/incoming"));
    assert_eq!(
        translate(&event, &registry),
        vec![FsEvent::on_self(root, ChangeKind::Removed)]
    );
}

#[test]
fn metadata_change_on_a_tracked_subdirectory_is_its_own_event() {
    let (registry, ids) = registry_with(&["/srv/incoming", "/srv/incoming/movie1"]);
    let movie1 = ids[1];

    let event = Event::new(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)))
        .add_path(PathBuf::from("/srv/incoming/movie1"));
    assert_eq!(
        translate(&event, &registry),
        vec![FsEvent::on_self(movie1, ChangeKind::Modified)]
    );

    let event = Event::new(EventKind::Remove(RemoveKind::Folder)).add_path(PathBuf::from("/srv/incoming/movie1"));
    assert_eq!(
        translate(&event, &registry),
        vec![FsEvent::on_self(movie1, ChangeKind::Removed)]
    );
}

#[test]
fn translated_self_event_resets_the_idle_clock() {
    let root = PathBuf::from("/srv/incoming");
    let backend = Arc::new(FakeWatchBackend::new());
    let root_watch = backend.subscribe(&root).unwrap();
    let slots = slots::shared(4);
    let dispatcher = EventDispatcher::new(
        &root,
        root_watch,
        Arc::clone(&slots),
        backend.clone(),
        ContentClassifier::default(),
    );
    assert_eq!(dispatcher.root_watch(), root_watch);

    let t0 = Instant::now();
    let Dispatch::Tracked { slot, watch, .. } = dispatcher
        .dispatch(FsEvent::named(root_watch, ChangeKind::DirCreated, "movie1"), t0)
        .unwrap()
    else {
        panic!("directory was not tracked");
    };

    // Both the registry and the fake hand out handles in subscription order.
    let (registry, ids) = registry_with(&["/srv/incoming", "/srv/incoming/movie1"]);
    assert_eq!(ids, vec![root_watch, watch]);

    let event = Event::new(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)))
        .add_path(root.join("movie1"));
    let translated = translate(&event, &registry);
    assert_eq!(translated, vec![FsEvent::on_self(watch, ChangeKind::Modified)]);

    let later = t0 + Duration::from_secs(4);
    assert!(matches!(
        dispatcher.dispatch(translated[0].clone(), later).unwrap(),
        Dispatch::Updated { .. }
    ));
    assert_eq!(lock_slots(&slots).get(slot).unwrap().last_activity(), later);
}

async fn next_matching(
    rx: &mut mpsc::UnboundedReceiver<RuntimeEvent>,
    wanted: impl Fn(&FsEvent) -> bool,
) -> FsEvent {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match rx.recv().await {
                Some(RuntimeEvent::Fs(event)) if wanted(&event) => return event,
                Some(_) => continue,
                None => panic!("runtime channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for a filesystem event")
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn notify_backend_reports_creation_and_completed_writes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let backend = NotifyWatchBackend::new(tx).unwrap();
    let root_watch = backend.subscribe(&root).unwrap();

    // Subscribing twice to the same directory is refused.
    assert!(backend.subscribe(&root).is_err());

    std::fs::create_dir(root.join("movie1")).unwrap();
    let created = next_matching(&mut rx, |e| e.kind == ChangeKind::DirCreated).await;
    assert_eq!(created, FsEvent::named(root_watch, ChangeKind::DirCreated, "movie1"));

    let movie1 = backend.subscribe(&root.join("movie1")).unwrap();
    std::fs::write(root.join("movie1").join("movie1.mp4"), b"data").unwrap();

    let closed = next_matching(&mut rx, |e| e.kind == ChangeKind::WriteClosed).await;
    assert_eq!(closed, FsEvent::named(movie1, ChangeKind::WriteClosed, "movie1.mp4"));

    backend.unsubscribe(movie1).unwrap();
    assert!(backend.unsubscribe(movie1).is_err());
    backend.unsubscribe(root_watch).unwrap();
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn subscribing_to_a_missing_directory_fails_cleanly() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");

    let (tx, _rx) = mpsc::unbounded_channel();
    let backend = NotifyWatchBackend::new(tx).unwrap();

    assert!(backend.subscribe(&missing).is_err());

    // The failed attempt leaves nothing reserved.
    std::fs::create_dir(&missing).unwrap();
    let id = backend.subscribe(&missing).unwrap();
    backend.unsubscribe(id).unwrap();
}
