use std::path::Path;
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use xsltgen_build::{is_up_to_date, BuildTimestamp, FinalizeOutcome, TimestampState};
use xsltgen_cache::BuildLayout;

fn at(time: SystemTime) -> FileTime {
    FileTime::from_system_time(time)
}

fn write_with_mtime(path: &Path, time: SystemTime) {
    std::fs::write(path, "content").unwrap();
    filetime::set_file_mtime(path, at(time)).unwrap();
}

fn build_start() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

#[test]
fn files_modified_during_the_run_are_stale_after_finalize() {
    let tmp = tempfile::tempdir().unwrap();
    let timestamp = BuildTimestamp::new(&BuildLayout::new(tmp.path().join("target")));

    let untouched = tmp.path().join("untouched.xml");
    write_with_mtime(&untouched, build_start() - Duration::from_secs(3600));

    timestamp.prepare().unwrap();
    // Pin the run start so the comparisons below do not depend on clock resolution.
    filetime::set_file_mtime(timestamp.prepared_file(), at(build_start())).unwrap();
    assert_eq!(timestamp.state().unwrap(), TimestampState::Prepared);

    let modified = tmp.path().join("modified.xml");
    write_with_mtime(&modified, build_start() + Duration::from_secs(60));

    let outcome = timestamp.finalize().unwrap();
    assert_eq!(outcome, FinalizeOutcome::CopiedFromPrepared(build_start()));
    assert_eq!(timestamp.finalized_at().unwrap(), Some(build_start()));
    assert_eq!(timestamp.state().unwrap(), TimestampState::Finalized);

    assert!(timestamp.is_stale(&modified).unwrap());
    assert!(!timestamp.is_stale(&untouched).unwrap());
}

#[test]
fn force_marks_everything_stale() {
    let tmp = tempfile::tempdir().unwrap();
    let timestamp = BuildTimestamp::new(&BuildLayout::new(tmp.path().join("target")));
    let untouched = tmp.path().join("untouched.xml");
    write_with_mtime(&untouched, build_start() - Duration::from_secs(3600));

    timestamp.prepare().unwrap();
    filetime::set_file_mtime(timestamp.prepared_file(), at(build_start())).unwrap();
    timestamp.finalize().unwrap();
    assert!(!timestamp.is_stale(&untouched).unwrap());

    let forced = timestamp.clone().with_force(true);
    assert!(forced.is_stale(&untouched).unwrap());
    assert!(forced.is_stale(&tmp.path().join("missing.xml")).unwrap());
}

#[test]
fn finalize_without_prepare_uses_the_current_time() {
    let tmp = tempfile::tempdir().unwrap();
    let timestamp = BuildTimestamp::new(&BuildLayout::new(tmp.path().join("target")));
    assert_eq!(timestamp.state().unwrap(), TimestampState::Uninitialized);

    let before = SystemTime::now() - Duration::from_secs(2);
    let outcome = timestamp.finalize().unwrap();
    assert!(matches!(outcome, FinalizeOutcome::DefaultedToNow(_)));
    assert!(outcome.time() >= before);
    assert!(timestamp.timestamp_file().is_file());
    assert!(!timestamp.prepared_file().exists());
    assert_eq!(timestamp.state().unwrap(), TimestampState::Finalized);
}

#[test]
fn without_a_finalized_run_existing_files_are_stale() {
    let tmp = tempfile::tempdir().unwrap();
    let timestamp = BuildTimestamp::new(&BuildLayout::new(tmp.path().join("target")));
    let file = tmp.path().join("a.xml");
    write_with_mtime(&file, build_start());

    assert!(timestamp.is_stale(&file).unwrap());
    assert!(!timestamp.is_stale(&tmp.path().join("missing.xml")).unwrap());
}

#[test]
fn a_new_run_returns_to_prepared() {
    let tmp = tempfile::tempdir().unwrap();
    let timestamp = BuildTimestamp::new(&BuildLayout::new(tmp.path().join("target")));

    timestamp.prepare().unwrap();
    filetime::set_file_mtime(timestamp.prepared_file(), at(build_start())).unwrap();
    timestamp.finalize().unwrap();

    timestamp.prepare().unwrap();
    filetime::set_file_mtime(
        timestamp.prepared_file(),
        at(build_start() + Duration::from_secs(600)),
    )
    .unwrap();
    assert_eq!(timestamp.state().unwrap(), TimestampState::Prepared);
}

#[test]
fn up_to_date_requires_a_strictly_newer_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src.xml");
    let dest = tmp.path().join("dest.html");

    write_with_mtime(&src, build_start());
    write_with_mtime(&dest, build_start());
    assert!(!is_up_to_date(&src, &dest).unwrap());

    filetime::set_file_mtime(&dest, at(build_start() + Duration::from_secs(1))).unwrap();
    assert!(is_up_to_date(&src, &dest).unwrap());
}

#[test]
fn generation_is_skipped_for_unchanged_or_up_to_date_sources() {
    let tmp = tempfile::tempdir().unwrap();
    let timestamp = BuildTimestamp::new(&BuildLayout::new(tmp.path().join("target")));
    timestamp.prepare().unwrap();
    filetime::set_file_mtime(timestamp.prepared_file(), at(build_start())).unwrap();
    timestamp.finalize().unwrap();

    let changed = tmp.path().join("changed.xml");
    let dest = tmp.path().join("changed.html");
    write_with_mtime(&changed, build_start() + Duration::from_secs(10));
    assert!(timestamp.needs_generation(&changed, &dest).unwrap());

    write_with_mtime(&dest, build_start() + Duration::from_secs(20));
    assert!(!timestamp.needs_generation(&changed, &dest).unwrap());

    let unchanged = tmp.path().join("unchanged.xml");
    write_with_mtime(&unchanged, build_start() - Duration::from_secs(10));
    assert!(!timestamp
        .needs_generation(&unchanged, &tmp.path().join("unchanged.html"))
        .unwrap());

    let forced = timestamp.with_force(true);
    assert!(forced.needs_generation(&changed, &dest).unwrap());
}

#[test]
fn force_is_read_from_the_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    let config = xsltgen_config::XsltGenConfig::from_toml_str(
        "project_root = \".\"\nbuild_dir = \"out\"\nforce = true\n",
        tmp.path(),
    )
    .unwrap();
    let timestamp = BuildTimestamp::from_config(&config);
    assert!(timestamp.force());
    assert_eq!(
        timestamp.timestamp_file(),
        BuildLayout::new(tmp.path().join("out")).timestamp_file()
    );

    let untouched = tmp.path().join("untouched.xml");
    write_with_mtime(&untouched, build_start() - Duration::from_secs(3600));
    timestamp.prepare().unwrap();
    filetime::set_file_mtime(timestamp.prepared_file(), at(build_start())).unwrap();
    timestamp.finalize().unwrap();

    assert!(timestamp.is_stale(&untouched).unwrap());

    let mut unforced = config.clone();
    unforced.force = false;
    assert!(!BuildTimestamp::from_config(&unforced)
        .is_stale(&untouched)
        .unwrap());
}
