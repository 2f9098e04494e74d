use ark_cli::app::commands::list::{run_list, ListOptions};
use ark_cli::domain::model::{EntryOutput, SortOrder, StorageKind, ValueFormat};
use ark_cli::{ResourceId, Storage};
use chrono::{TimeZone, Utc};
use std::fs;
use std::time::SystemTime;
use tempfile::TempDir;

fn options(entry: EntryOutput) -> ListOptions {
    ListOptions {
        entry,
        modified: false,
        tags: false,
        scores: false,
        sort: None,
        filter: None,
    }
}

#[test]
fn test_list_shows_paths_and_ids() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("doc.txt"), "document body").unwrap();
    let id = ResourceId::compute_bytes(b"document body");

    let out = run_list(root, &options(EntryOutput::Both)).unwrap();
    assert!(out.contains("doc.txt"));
    assert!(out.contains(&id.to_string()));

    let ids_only = run_list(root, &options(EntryOutput::Id)).unwrap();
    assert!(ids_only.contains(&id.to_string()));
    assert!(!ids_only.contains("doc.txt"));
}

#[test]
fn test_list_link_output_prints_file_contents() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("note.md"), "plain note text").unwrap();

    let out = run_list(root, &options(EntryOutput::Link)).unwrap();
    assert!(out.contains("plain note text"));
}

#[test]
fn test_list_tags_scores_and_filter() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    fs::write(root.join("b.txt"), "beta").unwrap();
    let a_id = ResourceId::compute_bytes(b"alpha");

    let mut tags = Storage::open(root.join(".ark/tags"), StorageKind::File).unwrap();
    tags.append(a_id, "red", ValueFormat::Raw).unwrap();
    let mut scores = Storage::open(root.join(".ark/scores"), StorageKind::File).unwrap();
    scores.insert(a_id, "7", ValueFormat::Raw).unwrap();

    let mut opts = options(EntryOutput::Id);
    opts.tags = true;
    opts.scores = true;

    let out = run_list(root, &opts).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("red"));
    assert!(out.contains("NO_TAGS"));
    assert!(out.contains('7'));
    assert!(out.contains("NO_SCORE"));

    // the filter keeps only rows tagged with the exact value
    opts.filter = Some("red".to_string());
    let filtered = run_list(root, &opts).unwrap();
    assert_eq!(filtered.lines().count(), 1);
    assert!(filtered.contains(&a_id.to_string()));
}

#[test]
fn test_list_sorts_by_modified_datetime() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("old.txt"), "old contents").unwrap();
    fs::write(root.join("new.txt"), "new contents").unwrap();

    // same month so the formatted datetime sorts chronologically
    set_mtime(
        &root.join("old.txt"),
        Utc.with_ymd_and_hms(2020, 9, 1, 10, 0, 0).unwrap().into(),
    );
    set_mtime(
        &root.join("new.txt"),
        Utc.with_ymd_and_hms(2020, 9, 2, 10, 0, 0).unwrap().into(),
    );

    let mut opts = options(EntryOutput::Path);
    opts.modified = true;

    opts.sort = Some(SortOrder::Asc);
    let asc = run_list(root, &opts).unwrap();
    assert!(asc.find("old.txt").unwrap() < asc.find("new.txt").unwrap());

    opts.sort = Some(SortOrder::Desc);
    let desc = run_list(root, &opts).unwrap();
    assert!(desc.find("new.txt").unwrap() < desc.find("old.txt").unwrap());
}

fn set_mtime(path: &std::path::Path, time: SystemTime) {
    let file = fs::File::options().append(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}
