use digiarchive_core::FailureKind;
use digiarchive_ops::{
    ArchiveError, FileOrganizer, MetadataField, OrganizeConfig, backup_directory, organize,
    rename_with_id,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_organize_by_type_groups_pdfs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("x.pdf"), "x").unwrap();
    fs::write(root.join("y.pdf"), "y").unwrap();

    let report = organize(root, "type").unwrap();

    assert_eq!(report.field, MetadataField::Extension);
    assert_eq!(report.moved.len(), 2);
    assert!(report.failures.is_empty());
    assert_eq!(names_in(root), vec!["pdf"]);
    assert_eq!(names_in(&root.join("pdf")), vec!["x.pdf", "y.pdf"]);
}

#[test]
fn test_organize_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("inbox")).unwrap();
    fs::write(root.join("a.jpg"), "a").unwrap();
    fs::write(root.join("inbox/b.txt"), "b").unwrap();
    fs::write(root.join("Makefile"), "all:").unwrap();

    let first = organize(root, "extension").unwrap();
    assert_eq!(first.moved.len(), 3);

    let second = organize(root, "extension").unwrap();
    assert!(second.moved.is_empty());
    assert_eq!(second.unchanged, 3);

    assert!(root.join("jpg/a.jpg").exists());
    assert!(root.join("txt/b.txt").exists());
    assert!(root.join("unknown/Makefile").exists());
}

#[test]
fn test_organize_file_named_like_bucket() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.txt"), "text").unwrap();
    fs::write(root.join("txt"), "plain").unwrap();

    let first = organize(root, "extension").unwrap();
    assert!(first.failures.is_empty());
    assert_eq!(first.moved.len(), 2);
    assert_eq!(fs::read_to_string(root.join("txt/a.txt")).unwrap(), "text");
    assert_eq!(fs::read_to_string(root.join("unknown/txt")).unwrap(), "plain");
    assert_eq!(first.moved[1].from, root.join("txt"));

    let second = organize(root, "extension").unwrap();
    assert!(second.moved.is_empty());
    assert!(second.failures.is_empty());
    assert_eq!(second.unchanged, 2);
}

#[test]
fn test_organize_file_blocking_its_own_bucket() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("unknown"), "no extension").unwrap();

    let first = organize(root, "type").unwrap();
    assert!(first.failures.is_empty());
    assert_eq!(first.moved[0].to, root.join("unknown/unknown"));
    assert_eq!(names_in(root), vec!["unknown"]);

    let second = organize(root, "type").unwrap();
    assert!(second.moved.is_empty());
}

#[test]
fn test_organize_failure_does_not_stop_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    // An ignored file occupies the pdf bucket path, so that move must fail.
    fs::write(root.join("pdf"), "blocker").unwrap();
    fs::write(root.join("a.pdf"), "a").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();
    fs::write(root.join("c.jpg"), "c").unwrap();

    let config = OrganizeConfig::builder()
        .ignore_patterns(vec!["pdf".to_string()])
        .build()
        .unwrap();
    let organizer = FileOrganizer::with_config(config);
    let report = organizer.organize(root, "type").unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, root.join("a.pdf"));
    assert_eq!(report.failures[0].kind, FailureKind::WriteError);
    assert_eq!(report.moved.len(), 2);
    assert!(root.join("a.pdf").exists());
    assert!(root.join("txt/b.txt").exists());
    assert!(root.join("jpg/c.jpg").exists());
    assert!(report.summary().ends_with("1 failed"));

    let again = organizer.organize(root, "type").unwrap();
    assert!(again.moved.is_empty());
}

#[test]
fn test_organize_extensionless_goes_to_unknown() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("README"), "hi").unwrap();

    let report = organize(root, "type").unwrap();
    assert_eq!(report.moved[0].to, root.join("unknown/README"));
}

#[test]
fn test_organize_collision_is_renamed() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a/notes.txt"), "first").unwrap();
    fs::write(root.join("b/notes.txt"), "second").unwrap();

    let report = organize(root, "type").unwrap();

    assert_eq!(report.moved.len(), 2);
    assert_eq!(fs::read_to_string(root.join("txt/notes.txt")).unwrap(), "first");
    assert_eq!(fs::read_to_string(root.join("txt/notes_1.txt")).unwrap(), "second");
}

#[test]
fn test_organize_invalid_field_moves_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.pdf"), "a").unwrap();

    let result = organize(root, "colour");
    assert!(matches!(result, Err(ArchiveError::InvalidArgument { .. })));
    assert_eq!(names_in(root), vec!["a.pdf"]);
}

#[test]
fn test_organize_missing_directory() {
    let temp = TempDir::new().unwrap();
    let result = organize(temp.path().join("missing"), "type");
    assert!(matches!(result, Err(ArchiveError::NotFound { .. })));
}

#[test]
fn test_organize_by_folder_sanitizes_value() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("2023 taxes")).unwrap();
    fs::write(root.join("2023 taxes/w2.pdf"), "w2").unwrap();

    let report = FileOrganizer::new()
        .organize_by(root, MetadataField::Folder)
        .unwrap();
    assert_eq!(report.unchanged, 0);
    assert_eq!(report.moved[0].to, root.join("2023_taxes/w2.pdf"));
    assert!(!root.join("2023 taxes/w2.pdf").exists());
}

#[test]
fn test_organize_by_created_month() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("scan.png"), "png").unwrap();

    let report = organize(root, "created").unwrap();
    let dest = &report.moved[0].to;
    let bucket = dest.parent().unwrap().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(bucket.len(), 7);
    assert_eq!(&bucket[4..5], "-");
}

#[test]
fn test_organize_respects_hidden_setting() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join(".env"), "SECRET=1").unwrap();
    fs::write(root.join("doc.pdf"), "d").unwrap();

    let config = OrganizeConfig::builder()
        .include_hidden(false)
        .build()
        .unwrap();
    let report = FileOrganizer::with_config(config)
        .organize(root, "type")
        .unwrap();

    assert_eq!(report.moved.len(), 1);
    assert!(root.join(".env").exists());
}

#[test]
fn test_backup_then_organize_leaves_backup_intact() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("archive");
    let backup = temp.path().join("backup");
    fs::create_dir(&archive).unwrap();
    fs::write(archive.join("a.pdf"), "a").unwrap();

    backup_directory(&archive, &backup).unwrap();
    organize(&archive, "type").unwrap();

    assert!(backup.join("a.pdf").exists());
    assert!(archive.join("pdf/a.pdf").exists());
}

#[test]
fn test_rename_with_generated_id() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("photo.jpg");
    fs::write(&path, "jpg").unwrap();

    let id = digiarchive_core::generate_unique_id("IMG");
    let renamed = rename_with_id(&path, &id).unwrap();

    let name = renamed.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("photo_IMG-"));
    assert!(name.ends_with(".jpg"));
}
