use digiarchive_analyze::{
    ArchiveError, DuplicateConfig, DuplicateDetector, HashAlgorithm, ReportConfig,
    ReportGenerator, find_duplicates,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_duplicate_config_builder() {
    let config = DuplicateConfig::builder()
        .algorithm(HashAlgorithm::Md5)
        .include_hidden(false)
        .min_size(16u64)
        .size_prefilter(false)
        .build()
        .unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Md5);
    assert!(!config.include_hidden);
    assert_eq!(config.min_size, 16);
    assert!(!config.size_prefilter);

    let default_config = DuplicateConfig::default();
    assert_eq!(default_config.algorithm, HashAlgorithm::Sha256);
    assert!(default_config.size_prefilter);
}

#[test]
fn test_identical_pair_reported_in_traversal_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "hello").unwrap();

    let report = find_duplicates(root, false).unwrap();

    assert_eq!(
        report.as_tuples(),
        vec![(root.join("a.txt"), root.join("b.txt"))]
    );
    assert!(!report.pairs[0].removed);
    assert_eq!(report.wasted_bytes, 5);
    assert!(root.join("b.txt").exists());
}

#[test]
fn test_distinct_content_has_no_pairs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "world").unwrap();

    let report = find_duplicates(root, false).unwrap();

    assert!(report.pairs.is_empty());
    assert!(!report.has_duplicates());
    assert_eq!(report.files_scanned, 2);
    // Same size, so both were hashed.
    assert_eq!(report.files_hashed, 2);
}

#[test]
fn test_two_identical_one_distinct() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("one.txt"), "same bytes").unwrap();
    fs::write(root.join("two.txt"), "same bytes").unwrap();
    fs::write(root.join("three.txt"), "different!").unwrap();

    let report = find_duplicates(root, false).unwrap();
    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].count(), 2);
}

#[test]
fn test_empty_directory() {
    let temp = TempDir::new().unwrap();
    let report = find_duplicates(temp.path(), true).unwrap();
    assert!(report.pairs.is_empty());
    assert_eq!(report.files_scanned, 0);
}

#[test]
fn test_nested_duplicates_first_in_traversal_is_original() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("a_dir/inner")).unwrap();
    fs::create_dir(root.join("z_dir")).unwrap();

    fs::write(root.join("z_dir/copy.bin"), "payload").unwrap();
    fs::write(root.join("a_dir/inner/orig.bin"), "payload").unwrap();
    fs::write(root.join("m.bin"), "payload").unwrap();

    let report = find_duplicates(root, false).unwrap();

    let original = root.join("a_dir/inner/orig.bin");
    assert_eq!(
        report.as_tuples(),
        vec![
            (original.clone(), root.join("m.bin")),
            (original, root.join("z_dir/copy.bin")),
        ]
    );
}

#[test]
fn test_remove_leaves_one_copy_per_set() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("sub")).unwrap();

    fs::write(root.join("a1.txt"), "alpha").unwrap();
    fs::write(root.join("a2.txt"), "alpha").unwrap();
    fs::write(root.join("sub/a3.txt"), "alpha").unwrap();
    fs::write(root.join("b1.txt"), "bravo-bravo").unwrap();
    fs::write(root.join("b2.txt"), "bravo-bravo").unwrap();
    fs::write(root.join("unique.txt"), "solo").unwrap();

    let report = DuplicateDetector::new().find_duplicates(root, true).unwrap();

    assert_eq!(report.pairs.len(), 3);
    assert_eq!(report.removed_count(), 3);
    assert!(report.failures.is_empty());

    assert!(root.join("a1.txt").exists());
    assert!(!root.join("a2.txt").exists());
    assert!(!root.join("sub/a3.txt").exists());
    assert!(root.join("b1.txt").exists());
    assert!(!root.join("b2.txt").exists());
    assert!(root.join("unique.txt").exists());

    // A second pass finds nothing left to remove.
    let again = find_duplicates(root, true).unwrap();
    assert!(again.pairs.is_empty());
}

#[test]
fn test_hidden_files_excluded_when_configured() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join(".cache"), "dup").unwrap();
    fs::write(root.join("visible.txt"), "dup").unwrap();

    let all = find_duplicates(root, false).unwrap();
    assert_eq!(all.pairs.len(), 1);

    let config = DuplicateConfig::builder()
        .include_hidden(false)
        .build()
        .unwrap();
    let visible_only = DuplicateDetector::with_config(config)
        .find_duplicates(root, false)
        .unwrap();
    assert!(visible_only.pairs.is_empty());
}

#[test]
fn test_algorithm_choice_does_not_change_pairs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("x.dat"), "content").unwrap();
    fs::write(root.join("y.dat"), "content").unwrap();

    for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256] {
        let config = DuplicateConfig::builder()
            .algorithm(algorithm)
            .size_prefilter(false)
            .build()
            .unwrap();
        let report = DuplicateDetector::with_config(config)
            .find_duplicates(root, false)
            .unwrap();
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.groups[0].digest.len(), algorithm.hex_len());
    }
}

#[test]
fn test_missing_root_is_fatal() {
    let temp = TempDir::new().unwrap();
    let result = find_duplicates(temp.path().join("nope"), false);
    assert!(matches!(result, Err(ArchiveError::NotFound { .. })));
}

#[test]
fn test_report_counts_and_top_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("docs")).unwrap();

    let sizes = [("a.pdf", 10), ("b.pdf", 60), ("c.txt", 30), ("docs/d.txt", 50), ("e", 20), ("f.jpg", 40), ("g.jpg", 40)];
    for (name, size) in sizes {
        fs::write(root.join(name), vec![b'x'; size]).unwrap();
    }

    let report = ReportGenerator::new().generate(root).unwrap();

    assert_eq!(report.total_files, 7);
    assert_eq!(report.total_size, 250);
    assert_eq!(report.by_type[".pdf"], 2);
    assert_eq!(report.by_type[".txt"], 2);
    assert_eq!(report.by_type[".jpg"], 2);
    assert_eq!(report.by_type["unknown"], 1);
    assert_eq!(report.by_month.values().sum::<u64>(), 7);

    let top: Vec<PathBuf> = report.largest.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        top,
        vec![
            root.join("b.pdf"),
            root.join("docs/d.txt"),
            root.join("f.jpg"),
            root.join("g.jpg"),
            root.join("c.txt"),
        ]
    );
}

#[test]
fn test_write_report_file() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("archive");
    fs::create_dir(&archive).unwrap();
    fs::write(archive.join("one.txt"), "1").unwrap();
    fs::write(archive.join("two.txt"), "22").unwrap();

    let output = temp.path().join("report.txt");
    let config = ReportConfig::builder().top_n(1usize).build().unwrap();
    let report = ReportGenerator::with_config(config)
        .write_report(&archive, &output)
        .unwrap();

    assert_eq!(report.largest.len(), 1);
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Total Files: 2"));
    assert!(text.contains("Files by Type:\n  .txt: 2"));
    assert!(text.contains("Top 1 Largest Files:"));
    assert!(text.contains("two.txt"));
}
