use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use loadreport::{
    collect_metrics, load_document, parse_fragment, FailureSink, LoadError, PathQuery, ReportDoc,
};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Keeps every failure it is handed
#[derive(Default)]
struct RecordingSink {
    failures: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingSink {
    fn failures(&self) -> Vec<(PathBuf, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl FailureSink for RecordingSink {
    fn record_failure(&self, path: &Path, error: &LoadError) {
        self.failures.lock().unwrap().push((path.to_path_buf(), error.to_string()));
    }
}

const SUMMARY: &str = r#"<report>
  <summary>
    <all-summary>
      <statistic-item type="virtualuser" avg="1,234"/>
      <statistic-item type="httppage" avg="&lt;0.01"/>
    </all-summary>
  </summary>
</report>"#;

#[test]
fn test_fixture_report_metrics() {
    let report = ReportDoc::from_path(Some(fixture("report.xml").as_path()));
    assert!(report.is_valid_report_doc().unwrap());
    assert_eq!(report.average_response_time().unwrap(), Some(2.347));
    assert_eq!(report.error_rate_percentage().unwrap(), Some(1.52));
}

#[test]
fn test_disk_and_tree_agree() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.xml");
    fs::write(&path, SUMMARY).unwrap();

    let from_disk = ReportDoc::from_path(Some(path.as_path()));
    let from_tree = ReportDoc::from_tree(parse_fragment(SUMMARY).unwrap());

    assert_eq!(from_disk.is_valid_report_doc().unwrap(), from_tree.is_valid_report_doc().unwrap());
    assert_eq!(from_disk.average_response_time().unwrap(), from_tree.average_response_time().unwrap());
    assert_eq!(from_disk.error_rate_percentage().unwrap(), from_tree.error_rate_percentage().unwrap());
    assert_eq!(from_tree.average_response_time().unwrap(), Some(1.234));
    assert_eq!(from_tree.error_rate_percentage().unwrap(), Some(0.0));
}

#[test]
fn test_extension_is_case_insensitive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("REPORT.XML");
    fs::write(&path, SUMMARY).unwrap();

    let report = ReportDoc::from_path(Some(path.as_path()));
    assert!(report.is_valid_report_doc().unwrap());
}

#[test]
fn test_non_xml_file_is_not_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.txt");
    fs::write(&path, SUMMARY).unwrap();

    let sink = RecordingSink::default();
    let report = ReportDoc::from_path_with_sink(Some(path.as_path()), &sink);
    assert!(!report.is_valid_report_doc().unwrap());
    assert_eq!(report.average_response_time().unwrap(), None);
    assert!(sink.failures().is_empty());
}

#[test]
fn test_malformed_file_records_one_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.xml");
    fs::write(&path, "<report><summary></report>").unwrap();

    let sink = RecordingSink::default();
    let report = ReportDoc::from_path_with_sink(Some(path.as_path()), &sink);

    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, path);
    assert!(failures[0].1.contains("Tag mismatch"));
    assert!(report.document().is_none());
    assert!(!report.is_valid_report_doc().unwrap());
    assert_eq!(report.error_rate_percentage().unwrap(), None);
}

#[test]
fn test_missing_file_records_io_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.xml");

    let sink = RecordingSink::default();
    let report = ReportDoc::from_path_with_sink(Some(path.as_path()), &sink);
    assert_eq!(sink.failures().len(), 1);
    assert!(matches!(load_document(&path), Err(LoadError::Io { .. })));
    assert!(report.document().is_none());
}

#[test]
fn test_utf16_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("utf16.xml");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(SUMMARY.encode_utf16().flat_map(u16::to_le_bytes));
    fs::write(&path, bytes).unwrap();

    let report = ReportDoc::from_path(Some(path.as_path()));
    assert_eq!(report.average_response_time().unwrap(), Some(1.234));
}

#[test]
fn test_collect_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.xml");
    let broken = temp_dir.path().join("broken.xml");
    fs::write(&good, SUMMARY).unwrap();
    fs::write(&broken, "not xml at all").unwrap();
    let paths = vec![fixture("report.xml"), good.clone(), broken.clone(), temp_dir.path().join("notes.md")];

    let metrics = collect_metrics(&paths[..]);
    assert_eq!(metrics.len(), 4);
    assert_eq!(metrics[0].average_response_time, Some(2.347));
    assert_eq!(metrics[1].path, good);
    assert!(metrics[1].valid);
    assert_eq!(metrics[1].error_rate_percentage, Some(0.0));
    assert_eq!(metrics[2].path, broken);
    assert!(!metrics[2].valid);
    assert!(!metrics[3].valid);
}

#[test]
fn test_bookstore_queries() {
    let doc = load_document(fixture("books.xml")).unwrap();
    let root = doc.document_node();

    assert_eq!(doc.find_all("/bookstore/book/title", root).unwrap().len(), 4);
    assert_eq!(
        doc.find_first_value("/bookstore/book[1]/title", root).unwrap().as_deref(),
        Some("Everyday Italian")
    );
    assert_eq!(
        doc.find_first_value("/bookstore/book/title/@lang", root).unwrap().as_deref(),
        Some("en")
    );
    assert_eq!(doc.find_all("/bookstore/book[3]/author", root).unwrap().len(), 2);

    let title = doc.find_first("/bookstore/book/title", root).unwrap().unwrap();
    assert!(doc
        .node_to_string(title.node_id())
        .ends_with(r#"<title lang="en">Everyday Italian</title>"#));

    let book = doc.find_first("/bookstore/book", root).unwrap().unwrap();
    let attrs = doc.attribute_map(book.node_id());
    assert_eq!(attrs.get("category"), Some(&"cooking"));
}

#[test]
fn test_placeholder_queries_are_empty() {
    let empty = parse_fragment("<empty></empty>").unwrap();
    let root = empty.document_node();
    assert_eq!(empty.find_first_value("/bookstore/book/title", root).unwrap(), None);
    assert!(empty.find_all("/report/summary/all-summary/statistic-item", root).unwrap().is_empty());
}
