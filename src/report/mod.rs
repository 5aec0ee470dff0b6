//! Report Accessor
//!
//! Wraps one report tree and reads its summary metrics. Construction never
//! fails: files that are not XML get an empty placeholder tree, and files that
//! cannot be loaded are recorded through a [`FailureSink`] and leave the
//! accessor without a tree. Either way every getter then answers
//! `false` / `None`.

pub mod batch;
pub mod normalize;
pub mod sink;

use std::path::Path;

use crate::dom::Document;
use crate::error::QueryError;
use crate::query::{load_document, parse_fragment, PathQuery};
pub use batch::{collect_metrics, ReportMetrics};
pub use normalize::normalize_metric;
pub use sink::{FailureSink, TracingSink};

/// Summary entries, one per measured item type
pub const STATISTIC_ITEMS: &str = "/report/summary/all-summary/statistic-item";

/// `type` of the item carrying the average response time
pub const AVERAGE_RESPONSE_TIME_TYPE: &str = "virtualuser";

/// `type` of the item carrying the error rate percentage
pub const ERROR_RATE_TYPE: &str = "httppage";

/// Tree used in place of a file that is not an XML report
const PLACEHOLDER: &str = "<empty></empty>";

/// Whether a path names an XML file, by case-insensitive extension
pub fn is_xml_path(path: Option<&Path>) -> bool {
    path.and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Accessor over a single load-test report
#[derive(Debug, Clone)]
pub struct ReportDoc<T: PathQuery = Document> {
    document: Option<T>,
}

impl ReportDoc<Document> {
    /// Load a report, logging load failures through `tracing`
    pub fn from_path(path: Option<&Path>) -> Self {
        Self::from_path_with_sink(path, &TracingSink)
    }

    /// Load a report, recording load failures in `sink`
    pub fn from_path_with_sink(path: Option<&Path>, sink: &dyn FailureSink) -> Self {
        let path = match path {
            Some(path) if is_xml_path(Some(path)) => path,
            _ => {
                tracing::debug!(path = ?path, "Not an XML report, using placeholder document");
                return ReportDoc {
                    document: Some(parse_fragment(PLACEHOLDER).unwrap_or_default()),
                };
            }
        };

        match load_document(path) {
            Ok(document) => ReportDoc { document: Some(document) },
            Err(error) => {
                sink.record_failure(path, &error);
                ReportDoc { document: None }
            }
        }
    }
}

impl<T: PathQuery> ReportDoc<T> {
    /// Wrap an already-parsed tree
    pub fn from_tree(tree: T) -> Self {
        ReportDoc { document: Some(tree) }
    }

    /// The wrapped tree; `None` after a failed load
    pub fn document(&self) -> Option<&T> {
        self.document.as_ref()
    }

    /// True when the summary section holds at least one statistic item
    pub fn is_valid_report_doc(&self) -> Result<bool, QueryError> {
        let Some(doc) = &self.document else {
            return Ok(false);
        };
        Ok(doc.find_first(STATISTIC_ITEMS, doc.document_node())?.is_some())
    }

    /// Average response time, from the `virtualuser` item
    pub fn average_response_time(&self) -> Result<Option<f32>, QueryError> {
        self.metric(AVERAGE_RESPONSE_TIME_TYPE)
    }

    /// Error rate percentage, from the `httppage` item
    pub fn error_rate_percentage(&self) -> Result<Option<f32>, QueryError> {
        self.metric(ERROR_RATE_TYPE)
    }

    /// Normalized `avg` of the last statistic item whose `type` matches
    ///
    /// The last match decides even when its `avg` is not numeric: an earlier
    /// item's number does not carry over, and the result is `None`.
    fn metric(&self, item_type: &str) -> Result<Option<f32>, QueryError> {
        let Some(doc) = &self.document else {
            return Ok(None);
        };

        let mut value = None;
        for item in doc.find_all(STATISTIC_ITEMS, doc.document_node())? {
            let matches = doc
                .find_first_value("@type", item)?
                .is_some_and(|t| t.eq_ignore_ascii_case(item_type));
            if matches {
                value = doc.find_first_value("@avg", item)?.as_deref().and_then(normalize_metric);
            }
        }
        Ok(value)
    }
}
