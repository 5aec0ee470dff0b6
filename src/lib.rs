//! loadreport - Summary metrics from load-test XML reports
//!
//! Layers:
//! core: byte scanner, tokenizer, entities, encoding detection
//! dom: arena document built from the tokenizer
//! query: path queries over a document (PathQuery)
//! report: ReportDoc accessor, metric normalization, batch collection
//!
//! ```no_run
//! use std::path::Path;
//! use loadreport::ReportDoc;
//!
//! let report = ReportDoc::from_path(Some(Path::new("results/report.xml")));
//! if report.is_valid_report_doc()? {
//!     println!("avg response time: {:?}", report.average_response_time()?);
//!     println!("error rate: {:?}", report.error_rate_percentage()?);
//! }
//! # Ok::<(), loadreport::QueryError>(())
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod query;
pub mod report;

pub use dom::{Document, NodeId, NodeKind};
pub use error::{LoadError, ParseError, QueryError};
pub use query::{load_document, parse_fragment, NodeRef, PathQuery};
pub use report::{
    collect_metrics, is_xml_path, normalize_metric, FailureSink, ReportDoc, ReportMetrics,
    TracingSink,
};
