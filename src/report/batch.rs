//! Batch metric collection
//!
//! Reads many report files at once. With the `parallel` feature each file is
//! loaded and queried on the rayon pool; results keep the input order.

use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::ReportDoc;
use crate::error::QueryError;

/// Validity and metrics of one report file
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetrics {
    pub path: PathBuf,
    pub valid: bool,
    pub average_response_time: Option<f32>,
    pub error_rate_percentage: Option<f32>,
}

impl ReportMetrics {
    /// Load one report and read everything the accessor exposes
    pub fn collect(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let report = ReportDoc::from_path(Some(path));

        let read = || -> Result<Self, QueryError> {
            Ok(ReportMetrics {
                path: path.to_path_buf(),
                valid: report.is_valid_report_doc()?,
                average_response_time: report.average_response_time()?,
                error_rate_percentage: report.error_rate_percentage()?,
            })
        };

        read().unwrap_or_else(|error| {
            tracing::warn!(path = %path.display(), error = %error, "Summary query failed");
            ReportMetrics {
                path: path.to_path_buf(),
                valid: false,
                average_response_time: None,
                error_rate_percentage: None,
            }
        })
    }
}

/// Collect metrics for every path, in input order
#[cfg(feature = "parallel")]
pub fn collect_metrics<P: AsRef<Path> + Sync>(paths: &[P]) -> Vec<ReportMetrics> {
    paths.par_iter().map(ReportMetrics::collect).collect()
}

/// Collect metrics for every path, in input order
#[cfg(not(feature = "parallel"))]
pub fn collect_metrics<P: AsRef<Path>>(paths: &[P]) -> Vec<ReportMetrics> {
    paths.iter().map(ReportMetrics::collect).collect()
}
