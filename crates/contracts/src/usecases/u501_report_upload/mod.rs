pub mod dto;

pub use dto::*;

use crate::usecases::common::UseCaseMetadata;

pub struct ReportUpload;

impl UseCaseMetadata for ReportUpload {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "report_upload"
    }

    fn display_name() -> &'static str {
        "Upload Reports"
    }

    fn description() -> &'static str {
        "Upload your reports in PDF, Word, Excel, or text format. Maximum file size: 10MB per file."
    }
}
