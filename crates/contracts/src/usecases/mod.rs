pub mod common;
pub mod u501_report_upload;
