pub mod u501_report_upload;
