pub mod api;
pub mod selection;
pub mod validation;
pub mod view;

pub use view::ReportUploadPage;
