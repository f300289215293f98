use thiserror::Error;

/// Ошибки рабочих процессов дашборда.
///
/// Каждый вариант несёт текст для пользователя: сообщение сервера `{error}`,
/// если оно было, иначе описание транспортной ошибки или общий текст.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Ошибка до сетевого вызова (например, не выбраны файлы)
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Upload(String),
    #[error("{0}")]
    Fetch(String),
    #[error("{0}")]
    Clear(String),
    #[error("{0}")]
    Export(String),
    /// Представление закрыто до завершения запроса; пользователю не показывается
    #[error("request cancelled")]
    Cancelled,
}

impl DashboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Validation(_) => "validation",
            DashboardError::Upload(_) => "upload",
            DashboardError::Fetch(_) => "fetch",
            DashboardError::Clear(_) => "clear",
            DashboardError::Export(_) => "export",
            DashboardError::Cancelled => "cancelled",
        }
    }
}

pub const MSG_NO_FILES: &str = "Please select files to upload";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed.";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch dashboard data. Please upload a report first.";
pub const MSG_CLEAR_FAILED: &str = "Failed to clear session data.";
pub const MSG_EXPORT_FAILED: &str = "Failed to generate PDF report.";
pub const MSG_NO_DATA_TO_EXPORT: &str = "No data to export";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_user_text() {
        let err = DashboardError::Upload("No files were uploaded.".into());
        assert_eq!(err.to_string(), "No files were uploaded.");
        assert_eq!(err.kind(), "upload");
    }
}
