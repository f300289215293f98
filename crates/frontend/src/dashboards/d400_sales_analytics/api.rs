use super::error::{
    DashboardError, MSG_CLEAR_FAILED, MSG_EXPORT_FAILED, MSG_FETCH_FAILED, MSG_UPLOAD_FAILED,
};
use super::workflow::AnalyticsBackend;
use crate::shared::api_utils::api_url;
use crate::shared::config::{config, Config, UploadMode};
use crate::shared::export::PDF_MIME;
use async_trait::async_trait;
use contracts::dashboards::d400_sales_analytics::{ApiMessage, DashboardDataset};
use gloo_net::http::{Request, Response};
use web_sys::{FormData, RequestCredentials};

const UPLOAD_PATH: &str = "/api/upload/";
const ANALYZE_SESSION_PATH: &str = "/api/analyze-session/";
const SALES_DATA_PATH: &str = "/api/sales-data/";
const CLEAR_PATH: &str = "/api/clear-data/";
const EXPORT_PATH: &str = "/api/generate-report-pdf/";

/// Поле multipart-формы, повторяется для каждого файла
const FILE_FIELD: &str = "file";

/// HTTP-клиент сервиса аналитики. Все запросы идут с cookie сессии.
#[derive(Clone)]
pub struct HttpAnalyticsClient {
    config: &'static Config,
}

impl HttpAnalyticsClient {
    pub fn new() -> Self {
        Self { config: config() }
    }

    async fn fetch_dataset(&self) -> Result<DashboardDataset, DashboardError> {
        let response = Request::get(&api_url(SALES_DATA_PATH))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| DashboardError::Fetch(format!("Request failed: {}", e)))?;

        let body = read_body(&response)
            .await
            .map_err(DashboardError::Fetch)?;
        if !response.ok() {
            log::error!("GET {} -> HTTP {}", SALES_DATA_PATH, response.status());
            return Err(DashboardError::Fetch(error_text(&body, MSG_FETCH_FAILED)));
        }
        dataset_from_body(&body).map_err(DashboardError::Fetch)
    }

    async fn post_files(
        &self,
        path: &str,
        files: &[web_sys::File],
    ) -> Result<String, DashboardError> {
        let form = files_form(files).map_err(DashboardError::Upload)?;
        let response = Request::post(&api_url(path))
            .credentials(RequestCredentials::Include)
            .body(form)
            .map_err(|e| DashboardError::Upload(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| DashboardError::Upload(format!("Request failed: {}", e)))?;

        let body = read_body(&response)
            .await
            .map_err(DashboardError::Upload)?;
        if !response.ok() {
            log::error!("POST {} -> HTTP {}", path, response.status());
            return Err(DashboardError::Upload(error_text(&body, MSG_UPLOAD_FAILED)));
        }
        Ok(body)
    }
}

impl Default for HttpAnalyticsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl AnalyticsBackend for HttpAnalyticsClient {
    type File = web_sys::File;

    async fn upload(&self, files: &[web_sys::File]) -> Result<DashboardDataset, DashboardError> {
        match self.config.api.upload_mode {
            UploadMode::Session => {
                let body = self.post_files(ANALYZE_SESSION_PATH, files).await?;
                dataset_from_body(&body).map_err(DashboardError::Upload)
            }
            UploadMode::Persist => {
                self.post_files(UPLOAD_PATH, files).await?;
                // Сервис пересчитывает агрегаты с нуля, забираем свежий снимок
                self.fetch_dataset().await
            }
        }
    }

    async fn fetch(&self) -> Result<DashboardDataset, DashboardError> {
        self.fetch_dataset().await
    }

    async fn clear(&self) -> Result<(), DashboardError> {
        let response = Request::get(&api_url(CLEAR_PATH))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| DashboardError::Clear(format!("Request failed: {}", e)))?;

        if !response.ok() {
            let body = read_body(&response).await.unwrap_or_default();
            log::error!("GET {} -> HTTP {}", CLEAR_PATH, response.status());
            return Err(DashboardError::Clear(error_text(&body, MSG_CLEAR_FAILED)));
        }
        Ok(())
    }

    async fn export_report(&self, dataset: &DashboardDataset) -> Result<Vec<u8>, DashboardError> {
        let response = Request::post(&api_url(EXPORT_PATH))
            .credentials(RequestCredentials::Include)
            .json(dataset)
            .map_err(|e| DashboardError::Export(format!("Failed to serialize dataset: {}", e)))?
            .send()
            .await
            .map_err(|e| DashboardError::Export(format!("Request failed: {}", e)))?;

        let content_type = response.headers().get("content-type").unwrap_or_default();
        if !response.ok() || !is_pdf(&content_type) {
            let body = read_body(&response).await.unwrap_or_default();
            log::error!(
                "POST {} -> HTTP {} ({})",
                EXPORT_PATH,
                response.status(),
                content_type
            );
            return Err(DashboardError::Export(error_text(&body, MSG_EXPORT_FAILED)));
        }

        response
            .binary()
            .await
            .map_err(|e| DashboardError::Export(format!("Failed to read report: {}", e)))
    }
}

fn files_form(files: &[web_sys::File]) -> Result<FormData, String> {
    let form = FormData::new().map_err(|e| format!("{e:?}"))?;
    for file in files {
        form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())
            .map_err(|e| format!("{e:?}"))?;
    }
    Ok(form)
}

async fn read_body(response: &Response) -> Result<String, String> {
    response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))
}

fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map_or(false, |mime| mime.trim().eq_ignore_ascii_case(PDF_MIME))
}

/// Текст ошибки сервиса (`{error}` или `{message}`), иначе общий текст
pub(crate) fn error_text(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ApiMessage>(body)
        .ok()
        .and_then(|m| m.text().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

/// Датасет из тела ответа. `{error}` с успешным статусом тоже считается ошибкой,
/// пустое тело: пустым датасетом.
pub(crate) fn dataset_from_body(body: &str) -> Result<DashboardDataset, String> {
    if body.trim().is_empty() {
        return Ok(DashboardDataset::empty());
    }
    if let Some(err) = serde_json::from_str::<ApiMessage>(body)
        .ok()
        .and_then(|m| m.error)
    {
        return Err(err);
    }
    // Разбор прямо из текста: порядок ключей разрезов сохраняется
    serde_json::from_str(body).map_err(|e| format!("Failed to parse response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_prefers_server_message() {
        assert_eq!(
            error_text(r#"{"error": "Invalid file format"}"#, MSG_UPLOAD_FAILED),
            "Invalid file format"
        );
        assert_eq!(
            error_text(r#"{"message": "No data"}"#, MSG_FETCH_FAILED),
            "No data"
        );
        assert_eq!(error_text("<html>502</html>", MSG_CLEAR_FAILED), MSG_CLEAR_FAILED);
        assert_eq!(error_text("", MSG_EXPORT_FAILED), MSG_EXPORT_FAILED);
    }

    #[test]
    fn test_dataset_from_body() {
        let ds = dataset_from_body(r#"{"totalRecords": 5, "prescriberAnalysis": null}"#).unwrap();
        assert_eq!(ds.total_records, 5);
        assert!(ds.prescriber_analysis.is_none());

        assert_eq!(dataset_from_body("").unwrap(), DashboardDataset::empty());
        assert_eq!(
            dataset_from_body(r#"{"error": "No files were uploaded."}"#).unwrap_err(),
            "No files were uploaded."
        );
        assert!(dataset_from_body("not json").is_err());
    }

    #[test]
    fn test_dataset_from_body_keeps_server_key_order() {
        let body = r#"{
            "totalRecords": 2,
            "topMedicinesByArea": {
                "West": {"labels": ["A"], "data": [3]},
                "East": {"labels": ["B"], "data": [1]}
            },
            "salesTrendsByArea": {
                "Weekly": {"labels": ["w1"], "data": [1]},
                "Monthly": {"labels": ["m1"], "data": [2]},
                "Yearly": {"labels": ["y1"], "data": [3]}
            }
        }"#;
        let ds = dataset_from_body(body).unwrap();
        assert_eq!(ds.area_keys(), vec!["West", "East"]);
        let trends: Vec<&str> = ds
            .sales_trends_by_area
            .as_ref()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(trends, vec!["Weekly", "Monthly", "Yearly"]);
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf("application/pdf"));
        assert!(is_pdf("Application/PDF; charset=binary"));
        assert!(!is_pdf("application/json"));
        assert!(!is_pdf(""));
    }
}
