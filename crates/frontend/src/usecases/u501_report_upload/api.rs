use crate::dashboards::d400_sales_analytics::api::error_text;
use crate::shared::api_utils::api_url;
use chrono::Utc;
use contracts::usecases::u501_report_upload::{
    ReportData, ReportDataQuery, ReportListItem, ReportListResponse, ReportUploadResponse,
};
use gloo_net::http::{Request, Response};
use web_sys::{FormData, RequestCredentials};

const REPORTS_PATH: &str = "/api/reports/";
const REPORTS_UPLOAD_PATH: &str = "/api/reports/upload/";
const REPORT_DATA_PATH: &str = "/api/report_data/";

/// Поле multipart-формы для каждого файла отчёта
const REPORTS_FIELD: &str = "reports";
const UPLOADED_AT_FIELD: &str = "uploadedAt";

async fn failure(response: &Response) -> String {
    let body = response.text().await.unwrap_or_default();
    error_text(&body, &format!("HTTP error: {}", response.status()))
}

/// Список загруженных файлов
pub async fn list_reports() -> Result<Vec<ReportListItem>, String> {
    let response = Request::get(&api_url(REPORTS_PATH))
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(failure(&response).await);
    }

    let data: ReportListResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data.into_items())
}

/// Отправить файлы отчётов; пустой список сюда не попадает
pub async fn upload_reports(files: &[web_sys::File]) -> Result<ReportUploadResponse, String> {
    let form = FormData::new().map_err(|e| format!("{e:?}"))?;
    for file in files {
        form.append_with_blob_and_filename(REPORTS_FIELD, file, &file.name())
            .map_err(|e| format!("{e:?}"))?;
    }
    form.append_with_str(UPLOADED_AT_FIELD, &Utc::now().to_rfc3339())
        .map_err(|e| format!("{e:?}"))?;

    let response = Request::post(&api_url(REPORTS_UPLOAD_PATH))
        .credentials(RequestCredentials::Include)
        .body(form)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(failure(&response).await);
    }

    // Тело ответа не обязательно: достаточно успешного статуса
    let body = response.text().await.unwrap_or_default();
    Ok(serde_json::from_str(&body).unwrap_or_default())
}

pub fn report_data_url(query: &ReportDataQuery) -> Result<String, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to build query: {}", e))?;
    Ok(format!("{}?{}", api_url(REPORT_DATA_PATH), qs))
}

/// Разрез выбранного отчёта
pub async fn fetch_report_data(query: &ReportDataQuery) -> Result<ReportData, String> {
    let response = Request::get(&report_data_url(query)?)
        .credentials(RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(failure(&response).await);
    }

    let value: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    ReportData::from_value(query.report_type, value)
        .map_err(|e| format!("Unexpected report shape: {}", e))
}

#[cfg(test)]
mod tests {
    use contracts::enums::ReportType;
    use contracts::usecases::u501_report_upload::ReportDataQuery;

    #[test]
    fn test_report_data_query_string() {
        let query = ReportDataQuery {
            report_type: ReportType::TopMedicinesByArea,
            selected_file: "17".to_string(),
        };
        let qs = serde_qs::to_string(&query).unwrap();
        assert_eq!(qs, "report_type=topMedicinesByArea&selected_file=17");
    }
}
