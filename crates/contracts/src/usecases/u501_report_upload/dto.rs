use crate::dashboards::d400_sales_analytics::{DashboardDataset, GrowthReport, LabeledSeries, OrderedMap};
use crate::enums::ReportType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Загруженный файл в списке `GET /api/reports/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportListItem {
    /// Идентификатор файла для параметра `selected_file`
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, alias = "file_name", alias = "filename")]
    pub name: String,
    #[serde(default, alias = "uploadedAt", skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

impl ReportListItem {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Сервис отдаёт список либо массивом, либо обёрнутым в `{reports: [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportListResponse {
    Wrapped { reports: Vec<ReportListItem> },
    Bare(Vec<ReportListItem>),
}

impl ReportListResponse {
    pub fn into_items(self) -> Vec<ReportListItem> {
        match self {
            ReportListResponse::Wrapped { reports } => reports,
            ReportListResponse::Bare(items) => items,
        }
    }
}

/// Ответ `POST /api/reports/upload/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, alias = "reports")]
    pub uploaded: Vec<ReportListItem>,
}

/// Query-параметры `GET /api/report_data/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDataQuery {
    pub report_type: ReportType,
    pub selected_file: String,
}

/// Разрез одного отчёта; форма зависит от `report_type`
#[derive(Debug, Clone, PartialEq)]
pub enum ReportData {
    SalesTrendsByArea(OrderedMap<LabeledSeries>),
    TopMedicinesByArea(OrderedMap<LabeledSeries>),
    GrowingMedicines(GrowthReport),
}

impl ReportData {
    /// Разбор ответа. Допускается как "голый" разрез, так и обёртка
    /// `{"<reportType>": {...}}`.
    pub fn from_value(report_type: ReportType, value: Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            Value::Object(mut obj) if obj.contains_key(report_type.code()) => obj
                .remove(report_type.code())
                .unwrap_or(Value::Null),
            other => other,
        };
        Ok(match report_type {
            ReportType::SalesTrendsByArea => {
                ReportData::SalesTrendsByArea(serde_json::from_value(value)?)
            }
            ReportType::TopMedicinesByArea => {
                ReportData::TopMedicinesByArea(serde_json::from_value(value)?)
            }
            ReportType::GrowingMedicines => {
                ReportData::GrowingMedicines(serde_json::from_value(value)?)
            }
        })
    }

    /// Датасет, в котором заполнен только этот разрез
    pub fn into_dataset(self) -> DashboardDataset {
        let mut dataset = DashboardDataset::empty();
        match self {
            ReportData::SalesTrendsByArea(map) => dataset.sales_trends_by_area = Some(map),
            ReportData::TopMedicinesByArea(map) => dataset.top_medicines_by_area = Some(map),
            ReportData::GrowingMedicines(growth) => dataset.growing_medicines = Some(growth),
        }
        dataset
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_accepts_both_shapes() {
        let bare: ReportListResponse =
            serde_json::from_value(json!([{"id": 7, "file_name": "jan.txt"}])).unwrap();
        let items = bare.into_items();
        assert_eq!(items[0].id, "7");
        assert_eq!(items[0].name, "jan.txt");

        let wrapped: ReportListResponse =
            serde_json::from_value(json!({"reports": [{"id": "a1", "name": "feb.pdf"}]})).unwrap();
        assert_eq!(wrapped.into_items()[0].display_name(), "feb.pdf");
    }

    #[test]
    fn test_report_data_wrapped_and_bare() {
        let wrapped = json!({"topMedicinesByArea": {"East": {"labels": ["A"], "data": [1.0]}}});
        let data = ReportData::from_value(ReportType::TopMedicinesByArea, wrapped).unwrap();
        let dataset = data.into_dataset();
        assert_eq!(dataset.area_keys(), vec!["East"]);
        assert!(dataset.sales_trends_by_area.is_none());

        let bare = json!({"labels": ["A"], "previous_week_sales": [1.0], "last_week_sales": [2.0]});
        let data = ReportData::from_value(ReportType::GrowingMedicines, bare).unwrap();
        match data {
            ReportData::GrowingMedicines(g) => assert_eq!(g.current_period, vec![2.0]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_report_data_keeps_area_order_of_body() {
        let value: Value = serde_json::from_str(
            r#"{"topMedicinesByArea": {"West": {"labels": ["A"], "data": [1]}, "East": {"labels": ["B"], "data": [2]}}}"#,
        )
        .unwrap();
        let data = ReportData::from_value(ReportType::TopMedicinesByArea, value).unwrap();
        assert_eq!(data.into_dataset().area_keys(), vec!["West", "East"]);
    }

    #[test]
    fn test_query_serializes_codes() {
        let query = ReportDataQuery {
            report_type: ReportType::SalesTrendsByArea,
            selected_file: "12".into(),
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["report_type"], json!("salesTrendsByArea"));
    }
}
