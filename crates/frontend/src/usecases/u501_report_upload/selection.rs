//! Выбор отчёта для просмотра и отбрасывание устаревших ответов

use crate::dashboards::d400_sales_analytics::chart::ChartKind;
use crate::dashboards::d400_sales_analytics::view_model::{build_view_models, ChartViewModel};
use crate::dashboards::d400_sales_analytics::store::reconcile_selection;
use contracts::enums::ReportType;
use contracts::usecases::u501_report_upload::ReportData;

/// Выдаёт номера запросов; применяется только ответ на последний из них
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestRequest {
    seq: u64,
}

impl LatestRequest {
    pub fn issue(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.seq == seq
    }
}

/// Разрез, подготовленный к отрисовке
#[derive(Debug, Clone, PartialEq)]
pub struct ReportChart {
    pub kind: ChartKind,
    pub model: ChartViewModel,
    pub areas: Vec<String>,
    pub area: String,
}

impl ReportChart {
    pub fn empty(report_type: ReportType) -> Self {
        Self {
            kind: chart_kind_for(report_type),
            model: ChartViewModel::empty(),
            areas: Vec::new(),
            area: String::new(),
        }
    }
}

pub fn chart_kind_for(report_type: ReportType) -> ChartKind {
    match report_type {
        ReportType::SalesTrendsByArea => ChartKind::Line,
        ReportType::TopMedicinesByArea | ReportType::GrowingMedicines => ChartKind::Bar,
    }
}

/// Разрез через общий построитель view model. Для разреза по областям
/// сохраняется прежняя область, если она есть в новом ответе.
pub fn report_chart(data: ReportData, previous_area: &str) -> ReportChart {
    let report_type = match &data {
        ReportData::SalesTrendsByArea(_) => ReportType::SalesTrendsByArea,
        ReportData::TopMedicinesByArea(_) => ReportType::TopMedicinesByArea,
        ReportData::GrowingMedicines(_) => ReportType::GrowingMedicines,
    };
    let dataset = data.into_dataset();
    let areas = dataset.area_keys();
    let area = reconcile_selection(previous_area, &areas);
    let mut models = build_view_models(&dataset, &area);

    let model = match report_type {
        ReportType::SalesTrendsByArea => std::mem::take(&mut models.trend),
        ReportType::TopMedicinesByArea => std::mem::take(&mut models.top_medicines),
        ReportType::GrowingMedicines => std::mem::take(&mut models.growth),
    };
    ReportChart {
        kind: chart_kind_for(report_type),
        model,
        areas,
        area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_latest_request_applies() {
        let mut latest = LatestRequest::default();
        let first = latest.issue();
        let second = latest.issue();
        assert!(!latest.is_latest(first));
        assert!(latest.is_latest(second));
    }

    #[test]
    fn test_top_medicines_report_selects_first_area() {
        let data = ReportData::from_value(
            ReportType::TopMedicinesByArea,
            json!({
                "South": {"labels": ["P"], "data": [5.0]},
                "North": {"labels": ["Q"], "data": [7.0]}
            }),
        )
        .unwrap();

        let chart = report_chart(data, "");
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.area, "South");
        assert_eq!(chart.areas, vec!["South".to_string(), "North".to_string()]);
        assert_eq!(chart.model.labels, vec!["P".to_string()]);
    }

    #[test]
    fn test_trend_report_is_line_chart() {
        let data = ReportData::from_value(
            ReportType::SalesTrendsByArea,
            json!({"salesTrendsByArea": {"East": {"labels": ["W1", "W2"], "data": [1.0, 2.0]}}}),
        )
        .unwrap();

        let chart = report_chart(data, "");
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.model.series[0].name, "Sales in East");
        // в разрезе трендов нет ключей topMedicinesByArea
        assert!(chart.areas.is_empty());
    }

    #[test]
    fn test_empty_growth_report_is_placeholder_model() {
        let data =
            ReportData::from_value(ReportType::GrowingMedicines, json!({"labels": []})).unwrap();
        assert!(report_chart(data, "").model.is_empty());
    }
}
