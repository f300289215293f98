use serde::{Deserialize, Serialize};

/// Тип отчёта для выборки по отдельному загруженному файлу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportType {
    SalesTrendsByArea,
    TopMedicinesByArea,
    GrowingMedicines,
}

impl ReportType {
    /// Значение параметра `report_type` в запросе
    pub fn code(&self) -> &'static str {
        match self {
            ReportType::SalesTrendsByArea => "salesTrendsByArea",
            ReportType::TopMedicinesByArea => "topMedicinesByArea",
            ReportType::GrowingMedicines => "growingMedicines",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::SalesTrendsByArea => "Sales Trends by Area",
            ReportType::TopMedicinesByArea => "Top Medicines by Area",
            ReportType::GrowingMedicines => "Growing Medicines",
        }
    }

    pub fn all() -> Vec<ReportType> {
        vec![
            ReportType::SalesTrendsByArea,
            ReportType::TopMedicinesByArea,
            ReportType::GrowingMedicines,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "salesTrendsByArea" => Some(ReportType::SalesTrendsByArea),
            "topMedicinesByArea" => Some(ReportType::TopMedicinesByArea),
            "growingMedicines" => Some(ReportType::GrowingMedicines),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
