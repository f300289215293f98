use super::ordered_map::OrderedMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Снимок агрегатов продаж, который сервис аналитики возвращает для текущей сессии.
///
/// Каждый разрез (sub-report) независим: отсутствует (`None`) пока данных нет
/// или после очистки. Все параллельные последовательности внутри разреза
/// имеют одинаковую длину, индекс `i` относится к одной и той же сущности.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDataset {
    #[serde(default)]
    pub total_records: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi_metrics: Option<KpiMetrics>,

    /// Вкладки отчёта по продажам ("Weekly", "Monthly", "Yearly")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_report: Option<OrderedMap<SalesReportPeriod>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_by_area: Option<Vec<AreaRevenue>>,

    /// area-name → {labels: периоды, data: суммы}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_trends_by_area: Option<OrderedMap<LabeledSeries>>,

    /// area-name → {labels: препараты, data: суммы}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_medicines_by_area: Option<OrderedMap<LabeledSeries>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growing_medicines: Option<GrowthReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriber_analysis: Option<LabeledSeries>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_free_quantity: Option<LabeledSeries>,

    /// Процент изменения продаж неделя к неделе
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_growth_trends: Option<LabeledSeries>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_performance: Option<AreaPerformance>,
}

impl DashboardDataset {
    /// Явная "пустая" форма: сервис возвращает её, пока ничего не загружено
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ключи разреза topMedicinesByArea в порядке ответа сервера
    pub fn area_keys(&self) -> Vec<String> {
        self.top_medicines_by_area
            .as_ref()
            .map(|m| m.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Нет ни одной записи и ни одного непустого разреза
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
            && self.sales_trends_by_area.as_ref().map_or(true, |m| m.is_empty())
            && self.top_medicines_by_area.as_ref().map_or(true, |m| m.is_empty())
            && self.growing_medicines.as_ref().map_or(true, |g| g.labels.is_empty())
            && self.prescriber_analysis.as_ref().map_or(true, |s| s.is_empty())
            && self.high_free_quantity.as_ref().map_or(true, |s| s.is_empty())
    }
}

/// Базовая форма разреза: подписи и одна числовая последовательность
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    #[serde(default, deserialize_with = "de_labels")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "de_numbers")]
    pub data: Vec<f64>,
}

impl LabeledSeries {
    pub fn new(labels: Vec<String>, data: Vec<f64>) -> Self {
        Self { labels, data }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Препараты с ростом продаж: две параллельные серии над общим набором подписей.
///
/// Каноническая схема: `previous_week_sales` / `last_week_sales`.
/// Старые версии сервиса отдавали те же данные под другими именами,
/// они принимаются только как устаревшие синонимы.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    #[serde(default, deserialize_with = "de_labels")]
    pub labels: Vec<String>,

    #[serde(
        rename = "previous_week_sales",
        alias = "prev_month_sales",
        alias = "previous_month_sales",
        alias = "prev_month_data",
        default,
        deserialize_with = "de_numbers"
    )]
    pub previous_period: Vec<f64>,

    #[serde(
        rename = "last_week_sales",
        alias = "last_month_sales",
        alias = "last_month_data",
        alias = "current_period_sales",
        default,
        deserialize_with = "de_numbers"
    )]
    pub current_period: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    #[serde(default)]
    pub total_sales: f64,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_stockists: u64,
    #[serde(default)]
    pub total_orders: u64,
    /// Изменение продаж последней недели к предыдущей, %
    #[serde(default)]
    pub sales_change_percentage: f64,
}

/// Одна вкладка отчёта по продажам
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesReportPeriod {
    /// Уже отформатированная сумма за период, например "₹1.2M"
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "de_labels")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "de_numbers")]
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaRevenue {
    pub name: String,
    #[serde(default)]
    pub revenue: f64,
}

/// Сравнение областей в колоночной форме (как отдаёт сервис)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPerformance {
    #[serde(default, deserialize_with = "de_labels")]
    pub name: Vec<String>,
    #[serde(default, deserialize_with = "de_numbers")]
    pub total_sales: Vec<f64>,
    #[serde(default, deserialize_with = "de_numbers")]
    pub order_count: Vec<f64>,
}

/// Ответ сервиса без данных: `{error}` при отказе или `{message}` при успехе
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiMessage {
    /// Текст для пользователя: ошибка важнее сообщения
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Подписи могут прийти числами (день месяца): приводим к строкам
fn de_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            Value::Number(n) => match n.as_i64() {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

/// null внутри числовой серии трактуется как 0
fn de_numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}
