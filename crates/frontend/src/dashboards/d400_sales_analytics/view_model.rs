//! Построение view model графиков из сырого датасета.
//!
//! Чистые функции: `(датасет, выбранная область) -> модели панелей`.
//! Отсутствующий разрез всегда даёт явную пустую модель (пустые labels/series),
//! чтобы рендерер одинаково обрабатывал "нет данных".

use super::colors::{color_for, palette_color, HIGHLIGHT_COLORS, OTHERS_COLOR};
use contracts::dashboards::d400_sales_analytics::{
    AreaPerformance, DashboardDataset, GrowthReport, KpiMetrics, LabeledSeries, OrderedMap,
    SalesReportPeriod,
};

/// Больше стольких сегментов круговая диаграмма не показывает
pub const MAX_PIE_SLICES: usize = 10;
pub const OTHERS_LABEL: &str = "Others";
/// Сколько лидеров роста выводится на обзорной странице
pub const GROWTH_HIGHLIGHT_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub data: Vec<f64>,
    pub color: String,
    /// Цвет каждой точки (для круговых); пусто: везде `color`
    pub point_colors: Vec<String>,
}

impl Series {
    pub fn new(name: impl Into<String>, data: Vec<f64>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data,
            color: color.into(),
            point_colors: Vec::new(),
        }
    }

    pub fn point_color(&self, index: usize) -> &str {
        self.point_colors
            .get(index)
            .map(String::as_str)
            .unwrap_or(&self.color)
    }
}

/// Нормализованный вход любого графика: подписи + одна или несколько серий
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartViewModel {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartViewModel {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn single(labels: Vec<String>, series: Series) -> Self {
        Self {
            labels,
            series: vec![series],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiViewModel {
    pub total_sales: f64,
    pub total_products: u64,
    pub total_stockists: u64,
    pub total_orders: u64,
    pub sales_change_percent: f64,
    /// Недельные продажи для мини-графиков карточек
    pub spark: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesReportTab {
    pub key: String,
    pub title: String,
    pub chart: ChartViewModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueBar {
    pub name: String,
    pub revenue: f64,
    /// Доля от максимальной выручки, 0..=1
    pub share_of_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRow {
    pub name: String,
    pub value: f64,
    pub color: String,
}

/// Тройка лидеров роста для кольцевой диаграммы
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthHighlight {
    pub chart: ChartViewModel,
    pub rows: Vec<HighlightRow>,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViewModels {
    pub trend: ChartViewModel,
    pub top_medicines: ChartViewModel,
    pub growth: ChartViewModel,
    pub prescriber: ChartViewModel,
    pub free_quantity: ChartViewModel,
    pub weekly_growth: ChartViewModel,
    pub area_performance: ChartViewModel,
    pub sales_report: Vec<SalesReportTab>,
    pub revenue_by_area: Vec<RevenueBar>,
    pub growth_highlight: GrowthHighlight,
    pub kpis: KpiViewModel,
    pub total_records: u64,
    pub area_keys: Vec<String>,
}

impl DashboardViewModels {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Нечего рисовать ни на одной панели
    pub fn has_no_charts(&self) -> bool {
        self.trend.is_empty()
            && self.top_medicines.is_empty()
            && self.growth.is_empty()
            && self.prescriber.is_empty()
            && self.free_quantity.is_empty()
    }
}

pub fn build_view_models(dataset: &DashboardDataset, selected_area: &str) -> DashboardViewModels {
    DashboardViewModels {
        trend: trend_chart(dataset.sales_trends_by_area.as_ref()),
        top_medicines: top_medicines_chart(dataset.top_medicines_by_area.as_ref(), selected_area),
        growth: growth_chart(dataset.growing_medicines.as_ref()),
        prescriber: single_series_chart(
            dataset.prescriber_analysis.as_ref(),
            "Sales Value",
            palette_color(3),
        ),
        free_quantity: free_quantity_chart(dataset.high_free_quantity.as_ref()),
        weekly_growth: single_series_chart(
            dataset.weekly_growth_trends.as_ref(),
            "Growth %",
            palette_color(5),
        ),
        area_performance: area_performance_chart(dataset.area_performance.as_ref()),
        sales_report: sales_report_tabs(dataset.sales_report.as_ref()),
        revenue_by_area: revenue_bars(dataset),
        growth_highlight: growth_highlight(dataset.growing_medicines.as_ref()),
        kpis: kpis(dataset),
        total_records: dataset.total_records,
        area_keys: dataset.area_keys(),
    }
}

/// Вариант для отсутствующего датасета (ещё не загружен или очищен)
pub fn build_view_models_opt(
    dataset: Option<&DashboardDataset>,
    selected_area: &str,
) -> DashboardViewModels {
    match dataset {
        Some(dataset) => build_view_models(dataset, selected_area),
        None => DashboardViewModels::empty(),
    }
}

/// Одна линия на область. Подписи берутся у первой области: все области
/// считаются имеющими одинаковые периоды, расхождения длин не исправляются.
fn trend_chart(trends: Option<&OrderedMap<LabeledSeries>>) -> ChartViewModel {
    let Some(trends) = trends else {
        return ChartViewModel::empty();
    };
    let Some((_, first)) = trends.first() else {
        return ChartViewModel::empty();
    };

    ChartViewModel {
        labels: first.labels.clone(),
        series: trends
            .iter()
            .map(|(area, chart)| {
                Series::new(format!("Sales in {}", area), chart.data.clone(), color_for(area))
            })
            .collect(),
    }
}

fn top_medicines_chart(
    by_area: Option<&OrderedMap<LabeledSeries>>,
    selected_area: &str,
) -> ChartViewModel {
    if selected_area.is_empty() {
        return ChartViewModel::empty();
    }
    match by_area.and_then(|m| m.get(selected_area)) {
        Some(chart) => ChartViewModel::single(
            chart.labels.clone(),
            Series::new("Total Value", chart.data.clone(), color_for(selected_area)),
        ),
        None => ChartViewModel::empty(),
    }
}

/// Порядок сервера сохраняется: он уже отсортирован по величине роста
fn growth_chart(growth: Option<&GrowthReport>) -> ChartViewModel {
    let Some(growth) = growth else {
        return ChartViewModel::empty();
    };
    if growth.labels.is_empty() {
        return ChartViewModel::empty();
    }
    ChartViewModel {
        labels: growth.labels.clone(),
        series: vec![
            Series::new("Previous Week", growth.previous_period.clone(), palette_color(0)),
            Series::new("Last Week", growth.current_period.clone(), palette_color(1)),
        ],
    }
}

fn single_series_chart(
    source: Option<&LabeledSeries>,
    name: &str,
    color: &str,
) -> ChartViewModel {
    match source {
        Some(s) if !s.is_empty() => {
            ChartViewModel::single(s.labels.clone(), Series::new(name, s.data.clone(), color))
        }
        _ => ChartViewModel::empty(),
    }
}

/// Круговая диаграмма бесплатного количества: длинный хвост сворачивается в "Others"
fn free_quantity_chart(source: Option<&LabeledSeries>) -> ChartViewModel {
    let Some(source) = source.filter(|s| !s.is_empty()) else {
        return ChartViewModel::empty();
    };
    let (labels, data) = fold_long_tail(&source.labels, &source.data, MAX_PIE_SLICES);
    let point_colors = labels
        .iter()
        .map(|label| {
            if label == OTHERS_LABEL {
                OTHERS_COLOR.to_string()
            } else {
                color_for(label).to_string()
            }
        })
        .collect();

    let mut series = Series::new("Free Units", data, palette_color(0));
    series.point_colors = point_colors;
    ChartViewModel::single(labels, series)
}

/// Если записей больше `max_entries`, первые `max_entries - 1` остаются как есть
/// (в порядке сервера), остальные суммируются в одну запись "Others".
pub fn fold_long_tail(
    labels: &[String],
    data: &[f64],
    max_entries: usize,
) -> (Vec<String>, Vec<f64>) {
    let len = labels.len().min(data.len());
    if len <= max_entries || max_entries == 0 {
        return (labels[..len].to_vec(), data[..len].to_vec());
    }
    let keep = max_entries - 1;
    let mut out_labels = labels[..keep].to_vec();
    let mut out_data = data[..keep].to_vec();
    out_labels.push(OTHERS_LABEL.to_string());
    out_data.push(data[keep..len].iter().sum());
    (out_labels, out_data)
}

fn area_performance_chart(perf: Option<&AreaPerformance>) -> ChartViewModel {
    match perf {
        Some(p) if !p.name.is_empty() => ChartViewModel {
            labels: p.name.clone(),
            series: vec![
                Series::new("Total Sales", p.total_sales.clone(), palette_color(0)),
                Series::new("Orders", p.order_count.clone(), palette_color(2)),
            ],
        },
        _ => ChartViewModel::empty(),
    }
}

fn sales_report_tabs(report: Option<&OrderedMap<SalesReportPeriod>>) -> Vec<SalesReportTab> {
    let Some(report) = report else {
        return Vec::new();
    };
    report
        .iter()
        .enumerate()
        .map(|(i, (key, period))| {
            let color = period
                .color
                .clone()
                .unwrap_or_else(|| palette_color(i).to_string());
            SalesReportTab {
                key: key.to_string(),
                title: period.title.clone(),
                chart: ChartViewModel::single(
                    period.labels.clone(),
                    Series::new(format!("{} Sales", key), period.data.clone(), color),
                ),
            }
        })
        .collect()
}

fn revenue_bars(dataset: &DashboardDataset) -> Vec<RevenueBar> {
    let Some(rows) = dataset.revenue_by_area.as_ref() else {
        return Vec::new();
    };
    let max = rows.iter().map(|r| r.revenue).fold(0.0_f64, f64::max);
    rows.iter()
        .map(|r| RevenueBar {
            name: r.name.clone(),
            revenue: r.revenue,
            share_of_max: if max > 0.0 { (r.revenue / max).max(0.0) } else { 0.0 },
        })
        .collect()
}

fn growth_highlight(growth: Option<&GrowthReport>) -> GrowthHighlight {
    let Some(growth) = growth else {
        return GrowthHighlight::default();
    };
    let rows: Vec<HighlightRow> = growth
        .labels
        .iter()
        .take(GROWTH_HIGHLIGHT_COUNT)
        .enumerate()
        .map(|(i, label)| HighlightRow {
            name: label.clone(),
            value: growth.current_period.get(i).copied().unwrap_or(0.0),
            color: HIGHLIGHT_COLORS[i % HIGHLIGHT_COLORS.len()].to_string(),
        })
        .collect();
    if rows.is_empty() {
        return GrowthHighlight::default();
    }

    let total = rows.iter().map(|r| r.value).sum();
    let mut series = Series::new(
        "Last Week",
        rows.iter().map(|r| r.value).collect(),
        HIGHLIGHT_COLORS[0],
    );
    series.point_colors = rows.iter().map(|r| r.color.clone()).collect();

    GrowthHighlight {
        chart: ChartViewModel::single(rows.iter().map(|r| r.name.clone()).collect(), series),
        rows,
        total,
    }
}

fn kpis(dataset: &DashboardDataset) -> KpiViewModel {
    let metrics = dataset.kpi_metrics.clone().unwrap_or_else(KpiMetrics::default);
    let spark = dataset
        .sales_report
        .as_ref()
        .and_then(|r| r.get("Weekly"))
        .map(|w| w.data.clone())
        .unwrap_or_default();
    KpiViewModel {
        total_sales: metrics.total_sales,
        total_products: metrics.total_products,
        total_stockists: metrics.total_stockists,
        total_orders: metrics.total_orders,
        sales_change_percent: metrics.sales_change_percentage,
        spark,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d400_sales_analytics::AreaRevenue;
    use serde_json::json;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_dataset_gives_defined_empty_models() {
        let vm = build_view_models(&DashboardDataset::empty(), "East");
        for chart in [
            &vm.trend,
            &vm.top_medicines,
            &vm.growth,
            &vm.prescriber,
            &vm.free_quantity,
        ] {
            assert!(chart.labels.is_empty());
            assert!(chart.series.is_empty());
        }
        assert!(vm.has_no_charts());
        assert!(vm.sales_report.is_empty());
        assert_eq!(vm.kpis, KpiViewModel::default());
    }

    #[test]
    fn test_absent_dataset() {
        assert_eq!(build_view_models_opt(None, ""), DashboardViewModels::empty());
    }

    #[test]
    fn test_unknown_selected_area_gives_empty_top_medicines() {
        let dataset: DashboardDataset = serde_json::from_value(json!({
            "topMedicinesByArea": {"East": {"labels": ["A"], "data": [1.0]}}
        }))
        .unwrap();

        let vm = build_view_models(&dataset, "West");
        assert!(vm.top_medicines.labels.is_empty());
        assert!(vm.top_medicines.series.is_empty());

        let vm = build_view_models(&dataset, "");
        assert!(vm.top_medicines.is_empty());

        let vm = build_view_models(&dataset, "East");
        assert_eq!(vm.top_medicines.labels, labels(&["A"]));
        assert_eq!(vm.top_medicines.series[0].data, vec![1.0]);
    }

    #[test]
    fn test_trend_uses_first_area_labels_and_stable_colors() {
        let dataset: DashboardDataset = serde_json::from_value(json!({
            "salesTrendsByArea": {
                "North Zone": {"labels": ["W1", "W2"], "data": [1.0, 2.0]},
                "South Zone": {"labels": ["W1"], "data": [3.0]}
            }
        }))
        .unwrap();

        let vm = build_view_models(&dataset, "");
        assert_eq!(vm.trend.labels, labels(&["W1", "W2"]));
        assert_eq!(vm.trend.series.len(), 2);
        assert_eq!(vm.trend.series[0].name, "Sales in North Zone");
        assert_eq!(vm.trend.series[0].color, color_for("North Zone"));
        // короткая серия передаётся как есть, без "починки"
        assert_eq!(vm.trend.series[1].data, vec![3.0]);

        let again = build_view_models(&dataset, "");
        assert_eq!(again.trend.series[1].color, vm.trend.series[1].color);
    }

    #[test]
    fn test_fold_long_tail_eleven_entries() {
        let names: Vec<String> = "abcdefghijk".chars().map(|c| c.to_string()).collect();
        let values: Vec<f64> = (1..=11).map(|v| v as f64).collect();

        let (out_labels, out_data) = fold_long_tail(&names, &values, MAX_PIE_SLICES);
        assert_eq!(out_labels.len(), 10);
        assert_eq!(out_labels[9], OTHERS_LABEL);
        assert_eq!(out_data[9], 10.0 + 11.0);
        assert_eq!(&out_labels[..9], &names[..9]);
        assert_eq!(&out_data[..9], &values[..9]);
    }

    #[test]
    fn test_fold_long_tail_short_list_untouched() {
        let names = labels(&["a", "b"]);
        let (out_labels, out_data) = fold_long_tail(&names, &[1.0, 2.0], MAX_PIE_SLICES);
        assert_eq!(out_labels, names);
        assert_eq!(out_data, vec![1.0, 2.0]);
    }

    #[test]
    fn test_free_quantity_chart_folds_and_colors_others() {
        let names: Vec<String> = (0..12).map(|i| format!("Item {}", i)).collect();
        let dataset = DashboardDataset {
            high_free_quantity: Some(LabeledSeries::new(names, vec![1.0; 12])),
            ..DashboardDataset::default()
        };
        let vm = build_view_models(&dataset, "");
        assert_eq!(vm.free_quantity.labels.len(), MAX_PIE_SLICES);
        let series = &vm.free_quantity.series[0];
        assert_eq!(series.data[9], 3.0);
        assert_eq!(series.point_color(9), OTHERS_COLOR);
        assert_eq!(series.point_color(0), color_for("Item 0"));
    }

    #[test]
    fn test_growth_keeps_server_order() {
        let dataset: DashboardDataset = serde_json::from_value(json!({
            "growingMedicines": {
                "labels": ["Small", "Big"],
                "previous_week_sales": [1.0, 1.0],
                "last_week_sales": [2.0, 50.0]
            }
        }))
        .unwrap();
        let vm = build_view_models(&dataset, "");
        assert_eq!(vm.growth.labels, labels(&["Small", "Big"]));
        assert_eq!(vm.growth.series[0].data, vec![1.0, 1.0]);
        assert_eq!(vm.growth.series[1].data, vec![2.0, 50.0]);

        assert_eq!(vm.growth_highlight.rows.len(), 2);
        assert_eq!(vm.growth_highlight.total, 52.0);
    }

    #[test]
    fn test_revenue_bars_share_of_max() {
        let dataset = DashboardDataset {
            revenue_by_area: Some(vec![
                AreaRevenue { name: "A".into(), revenue: 200.0 },
                AreaRevenue { name: "B".into(), revenue: 50.0 },
            ]),
            ..DashboardDataset::default()
        };
        let bars = build_view_models(&dataset, "").revenue_by_area;
        assert_eq!(bars[0].share_of_max, 1.0);
        assert_eq!(bars[1].share_of_max, 0.25);
    }

    #[test]
    fn test_sales_report_tabs_and_spark() {
        let dataset: DashboardDataset = serde_json::from_value(json!({
            "salesReport": {
                "Weekly": {"title": "₹3.0K", "labels": ["Jan 01", "Jan 08"], "data": [1000.0, 2000.0], "color": "#3b82f6"},
                "Yearly": {"title": "₹3.0K", "labels": ["Jan"], "data": [3000.0]}
            }
        }))
        .unwrap();
        let vm = build_view_models(&dataset, "");
        assert_eq!(vm.sales_report.len(), 2);
        assert_eq!(vm.sales_report[0].key, "Weekly");
        assert_eq!(vm.sales_report[0].chart.series[0].color, "#3b82f6");
        assert_eq!(vm.sales_report[1].chart.series[0].color, palette_color(1));
        assert_eq!(vm.kpis.spark, vec![1000.0, 2000.0]);
    }
}
