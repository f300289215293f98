use crate::shared::icons::icon;
use leptos::prelude::*;

/// Порог, ниже которого изменение считается нулевым
const FLAT_CHANGE: f64 = 0.05;

/// Высоты столбиков мини-графика в процентах от максимума
pub fn spark_heights(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|v| (v.max(0.0) / max * 100.0).round())
        .collect()
}

/// Стрелка и модификатор класса для процента изменения
pub fn change_class(pct: f64) -> (&'static str, &'static str) {
    if pct > FLAT_CHANGE {
        ("trend-up", "metric-card__change metric-card__change--up")
    } else if pct < -FLAT_CHANGE {
        ("trend-down", "metric-card__change metric-card__change--down")
    } else {
        ("", "metric-card__change metric-card__change--flat")
    }
}

#[component]
pub fn MetricCard(
    /// Label displayed above the value
    label: &'static str,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// Already formatted value (None = loading/no data)
    #[prop(into)]
    value: Signal<Option<String>>,
    /// Change % relative to the previous period
    #[prop(into, optional)]
    change_percent: Signal<Option<f64>>,
    /// Series for the spark bars under the value
    #[prop(into, optional)]
    spark: Signal<Vec<f64>>,
) -> impl IntoView {
    let formatted = move || value.get().unwrap_or_else(|| "—".to_string());

    let change_view = move || {
        change_percent.get().map(|pct| {
            let (arrow, cls) = change_class(pct);
            let text = format!("{:.1}%", pct.abs());
            view! {
                <span class=cls>
                    {(!arrow.is_empty()).then(|| icon(arrow))}
                    {text}
                </span>
            }
        })
    };

    let spark_view = move || {
        let heights = spark_heights(&spark.get());
        (!heights.is_empty()).then(|| {
            view! {
                <div class="metric-card__spark">
                    {heights
                        .into_iter()
                        .map(|h| view! {
                            <span class="metric-card__spark-bar" style=format!("height: {}%", h)></span>
                        })
                        .collect_view()}
                </div>
            }
        })
    };

    view! {
        <div class="metric-card">
            <div class="metric-card__icon">
                {icon(icon_name)}
            </div>
            <div class="metric-card__content">
                <div class="metric-card__label">{label}</div>
                <div class="metric-card__value">
                    {formatted}
                    {change_view}
                </div>
                {spark_view}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spark_heights() {
        assert_eq!(spark_heights(&[50.0, 100.0, 25.0]), vec![50.0, 100.0, 25.0]);
        assert_eq!(spark_heights(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(spark_heights(&[-5.0, 10.0]), vec![0.0, 100.0]);
        assert!(spark_heights(&[]).is_empty());
    }

    #[test]
    fn test_change_class() {
        assert_eq!(change_class(12.5).0, "trend-up");
        assert_eq!(change_class(-3.0).0, "trend-down");
        assert_eq!(change_class(0.0).0, "");
    }
}
