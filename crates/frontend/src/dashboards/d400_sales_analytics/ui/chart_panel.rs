use crate::dashboards::d400_sales_analytics::chart::{
    layout_chart, legend, CartesianLayout, ChartKind, ChartLayout, RadialLayout, VIEW_HEIGHT,
    VIEW_WIDTH,
};
use crate::dashboards::d400_sales_analytics::colors::with_alpha;
use crate::dashboards::d400_sales_analytics::view_model::ChartViewModel;
use leptos::prelude::*;

const BAR_FILL_ALPHA: f64 = 0.7;
const DEFAULT_PLACEHOLDER: &str = "No data available. Upload a report to see this chart.";

fn px(v: f64) -> String {
    format!("{:.1}", v)
}

/// Карточка с графиком. Без подписей в модели показывает заглушку.
#[component]
pub fn ChartPanel(
    #[prop(into)] title: String,
    #[prop(into)] kind: Signal<ChartKind>,
    #[prop(into)] model: Signal<ChartViewModel>,
    #[prop(optional)] placeholder: Option<&'static str>,
) -> impl IntoView {
    let placeholder = placeholder.unwrap_or(DEFAULT_PLACEHOLDER);

    let body = move || {
        let current_kind = kind.get();
        model.with(|vm| match layout_chart(current_kind, vm) {
            ChartLayout::Placeholder => view! {
                <div class="chart-panel__placeholder">{placeholder}</div>
            }
            .into_any(),
            ChartLayout::Cartesian(layout) => cartesian_svg(layout),
            ChartLayout::Radial(layout) => radial_svg(layout),
        })
    };

    let legend_view = move || {
        let entries = model.with(|vm| legend(kind.get(), vm));
        (entries.len() > 1 || kind.get().is_radial()).then(|| {
            view! {
                <ul class="chart-panel__legend">
                    {entries
                        .into_iter()
                        .map(|e| view! {
                            <li class="chart-panel__legend-item">
                                <span class="chart-panel__swatch" style=format!("background: {}", e.color)></span>
                                {e.label}
                            </li>
                        })
                        .collect_view()}
                </ul>
            }
        })
    };

    view! {
        <div class="chart-panel" data-chart-kind=move || kind.get().code()>
            <div class="chart-panel__title">{title}</div>
            <div class="chart-panel__body">{body}</div>
            {legend_view}
        </div>
    }
}

fn cartesian_svg(layout: CartesianLayout) -> AnyView {
    let plot = layout.plot;
    let horizontal = layout.horizontal;

    let grid = layout
        .value_ticks
        .into_iter()
        .map(|tick| {
            if horizontal {
                view! {
                    <g>
                        <line class="chart-grid" x1=px(tick.position) y1=px(plot.top) x2=px(tick.position) y2=px(plot.bottom)/>
                        <text class="chart-tick" x=px(tick.position) y=px(plot.bottom + 16.0) text-anchor="middle">{tick.text}</text>
                    </g>
                }
                .into_any()
            } else {
                view! {
                    <g>
                        <line class="chart-grid" x1=px(plot.left) y1=px(tick.position) x2=px(plot.right) y2=px(tick.position)/>
                        <text class="chart-tick" x=px(plot.left - 6.0) y=px(tick.position + 4.0) text-anchor="end">{tick.text}</text>
                    </g>
                }
                .into_any()
            }
        })
        .collect_view();

    let categories = layout
        .categories
        .into_iter()
        .map(|label| {
            if horizontal {
                view! {
                    <text class="chart-category" x=px(plot.left - 6.0) y=px(label.position + 4.0) text-anchor="end">{label.text}</text>
                }
                .into_any()
            } else {
                view! {
                    <text class="chart-category" x=px(label.position) y=px(plot.bottom + 16.0) text-anchor="middle">{label.text}</text>
                }
                .into_any()
            }
        })
        .collect_view();

    let baseline = if horizontal {
        view! {
            <line class="chart-axis" x1=px(layout.baseline) y1=px(plot.top) x2=px(layout.baseline) y2=px(plot.bottom)/>
        }
        .into_any()
    } else {
        view! {
            <line class="chart-axis" x1=px(plot.left) y1=px(layout.baseline) x2=px(plot.right) y2=px(layout.baseline)/>
        }
        .into_any()
    };

    let bars = layout
        .bars
        .into_iter()
        .map(|bar| view! {
            <rect
                class="chart-bar"
                x=px(bar.x)
                y=px(bar.y)
                width=px(bar.width)
                height=px(bar.height)
                fill=with_alpha(&bar.color, BAR_FILL_ALPHA)
                stroke=bar.color
                aria-label=bar.title
            />
        })
        .collect_view();

    let lines = layout
        .lines
        .into_iter()
        .map(|line| {
            let color = line.color.clone();
            let dots = line
                .points
                .iter()
                .map(|(x, y)| view! {
                    <circle class="chart-dot" cx=px(*x) cy=px(*y) r="3" fill=color.clone()/>
                })
                .collect_view();
            view! {
                <g aria-label=line.name>
                    <path class="chart-line" d=line.path fill="none" stroke=line.color stroke-width="2"/>
                    {dots}
                </g>
            }
        })
        .collect_view();

    view! {
        <svg class="chart-svg" viewBox=format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT) preserveAspectRatio="xMidYMid meet">
            {grid}
            {baseline}
            {bars}
            {lines}
            {categories}
        </svg>
    }
    .into_any()
}

fn radial_svg(layout: RadialLayout) -> AnyView {
    let slices = layout
        .slices
        .into_iter()
        .map(|slice| view! {
            <path
                class="chart-slice"
                d=slice.path
                fill=slice.color
                fill-rule="evenodd"
                aria-label=format!("{}: {:.0}%", slice.label, slice.share * 100.0)
            />
        })
        .collect_view();

    view! {
        <svg class="chart-svg chart-svg--radial" viewBox=format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT) preserveAspectRatio="xMidYMid meet">
            {slices}
        </svg>
    }
    .into_any()
}
