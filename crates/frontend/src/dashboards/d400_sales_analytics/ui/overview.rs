//! Обзорная страница: KPI, отчёт продаж по периодам, лидеры роста, выручка по областям

use super::chart_panel::ChartPanel;
use super::status_banner::StatusBanner;
use crate::dashboards::d400_sales_analytics::chart::ChartKind;
use crate::dashboards::d400_sales_analytics::error::MSG_FETCH_FAILED;
use crate::dashboards::d400_sales_analytics::use_sales_session;
use crate::dashboards::d400_sales_analytics::view_model::{
    build_view_models_opt, ChartViewModel, DashboardViewModels,
};
use crate::shared::components::metric_card::MetricCard;
use crate::shared::format::{format_currency, format_number_int, format_share};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const PAGE_ID: &str = "d400_sales_analytics--dashboard";

#[component]
pub fn SalesOverviewDashboard() -> impl IntoView {
    let session = use_sales_session();
    let store = session.store;
    let controller = session.controller(PAGE_ID);
    let (loading, set_loading) = signal(true);

    let refresh_controller = controller.clone();
    Effect::new(move |_| {
        let controller = refresh_controller.clone();
        spawn_local(async move {
            let outcome = controller.refresh().await;
            log::debug!("Overview fetch finished: {:?}", outcome);
            let _ = set_loading.try_set(false);
        });
    });

    let cleanup_controller = controller.clone();
    on_cleanup(move || cleanup_controller.cancel_pending());

    let models: Memo<DashboardViewModels> =
        Memo::new(move |_| store.with(|s| build_view_models_opt(s.dataset(), s.selected_area())));
    let has_data = move || store.with(|s| s.has_data());
    let status = Signal::derive(move || store.with(|s| s.status().cloned()));
    let on_dismiss = Callback::new(move |_| controller.dismiss());

    view! {
        <PageFrame
            page_id=PAGE_ID
            category=PAGE_CAT_DASHBOARD
            title="Dashboard"
            subtitle="Sales overview for the current session"
        >
            <StatusBanner status=status on_dismiss=on_dismiss/>
            {move || {
                if loading.get() && !has_data() {
                    view! {
                        <div class="dashboard-loading">
                            <Spinner/>
                            <span>"Loading dashboard data..."</span>
                        </div>
                    }
                    .into_any()
                } else if !has_data() {
                    view! {
                        <div class="dashboard-empty">
                            <strong>"No data yet. "</strong>
                            {MSG_FETCH_FAILED}
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <KpiGrid models=models/>
                        <div class="dashboard-grid">
                            <SalesReportCard models=models/>
                            <GrowthCard models=models/>
                            <RevenueByAreaCard models=models/>
                        </div>
                    }
                    .into_any()
                }
            }}
        </PageFrame>
    }
}

#[component]
fn KpiGrid(models: Memo<DashboardViewModels>) -> impl IntoView {
    let spark = Signal::derive(move || models.with(|m| m.kpis.spark.clone()));
    let change = Signal::derive(move || Some(models.with(|m| m.kpis.sales_change_percent)));

    view! {
        <div class="kpi-grid">
            <MetricCard
                label="Total Sales"
                icon_name="sales"
                value=Signal::derive(move || Some(format_currency(models.with(|m| m.kpis.total_sales))))
                change_percent=change
                spark=spark
            />
            <MetricCard
                label="Total Products"
                icon_name="products"
                value=Signal::derive(move || Some(format_number_int(models.with(|m| m.kpis.total_products as f64))))
                spark=spark
            />
            <MetricCard
                label="Stockists"
                icon_name="stockists"
                value=Signal::derive(move || Some(format_number_int(models.with(|m| m.kpis.total_stockists as f64))))
                spark=spark
            />
            <MetricCard
                label="Total Orders"
                icon_name="orders"
                value=Signal::derive(move || Some(format_number_int(models.with(|m| m.kpis.total_orders as f64))))
                spark=spark
            />
        </div>
    }
}

#[component]
fn SalesReportCard(models: Memo<DashboardViewModels>) -> impl IntoView {
    let (active_tab, set_active_tab) = signal(String::new());
    let (kind, set_kind) = signal(ChartKind::Bar);

    // Вкладка по умолчанию: первая из ответа
    let current_key = Memo::new(move |_| {
        let wanted = active_tab.get();
        models.with(|m| {
            m.sales_report
                .iter()
                .find(|t| t.key == wanted)
                .or_else(|| m.sales_report.first())
                .map(|t| t.key.clone())
                .unwrap_or_default()
        })
    });

    let chart = Signal::derive(move || {
        let key = current_key.get();
        models.with(|m| {
            m.sales_report
                .iter()
                .find(|t| t.key == key)
                .map(|t| t.chart.clone())
                .unwrap_or_else(ChartViewModel::empty)
        })
    });

    let tabs = move || {
        models.with(|m| {
            m.sales_report
                .iter()
                .map(|t| (t.key.clone(), t.title.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="dashboard-card dashboard-card--wide">
            <div class="dashboard-card__header">
                <div class="dashboard-card__tabs">
                    {move || {
                        tabs()
                            .into_iter()
                            .map(|(key, title)| {
                                let label = key.clone();
                                let key_for_click = key.clone();
                                let is_active = move || current_key.get() == key;
                                view! {
                                    <button
                                        class=move || if is_active() { "tab tab--active" } else { "tab" }
                                        on:click=move |_| set_active_tab.set(key_for_click.clone())
                                    >
                                        <span class="tab__name">{label}</span>
                                        <span class="tab__total">{title}</span>
                                    </button>
                                }
                            })
                            .collect_view()
                    }}
                </div>
                <ButtonGroup>
                    <Button
                        size=ButtonSize::Small
                        appearance=move || if kind.get() == ChartKind::Bar { ButtonAppearance::Primary } else { ButtonAppearance::Subtle }
                        on_click=move |_| set_kind.set(ChartKind::Bar)
                    >
                        "Bar"
                    </Button>
                    <Button
                        size=ButtonSize::Small
                        appearance=move || if kind.get() == ChartKind::Line { ButtonAppearance::Primary } else { ButtonAppearance::Subtle }
                        on_click=move |_| set_kind.set(ChartKind::Line)
                    >
                        "Line"
                    </Button>
                </ButtonGroup>
            </div>
            <ChartPanel
                title="Sales Report"
                kind=kind
                model=chart
                placeholder="No data for this period"
            />
        </div>
    }
}

#[component]
fn GrowthCard(models: Memo<DashboardViewModels>) -> impl IntoView {
    let chart = Signal::derive(move || models.with(|m| m.growth_highlight.chart.clone()));
    let rows = move || {
        models.with(|m| {
            let total = m.growth_highlight.total;
            m.growth_highlight
                .rows
                .iter()
                .map(|r| (r.name.clone(), r.color.clone(), format_share(r.value, total)))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="dashboard-card">
            <ChartPanel
                title="Top Growing Medicines"
                kind=ChartKind::Doughnut
                model=chart
                placeholder="No growth data"
            />
            <ul class="growth-list">
                {move || {
                    rows()
                        .into_iter()
                        .map(|(name, color, share)| view! {
                            <li class="growth-list__row">
                                <span class="growth-list__dot" style=format!("background: {}", color)></span>
                                <span class="growth-list__name">{name}</span>
                                <span class="growth-list__share">{share}</span>
                            </li>
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

#[component]
fn RevenueByAreaCard(models: Memo<DashboardViewModels>) -> impl IntoView {
    let bars = move || models.with(|m| m.revenue_by_area.clone());

    view! {
        <div class="dashboard-card">
            <div class="dashboard-card__title">"Revenue by Area"</div>
            {move || {
                let bars = bars();
                if bars.is_empty() {
                    view! { <div class="chart-panel__placeholder">"No area revenue yet"</div> }.into_any()
                } else {
                    bars.into_iter()
                        .map(|bar| view! {
                            <div class="revenue-row">
                                <div class="revenue-row__head">
                                    <span>{bar.name}</span>
                                    <span>{format_currency(bar.revenue)}</span>
                                </div>
                                <div class="revenue-row__track">
                                    <div
                                        class="revenue-row__fill"
                                        style=format!("width: {:.1}%", bar.share_of_max * 100.0)
                                    ></div>
                                </div>
                            </div>
                        })
                        .collect_view()
                        .into_any()
                }
            }}
        </div>
    }
}
