//! Страница аналитики: загрузка файлов, очистка сессии, экспорт PDF и графики по областям

use super::chart_panel::ChartPanel;
use super::status_banner::StatusBanner;
use crate::dashboards::d400_sales_analytics::chart::ChartKind;
use crate::dashboards::d400_sales_analytics::store::WorkflowKind;
use crate::dashboards::d400_sales_analytics::use_sales_session;
use crate::dashboards::d400_sales_analytics::view_model::{
    build_view_models_opt, ChartViewModel, DashboardViewModels,
};
use crate::shared::export::download_pdf;
use crate::shared::files::files_from_input;
use crate::shared::format::{format_file_size, format_number_int};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const EXPORT_FILENAME: &str = "analysis_report.pdf";
const ACCEPTED_FILES: &str = ".csv,.xlsx,.xls";

const PAGE_ID: &str = "d400_sales_analytics--analytics";

#[component]
pub fn SalesAnalyticsDashboard() -> impl IntoView {
    let session = use_sales_session();
    let store = session.store;
    let controller = session.controller(PAGE_ID);

    // web_sys::File не Send, поэтому локальное хранилище
    let pending = RwSignal::new_local(Vec::<web_sys::File>::new());

    let refresh_controller = controller.clone();
    Effect::new(move |_| {
        let controller = refresh_controller.clone();
        spawn_local(async move {
            controller.refresh().await;
        });
    });

    let cleanup_controller = controller.clone();
    on_cleanup(move || cleanup_controller.cancel_pending());

    let models: Memo<DashboardViewModels> =
        Memo::new(move |_| store.with(|s| build_view_models_opt(s.dataset(), s.selected_area())));
    let status = Signal::derive(move || store.with(|s| s.status().cloned()));
    let mutating = Signal::derive(move || store.with(|s| s.is_mutating()));
    let uploading = move || store.with(|s| s.is_busy(WorkflowKind::Upload));
    let exporting = Signal::derive(move || store.with(|s| s.is_busy(WorkflowKind::Export)));

    let on_file_select = move |ev: web_sys::Event| {
        let files = files_from_input(&ev);
        if !files.is_empty() {
            pending.update(|p| p.extend(files));
        }
    };

    let upload_controller = controller.clone();
    let on_upload = move |_| {
        // Очередь очищается, только когда отправка действительно началась
        let files = pending.with_untracked(Clone::clone);
        let controller = upload_controller.clone();
        spawn_local(async move {
            controller
                .upload(files, move || {
                    let _ = pending.try_set(Vec::new());
                })
                .await;
        });
    };

    let clear_controller = controller.clone();
    let on_clear = move |_| {
        let controller = clear_controller.clone();
        spawn_local(async move {
            controller.clear().await;
        });
    };

    let export_controller = controller.clone();
    let on_export = move |_| {
        let controller = export_controller.clone();
        spawn_local(async move {
            controller
                .export(|bytes| download_pdf(bytes, EXPORT_FILENAME))
                .await;
        });
    };

    let area_controller = controller.clone();
    let on_area_change = move |ev: web_sys::Event| {
        let area = event_target_value(&ev);
        if !area_controller.select_area(&area) {
            log::warn!("Unknown area selected: {}", area);
        }
    };

    let on_dismiss = Callback::new(move |_| controller.dismiss());

    view! {
        <PageFrame
            page_id=PAGE_ID
            category=PAGE_CAT_DASHBOARD
            title="Sales Analytics"
            subtitle="Upload sales files to analyze trends by area"
        >
            <StatusBanner status=status on_dismiss=on_dismiss/>

            <div class="analytics-toolbar">
                <label class="button button--primary" for="analytics-file-input">
                    {icon("file")}
                    " Choose files"
                </label>
                <input
                    id="analytics-file-input"
                    type="file"
                    multiple=true
                    accept=ACCEPTED_FILES
                    class="hidden"
                    on:change=on_file_select
                />
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_upload
                    disabled=mutating
                >
                    {icon("upload")}
                    {move || if uploading() { " Analyzing..." } else { " Upload & Analyze" }}
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=on_clear
                    disabled=mutating
                >
                    {icon("trash")}
                    " Clear Data"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=on_export
                    disabled=exporting
                >
                    {icon("download")}
                    " Export PDF"
                </Button>
            </div>

            {move || {
                let staged = pending.with(|p| {
                    p.iter()
                        .map(|f| (f.name(), format_file_size(f.size())))
                        .collect::<Vec<_>>()
                });
                (!staged.is_empty()).then(|| view! {
                    <div class="staged-files">
                        <ul class="staged-files__list">
                            {staged
                                .into_iter()
                                .map(|(name, size)| view! {
                                    <li class="staged-files__item">
                                        <span class="staged-files__name">{name}</span>
                                        <span class="staged-files__size">{size}</span>
                                    </li>
                                })
                                .collect_view()}
                        </ul>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| pending.set(Vec::new())
                        >
                            "Reset"
                        </Button>
                    </div>
                })
            }}

            <div class="analytics-summary">
                <span class="analytics-summary__records">
                    "Records analyzed: "
                    {move || format_number_int(models.with(|m| m.total_records as f64))}
                </span>
                <label class="analytics-summary__area">
                    "Area: "
                    <select
                        on:change=on_area_change
                        prop:value=move || store.with(|s| s.selected_area().to_string())
                        disabled=move || models.with(|m| m.area_keys.is_empty())
                    >
                        {move || {
                            models.with(|m| m.area_keys.clone())
                                .into_iter()
                                .map(|area| {
                                    let value = area.clone();
                                    view! { <option value=value>{area}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                </label>
            </div>

            {move || models.with(|m| m.has_no_charts()).then(|| view! {
                <div class="analytics-hint">
                    {icon("analytics")}
                    " Upload sales files to see charts for each area."
                </div>
            })}

            <div class="analytics-grid">
                <ChartPanel
                    title="Sales Trends by Area"
                    kind=ChartKind::Line
                    model=chart_signal(models, |m| &m.trend)
                />
                <ChartPanel
                    title="Top Medicines"
                    kind=ChartKind::Bar
                    model=chart_signal(models, |m| &m.top_medicines)
                    placeholder="No medicines for the selected area"
                />
                <ChartPanel
                    title="Growing Medicines"
                    kind=ChartKind::Bar
                    model=chart_signal(models, |m| &m.growth)
                />
                <ChartPanel
                    title="Prescriber Analysis"
                    kind=ChartKind::HorizontalBar
                    model=chart_signal(models, |m| &m.prescriber)
                />
                <ChartPanel
                    title="High Free Quantity"
                    kind=ChartKind::Pie
                    model=chart_signal(models, |m| &m.free_quantity)
                />
                <ChartPanel
                    title="Weekly Growth (%)"
                    kind=ChartKind::Line
                    model=chart_signal(models, |m| &m.weekly_growth)
                />
                <ChartPanel
                    title="Area Performance"
                    kind=ChartKind::Bar
                    model=chart_signal(models, |m| &m.area_performance)
                />
            </div>
        </PageFrame>
    }
}

fn chart_signal(
    models: Memo<DashboardViewModels>,
    pick: fn(&DashboardViewModels) -> &ChartViewModel,
) -> Signal<ChartViewModel> {
    Signal::derive(move || models.with(|m| pick(m).clone()))
}
