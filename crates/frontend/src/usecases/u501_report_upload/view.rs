use super::api;
use super::selection::{report_chart, LatestRequest, ReportChart};
use super::validation::{
    upload_failure_message, upload_success_message, UploadQueue, ALLOWED_EXTENSIONS,
    MSG_SELECT_FILES,
};
use crate::dashboards::d400_sales_analytics::store::StatusMessage;
use crate::dashboards::d400_sales_analytics::ui::chart_panel::ChartPanel;
use crate::dashboards::d400_sales_analytics::ui::status_banner::StatusBanner;
use crate::shared::config::config;
use crate::shared::files::{files_from_drop, files_from_input};
use crate::shared::format::format_file_size;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::enums::ReportType;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_report_upload::{
    ReportData, ReportDataQuery, ReportListItem, ReportUpload,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use uuid::Uuid;

#[component]
pub fn ReportUploadPage() -> impl IntoView {
    let queue = RwSignal::new_local(UploadQueue::<web_sys::File>::new());
    let (message, set_message) = signal(None::<StatusMessage>);
    let (uploading, set_uploading) = signal(false);
    let (reports, set_reports) = signal(Vec::<ReportListItem>::new());

    let load_reports = move || {
        spawn_local(async move {
            match api::list_reports().await {
                Ok(items) => {
                    let _ = set_reports.try_set(items);
                }
                Err(e) => log::error!("Failed to load reports: {}", e),
            }
        });
    };

    Effect::new(move |_| load_reports());

    let stage_files = move |files: Vec<web_sys::File>| {
        if files.is_empty() {
            return;
        }
        let errors = queue
            .try_update(|q| q.stage(files.into_iter().map(|f| (f.name(), f.size(), f))))
            .unwrap_or_default();
        if errors.is_empty() {
            set_message.set(None);
        } else {
            log::warn!("Rejected {} file(s)", errors.len());
            set_message.set(Some(StatusMessage::error(errors.join("\n"))));
        }
    };

    let on_file_select = move |ev: web_sys::Event| stage_files(files_from_input(&ev));

    let on_drag_over = move |ev: web_sys::DragEvent| ev.prevent_default();

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        stage_files(files_from_drop(&ev));
    };

    let on_upload = move |_| {
        let files = queue.with_untracked(|q| q.handles());
        if files.is_empty() {
            set_message.set(Some(StatusMessage::error(MSG_SELECT_FILES)));
            return;
        }
        set_uploading.set(true);
        set_message.set(Some(StatusMessage::info("Uploading...")));

        spawn_local(async move {
            let result = api::upload_reports(&files).await;
            let _ = set_uploading.try_set(false);
            match result {
                Ok(response) => {
                    log::debug!(
                        "Uploaded {} file(s), server listed {}",
                        files.len(),
                        response.uploaded.len()
                    );
                    let _ = set_message
                        .try_set(Some(StatusMessage::success(upload_success_message(files.len()))));
                    load_reports();

                    TimeoutFuture::new(config().ui.status_dismiss_ms).await;
                    let _ = queue.try_update(|q| q.reset());
                    let _ = set_message.try_set(None);
                }
                Err(reason) => {
                    log::error!("Report upload failed: {}", reason);
                    let _ = set_message
                        .try_set(Some(StatusMessage::error(upload_failure_message(&reason))));
                }
            }
        });
    };

    let on_reset = move |_| {
        queue.update(|q| q.reset());
        set_message.set(None);
    };

    let remove_file = move |id: Uuid| {
        queue.update(|q| {
            q.remove(id);
        });
    };

    let staged = move || {
        queue.with(|q| {
            q.iter()
                .map(|f| (f.id, f.name.clone(), format_file_size(f.size)))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <PageFrame
            page_id="u501_report_upload--usecase"
            category=PAGE_CAT_USECASE
            title=ReportUpload::display_name()
            subtitle=ReportUpload::description()
        >
            <StatusBanner
                status=message
                on_dismiss=Callback::new(move |_| set_message.set(None))
            />

            <div class="drop-zone" on:dragover=on_drag_over on:drop=on_drop>
                {icon("upload")}
                <p class="drop-zone__title">"Drop files here or click to browse"</p>
                <p class="drop-zone__hint">
                    {format!("Supported formats: {}", ALLOWED_EXTENSIONS.join(", "))}
                </p>
                <input
                    id="report-file-input"
                    type="file"
                    multiple=true
                    accept=ALLOWED_EXTENSIONS.join(",")
                    class="hidden"
                    on:change=on_file_select
                />
                <label class="button button--primary" for="report-file-input">
                    {icon("file")}
                    " Choose Files"
                </label>
            </div>

            {move || {
                let files = staged();
                (!files.is_empty()).then(|| view! {
                    <div class="staged-files">
                        <h3 class="staged-files__title">
                            {format!("Selected Files ({})", files.len())}
                        </h3>
                        <ul class="staged-files__list">
                            {files
                                .into_iter()
                                .map(|(id, name, size)| view! {
                                    <li class="staged-files__item">
                                        {icon("file")}
                                        <span class="staged-files__name">{name}</span>
                                        <span class="staged-files__size">{size}</span>
                                        <button
                                            class="staged-files__remove"
                                            title="Remove"
                                            disabled=move || uploading.get()
                                            on:click=move |_| remove_file(id)
                                        >
                                            {icon("close")}
                                        </button>
                                    </li>
                                })
                                .collect_view()}
                        </ul>
                    </div>
                })
            }}

            <div class="upload-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_upload
                    disabled=Signal::derive(move || uploading.get())
                >
                    {move || if uploading.get() { "Uploading..." } else { "Upload Files" }}
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=on_reset
                    disabled=Signal::derive(move || uploading.get())
                >
                    "Reset"
                </Button>
            </div>

            <ReportBrowser reports=reports/>
        </PageFrame>
    }
}

/// Просмотр разреза загруженного отчёта
#[component]
fn ReportBrowser(reports: ReadSignal<Vec<ReportListItem>>) -> impl IntoView {
    let (selected_file, set_selected_file) = signal(String::new());
    let (report_type, set_report_type) = signal(ReportType::SalesTrendsByArea);
    let (area, set_area) = signal(String::new());
    let (data, set_data) = signal(None::<ReportData>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let latest = StoredValue::new(LatestRequest::default());

    // Новый выбор (файл, тип): новый запрос; ответы на прежний выбор отбрасываются
    Effect::new(move |_| {
        let file = selected_file.get();
        let kind = report_type.get();
        let seq = latest
            .try_update_value(|l| l.issue())
            .unwrap_or_default();
        set_data.set(None);
        set_error.set(None);
        if file.is_empty() {
            set_loading.set(false);
            return;
        }
        set_loading.set(true);

        let query = ReportDataQuery {
            report_type: kind,
            selected_file: file,
        };
        spawn_local(async move {
            let result = api::fetch_report_data(&query).await;
            let is_latest = latest
                .try_with_value(|l| l.is_latest(seq))
                .unwrap_or(false);
            if !is_latest {
                log::warn!("Discarding stale report data for {}", query.selected_file);
                return;
            }
            let _ = set_loading.try_set(false);
            match result {
                Ok(report) => {
                    let _ = set_data.try_set(Some(report));
                }
                Err(e) => {
                    let _ = set_error.try_set(Some(e));
                }
            }
        });
    });

    let chart = Memo::new(move |_| {
        let current_area = area.get();
        data.with(|d| match d {
            Some(report) => report_chart(report.clone(), &current_area),
            None => ReportChart::empty(report_type.get_untracked()),
        })
    });

    view! {
        <div class="report-browser">
            <h2 class="report-browser__title">
                "Uploaded Reports: "
                {move || report_type.get().display_name()}
            </h2>
            <div class="report-browser__controls">
                <select on:change=move |ev| set_selected_file.set(event_target_value(&ev))>
                    <option value="">"Select a file"</option>
                    {move || {
                        reports
                            .get()
                            .into_iter()
                            .map(|item| {
                                let label = item.display_name().to_string();
                                view! { <option value=item.id>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <select on:change=move |ev| {
                    if let Some(kind) = ReportType::from_code(&event_target_value(&ev)) {
                        set_report_type.set(kind);
                    }
                }>
                    {ReportType::all()
                        .into_iter()
                        .map(|kind| view! {
                            <option value=kind.code()>{kind.display_name()}</option>
                        })
                        .collect_view()}
                </select>
                {move || {
                    let areas = chart.with(|c| c.areas.clone());
                    (!areas.is_empty()).then(|| view! {
                        <select
                            prop:value=move || chart.with(|c| c.area.clone())
                            on:change=move |ev| set_area.set(event_target_value(&ev))
                        >
                            {areas
                                .into_iter()
                                .map(|a| {
                                    let value = a.clone();
                                    view! { <option value=value>{a}</option> }
                                })
                                .collect_view()}
                        </select>
                    })
                }}
            </div>

            {move || loading.get().then(|| view! {
                <div class="report-browser__loading"><Spinner/></div>
            })}
            {move || error.get().map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <ChartPanel
                title="Report Preview"
                kind=Signal::derive(move || chart.with(|c| c.kind))
                model=Signal::derive(move || chart.with(|c| c.model.clone()))
                placeholder="Choose an uploaded file to preview its report"
            />
        </div>
    }
}
