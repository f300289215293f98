//! Tab content registry - единственный источник правды для маппинга tab.key → View

use crate::dashboards::{SalesAnalyticsDashboard, SalesOverviewDashboard};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::usecases::u501_report_upload::ReportUploadPage;
use leptos::prelude::*;

/// Таб, открываемый при старте без `?active=`
pub const DEFAULT_TAB: &str = "d400_sales_analytics";

pub const KNOWN_TABS: [&str; 3] = [
    "d400_sales_analytics",
    "d400_sales_analytics_charts",
    "u501_report_upload",
];

/// Рендерит контент таба по его ключу; для неизвестных ключей placeholder
pub fn render_tab_content(key: &str) -> AnyView {
    match key {
        // d400: обзор и аналитика продаж
        "d400_sales_analytics" => view! { <SalesOverviewDashboard /> }.into_any(),
        "d400_sales_analytics_charts" => view! { <SalesAnalyticsDashboard /> }.into_any(),

        // u501: загрузка отчётов
        "u501_report_upload" => view! { <ReportUploadPage /> }.into_any(),

        _ => {
            log::warn!("Unknown tab type: {}", key);
            let message = format!("No page is registered for \"{}\"", key);
            view! {
                <PageFrame page_id="not_found--system" category=PAGE_CAT_SYSTEM title="Page not found">
                    <div class="placeholder">{message}</div>
                </PageFrame>
            }
            .into_any()
        }
    }
}
