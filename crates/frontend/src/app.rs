use crate::dashboards::d400_sales_analytics::SalesSession;
use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    provide_context(AppGlobalContext::new());

    // Одна сессия данных на всё приложение: обзор и аналитика видят один набор
    provide_context(SalesSession::new());

    view! {
        <AppRoutes />
    }
}
