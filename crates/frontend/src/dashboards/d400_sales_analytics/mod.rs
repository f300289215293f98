pub mod api;
pub mod chart;
pub mod colors;
pub mod error;
pub mod store;
pub mod ui;
pub mod view_model;
pub mod workflow;

use api::HttpAnalyticsClient;
use leptos::prelude::*;
use std::sync::Arc;
use store::{SessionStore, ViewId};
use workflow::WorkflowController;

pub type SalesController = WorkflowController<HttpAnalyticsClient, RwSignal<SessionStore>>;

/// Сессия дашборда, общая для всех страниц приложения
#[derive(Clone)]
pub struct SalesSession {
    pub store: RwSignal<SessionStore>,
    client: Arc<HttpAnalyticsClient>,
}

impl SalesSession {
    pub fn new() -> Self {
        Self {
            store: RwSignal::new(SessionStore::new()),
            client: Arc::new(HttpAnalyticsClient::new()),
        }
    }

    /// Контроллер страницы `view`; её запросы отменяются при её размонтировании
    pub fn controller(&self, view: ViewId) -> SalesController {
        WorkflowController::new(Arc::clone(&self.client), self.store, view)
    }
}

impl Default for SalesSession {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_sales_session() -> SalesSession {
    use_context::<SalesSession>().expect("SalesSession not found. Provide it in App.")
}
