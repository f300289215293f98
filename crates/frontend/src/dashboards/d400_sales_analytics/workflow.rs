//! Контроллер рабочих процессов: upload, fetch, clear, export.
//!
//! Каждый процесс: `begin` в хранилище -> вызов сервиса -> `finish_*`.
//! Состояние хранится только в `SessionStore`; контроллер его не кэширует.

use super::error::{DashboardError, MSG_NO_DATA_TO_EXPORT, MSG_NO_FILES};
use super::store::{Completion, RequestTicket, SessionStore, ViewId, WorkflowKind};
use async_trait::async_trait;
use contracts::dashboards::d400_sales_analytics::DashboardDataset;
use leptos::prelude::*;
use std::sync::Arc;

/// Удалённый сервис аналитики
#[async_trait(?Send)]
pub trait AnalyticsBackend {
    /// Дескриптор локального файла (в браузере `web_sys::File`)
    type File;

    async fn upload(&self, files: &[Self::File]) -> Result<DashboardDataset, DashboardError>;
    async fn fetch(&self) -> Result<DashboardDataset, DashboardError>;
    async fn clear(&self) -> Result<(), DashboardError>;
    async fn export_report(&self, dataset: &DashboardDataset) -> Result<Vec<u8>, DashboardError>;
}

/// Доступ к хранилищу сессии. `None` означает, что хранилище уже уничтожено
/// вместе с представлением.
pub trait StoreHandle {
    fn update_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R>;
    fn with_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> Option<R>;
}

impl StoreHandle for RwSignal<SessionStore> {
    fn update_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R> {
        self.try_update(f)
    }

    fn with_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Completed,
    /// Сервис ответил ошибкой; сообщение уже в статусе
    Failed,
    /// Отклонено до сетевого вызова
    Rejected,
    /// Конфликтующий процесс ещё выполняется
    Busy,
    /// Результат устарел (вытеснен или отменён) и отброшен
    Superseded,
}

/// Контроллер одной страницы: её запросы помечаются `view` и отменяются
/// вместе с ней, не затрагивая другие страницы той же сессии.
pub struct WorkflowController<B, S> {
    backend: Arc<B>,
    store: S,
    view: ViewId,
}

impl<B, S: Clone> Clone for WorkflowController<B, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            store: self.store.clone(),
            view: self.view,
        }
    }
}

impl<B, S> WorkflowController<B, S>
where
    B: AnalyticsBackend,
    S: StoreHandle,
{
    pub fn new(backend: Arc<B>, store: S, view: ViewId) -> Self {
        Self {
            backend,
            store,
            view,
        }
    }

    fn begin(&self, kind: WorkflowKind) -> Result<RequestTicket, WorkflowOutcome> {
        let view = self.view;
        match self.store.update_store(|s| s.begin(kind, view)) {
            Some(Some(ticket)) => Ok(ticket),
            Some(None) => Err(WorkflowOutcome::Busy),
            None => Err(WorkflowOutcome::Superseded),
        }
    }

    fn outcome(completion: Option<Completion>, failed: bool) -> WorkflowOutcome {
        match completion {
            Some(Completion::Applied) if failed => WorkflowOutcome::Failed,
            Some(Completion::Applied) => WorkflowOutcome::Completed,
            Some(Completion::Stale) | None => WorkflowOutcome::Superseded,
        }
    }

    /// Загрузка текущего датасета сервиса (при открытии страницы)
    pub async fn refresh(&self) -> WorkflowOutcome {
        let ticket = match self.begin(WorkflowKind::Fetch) {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };
        let result = self.backend.fetch().await;
        let failed = result.is_err();
        let completion = self
            .store
            .update_store(|s| s.finish_fetch(ticket, result));
        Self::outcome(completion, failed)
    }

    /// Отправка файлов на анализ. Пустой список отклоняется без сетевого вызова.
    /// `on_started` вызывается, только если отправка действительно началась:
    /// при `Rejected`/`Busy` выбранные файлы остаются у вызывающего.
    pub async fn upload(&self, files: Vec<B::File>, on_started: impl FnOnce()) -> WorkflowOutcome {
        if files.is_empty() {
            self.store
                .update_store(|s| s.reject(DashboardError::Validation(MSG_NO_FILES.into())));
            return WorkflowOutcome::Rejected;
        }
        let ticket = match self.begin(WorkflowKind::Upload) {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };
        on_started();
        log::debug!("Uploading {} file(s)", files.len());
        let result = self.backend.upload(&files).await;
        let failed = result.is_err();
        let completion = self
            .store
            .update_store(|s| s.finish_upload(ticket, result));
        Self::outcome(completion, failed)
    }

    pub async fn clear(&self) -> WorkflowOutcome {
        let ticket = match self.begin(WorkflowKind::Clear) {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };
        let result = self.backend.clear().await;
        let failed = result.is_err();
        let completion = self
            .store
            .update_store(|s| s.finish_clear(ticket, result));
        Self::outcome(completion, failed)
    }

    /// Генерация PDF по текущему датасету; `save` получает байты отчёта,
    /// только если запрос не был отменён за время ожидания.
    pub async fn export<F>(&self, save: F) -> WorkflowOutcome
    where
        F: FnOnce(&[u8]) -> Result<(), String>,
    {
        let Some(dataset) = self
            .store
            .with_store(|s| s.dataset().cloned())
            .flatten()
        else {
            self.store.update_store(|s| {
                s.reject(DashboardError::Export(MSG_NO_DATA_TO_EXPORT.into()))
            });
            return WorkflowOutcome::Rejected;
        };
        let ticket = match self.begin(WorkflowKind::Export) {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };

        let result = self.backend.export_report(&dataset).await;
        let still_current = self
            .store
            .with_store(|s| s.is_current(&ticket))
            .unwrap_or(false);
        if !still_current {
            log::warn!("Export finished after cancellation; report not saved");
            return WorkflowOutcome::Superseded;
        }

        let result = result.and_then(|bytes| {
            log::debug!("Saving report ({} bytes)", bytes.len());
            save(&bytes).map_err(DashboardError::Export)
        });
        let failed = result.is_err();
        let completion = self
            .store
            .update_store(|s| s.finish_export(ticket, result));
        Self::outcome(completion, failed)
    }

    pub fn select_area(&self, area: &str) -> bool {
        self.store
            .update_store(|s| s.select_area(area))
            .unwrap_or(false)
    }

    pub fn dismiss(&self) {
        self.store.update_store(SessionStore::dismiss_status);
    }

    /// Отмена при уходе со страницы: поздние ответы её запросов будут отброшены
    pub fn cancel_pending(&self) {
        let view = self.view;
        self.store.update_store(|s| s.cancel_owned(view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_sales_analytics::store::Severity;
    use contracts::dashboards::d400_sales_analytics::{LabeledSeries, OrderedMap};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type SharedStore = Rc<RefCell<SessionStore>>;

    const VIEW: ViewId = "d400_sales_analytics--analytics";
    const OTHER_VIEW: ViewId = "d400_sales_analytics--dashboard";

    impl StoreHandle for SharedStore {
        fn update_store<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> Option<R> {
            Some(f(&mut self.borrow_mut()))
        }

        fn with_store<R>(&self, f: impl FnOnce(&SessionStore) -> R) -> Option<R> {
            Some(f(&self.borrow()))
        }
    }

    fn dataset_with_areas(areas: &[&str]) -> DashboardDataset {
        let mut by_area = OrderedMap::new();
        for area in areas {
            by_area.insert(*area, LabeledSeries::new(vec!["X".into()], vec![1.0]));
        }
        DashboardDataset {
            total_records: 1,
            top_medicines_by_area: Some(by_area),
            ..DashboardDataset::default()
        }
    }

    #[derive(Default)]
    struct MockBackend {
        calls: Cell<usize>,
        fail_with: Option<DashboardError>,
        dataset: DashboardDataset,
        /// Имитация ухода со страницы, пока запрос в полёте
        cancel_during: RefCell<Option<SharedStore>>,
    }

    impl MockBackend {
        fn returning(dataset: DashboardDataset) -> Self {
            Self {
                dataset,
                ..Self::default()
            }
        }

        fn failing(err: DashboardError) -> Self {
            Self {
                fail_with: Some(err),
                ..Self::default()
            }
        }

        fn respond<T>(&self, value: T) -> Result<T, DashboardError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(store) = self.cancel_during.borrow().as_ref() {
                store.borrow_mut().cancel_owned(VIEW);
            }
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(value),
            }
        }
    }

    #[async_trait(?Send)]
    impl AnalyticsBackend for MockBackend {
        type File = String;

        async fn upload(&self, _files: &[String]) -> Result<DashboardDataset, DashboardError> {
            self.respond(self.dataset.clone())
        }

        async fn fetch(&self) -> Result<DashboardDataset, DashboardError> {
            self.respond(self.dataset.clone())
        }

        async fn clear(&self) -> Result<(), DashboardError> {
            self.respond(())
        }

        async fn export_report(
            &self,
            _dataset: &DashboardDataset,
        ) -> Result<Vec<u8>, DashboardError> {
            self.respond(b"%PDF-1.4".to_vec())
        }
    }

    fn controller(backend: MockBackend) -> (WorkflowController<MockBackend, SharedStore>, SharedStore) {
        let store: SharedStore = Rc::new(RefCell::new(SessionStore::new()));
        (WorkflowController::new(Arc::new(backend), store.clone(), VIEW), store)
    }

    #[test]
    fn test_upload_with_no_files_never_calls_service() {
        let (ctl, store) = controller(MockBackend::default());
        let outcome = block_on(ctl.upload(Vec::new(), || {}));

        assert_eq!(outcome, WorkflowOutcome::Rejected);
        assert_eq!(ctl.backend.calls.get(), 0);
        let store = store.borrow();
        let status = store.status().unwrap();
        assert_eq!(status.text, MSG_NO_FILES);
        assert_eq!(status.severity, Severity::Error);
    }

    #[test]
    fn test_upload_replaces_dataset_and_selects_first_area() {
        let (ctl, store) = controller(MockBackend::returning(dataset_with_areas(&["East", "West"])));
        let outcome = block_on(ctl.upload(vec!["sales.xlsx".into()], || {}));

        assert_eq!(outcome, WorkflowOutcome::Completed);
        let store = store.borrow();
        assert_eq!(store.selected_area(), "East");
        assert!(!store.is_busy(WorkflowKind::Upload));
        assert_eq!(store.status().unwrap().severity, Severity::Success);
    }

    #[test]
    fn test_upload_rejected_while_clearing() {
        let (ctl, store) = controller(MockBackend::default());
        store.borrow_mut().begin(WorkflowKind::Clear, OTHER_VIEW);

        let started = Cell::new(false);
        let outcome = block_on(ctl.upload(vec!["a.csv".into()], || started.set(true)));
        assert_eq!(outcome, WorkflowOutcome::Busy);
        assert_eq!(ctl.backend.calls.get(), 0);
        assert!(!started.get());
    }

    #[test]
    fn test_failed_upload_keeps_dataset_and_reports_server_text() {
        let (ctl, store) = controller(MockBackend::failing(DashboardError::Upload(
            "Invalid file format".into(),
        )));
        let ticket = store.borrow_mut().begin(WorkflowKind::Fetch, VIEW).unwrap();
        store
            .borrow_mut()
            .finish_fetch(ticket, Ok(dataset_with_areas(&["North"])));

        let outcome = block_on(ctl.upload(vec!["bad.bin".into()], || {}));
        assert_eq!(outcome, WorkflowOutcome::Failed);
        let store = store.borrow();
        assert_eq!(store.selected_area(), "North");
        assert_eq!(store.status().unwrap().text, "Invalid file format");
    }

    #[test]
    fn test_clear_is_idempotent_without_dataset() {
        let (ctl, store) = controller(MockBackend::default());
        assert_eq!(block_on(ctl.clear()), WorkflowOutcome::Completed);
        assert_eq!(block_on(ctl.clear()), WorkflowOutcome::Completed);
        assert!(store.borrow().dataset().is_none());
        assert_eq!(store.borrow().selected_area(), "");
    }

    #[test]
    fn test_export_without_dataset_is_local_error() {
        let (ctl, store) = controller(MockBackend::default());
        let outcome = block_on(ctl.export(|_| Ok(())));

        assert_eq!(outcome, WorkflowOutcome::Rejected);
        assert_eq!(ctl.backend.calls.get(), 0);
        assert_eq!(store.borrow().status().unwrap().text, MSG_NO_DATA_TO_EXPORT);
    }

    #[test]
    fn test_export_hands_pdf_bytes_to_saver() {
        let (ctl, store) = controller(MockBackend::returning(dataset_with_areas(&["East"])));
        block_on(ctl.refresh());

        let saved = RefCell::new(Vec::new());
        let outcome = block_on(ctl.export(|bytes| {
            saved.borrow_mut().extend_from_slice(bytes);
            Ok(())
        }));
        assert_eq!(outcome, WorkflowOutcome::Completed);
        assert!(saved.borrow().starts_with(b"%PDF"));
        assert!(!store.borrow().is_busy(WorkflowKind::Export));
    }

    #[test]
    fn test_save_failure_becomes_export_error() {
        let (ctl, store) = controller(MockBackend::returning(dataset_with_areas(&["East"])));
        block_on(ctl.refresh());

        let outcome = block_on(ctl.export(|_| Err("No window object".into())));
        assert_eq!(outcome, WorkflowOutcome::Failed);
        assert_eq!(store.borrow().status().unwrap().text, "No window object");
    }

    #[test]
    fn test_response_after_cancel_is_discarded() {
        let backend = MockBackend::returning(dataset_with_areas(&["East"]));
        let (ctl, store) = controller(backend);
        *ctl.backend.cancel_during.borrow_mut() = Some(store.clone());

        let outcome = block_on(ctl.refresh());
        assert_eq!(outcome, WorkflowOutcome::Superseded);
        assert!(store.borrow().dataset().is_none());
    }

    #[test]
    fn test_upload_start_hook_runs_once_sending_begins() {
        let (ctl, _store) = controller(MockBackend::returning(dataset_with_areas(&["East"])));
        let started = Cell::new(0);
        let outcome = block_on(ctl.upload(vec!["a.csv".into()], || {
            // к моменту хука сервис ещё не вызывался
            assert_eq!(ctl.backend.calls.get(), 0);
            started.set(started.get() + 1);
        }));
        assert_eq!(outcome, WorkflowOutcome::Completed);
        assert_eq!(started.get(), 1);

        let outcome = block_on(ctl.upload(Vec::new(), || started.set(started.get() + 1)));
        assert_eq!(outcome, WorkflowOutcome::Rejected);
        assert_eq!(started.get(), 1);
    }

    #[test]
    fn test_leaving_one_page_keeps_other_page_upload() {
        let store: SharedStore = Rc::new(RefCell::new(SessionStore::new()));
        let backend = Arc::new(MockBackend::returning(dataset_with_areas(&["East"])));
        let uploader = WorkflowController::new(Arc::clone(&backend), store.clone(), VIEW);
        let overview = WorkflowController::new(backend, store.clone(), OTHER_VIEW);

        let ticket = store.borrow_mut().begin(WorkflowKind::Upload, VIEW).unwrap();
        overview.cancel_pending();
        assert!(store.borrow().is_current(&ticket));

        uploader.cancel_pending();
        assert!(!store.borrow().is_current(&ticket));
        assert!(store.borrow().status().is_none());
    }

    #[test]
    fn test_select_area_and_dismiss() {
        let (ctl, store) = controller(MockBackend::returning(dataset_with_areas(&["East", "West"])));
        block_on(ctl.upload(vec!["a.csv".into()], || {}));

        assert!(ctl.select_area("West"));
        assert!(!ctl.select_area("Nowhere"));
        assert_eq!(store.borrow().selected_area(), "West");

        ctl.dismiss();
        assert!(store.borrow().status().is_none());
    }
}
