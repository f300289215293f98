//! Хранилище сессии дашборда.
//!
//! Единственный владелец текущего датасета, выбранной области, сообщения
//! статуса и флагов занятости. Меняется только через функции переходов ниже,
//! которые вызывает контроллер рабочих процессов; рендереры только читают.
//!
//! Переходы: `idle -> busy(kind) -> idle`. Датасет и выбранная область
//! обновляются атомарно в момент `busy -> idle`, никогда посреди запроса.
//! Каждый запрос получает `RequestTicket`; завершение по устаревшему билету
//! (запрос был вытеснен новым или отменён) игнорируется.

use super::error::DashboardError;
use contracts::dashboards::d400_sales_analytics::DashboardDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Fetch,
    Upload,
    Clear,
    Export,
}

impl WorkflowKind {
    const ALL: [WorkflowKind; 4] = [
        WorkflowKind::Fetch,
        WorkflowKind::Upload,
        WorkflowKind::Clear,
        WorkflowKind::Export,
    ];

    fn index(self) -> usize {
        match self {
            WorkflowKind::Fetch => 0,
            WorkflowKind::Upload => 1,
            WorkflowKind::Clear => 2,
            WorkflowKind::Export => 3,
        }
    }

    /// Upload и Clear меняют датасет и не могут выполняться одновременно
    pub fn is_mutating(self) -> bool {
        matches!(self, WorkflowKind::Upload | WorkflowKind::Clear)
    }

    /// Сообщение статуса на время выполнения
    fn progress_text(self) -> Option<&'static str> {
        match self {
            WorkflowKind::Fetch => None,
            WorkflowKind::Upload => Some("Analyzing files..."),
            WorkflowKind::Clear => Some("Clearing session data..."),
            WorkflowKind::Export => Some("Generating report..."),
        }
    }
}

/// Страница, запустившая процесс (page_id); её размонтирование отменяет только её запросы
pub type ViewId = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }
}

/// Билет запроса: поколение внутри своего процесса + глобальный порядковый номер
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    kind: WorkflowKind,
    generation: u64,
    seq: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }
}

/// Результат применения завершения запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Запрос вытеснен более новым или отменён: состояние не тронуто
    Stale,
}

pub const MSG_UPLOAD_OK: &str = "Upload successful!";
pub const MSG_CLEAR_OK: &str = "Session data cleared.";
pub const MSG_EXPORT_OK: &str = "Report downloaded.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    dataset: Option<DashboardDataset>,
    selected_area: String,
    status: Option<StatusMessage>,
    busy: [bool; 4],
    owners: [Option<ViewId>; 4],
    generations: [u64; 4],
    next_seq: u64,
    /// Номер запроса, чей результат сейчас опубликован
    published_seq: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- чтение ----

    pub fn dataset(&self) -> Option<&DashboardDataset> {
        self.dataset.as_ref()
    }

    /// Есть что показывать: пустая форма ответа (ещё ничего не загружено)
    /// равнозначна отсутствию датасета
    pub fn has_data(&self) -> bool {
        self.dataset.as_ref().map_or(false, |d| !d.is_empty())
    }

    pub fn selected_area(&self) -> &str {
        &self.selected_area
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_busy(&self, kind: WorkflowKind) -> bool {
        self.busy[kind.index()]
    }

    /// Идёт загрузка или очистка: кнопки обоих процессов заблокированы
    pub fn is_mutating(&self) -> bool {
        self.is_busy(WorkflowKind::Upload) || self.is_busy(WorkflowKind::Clear)
    }

    pub fn area_keys(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(DashboardDataset::area_keys)
            .unwrap_or_default()
    }

    // ---- переходы ----

    /// `idle -> busy(kind)`. Возвращает `None`, если процесс сейчас запрещён:
    /// второй Upload/Clear во время первого или повторный Export.
    /// Fetch разрешён всегда и вытесняет предыдущий Fetch.
    /// Upload/Clear вытесняют незавершённый Fetch: его ответ описывает состояние до изменения.
    pub fn begin(&mut self, kind: WorkflowKind, owner: ViewId) -> Option<RequestTicket> {
        if kind.is_mutating() && self.is_mutating() {
            log::debug!("{:?} ignored: another mutating workflow is in flight", kind);
            return None;
        }
        if kind == WorkflowKind::Export && self.is_busy(kind) {
            log::debug!("Export ignored: already exporting");
            return None;
        }

        if kind.is_mutating() {
            self.supersede_fetch(kind);
        }

        let idx = kind.index();
        self.generations[idx] += 1;
        self.next_seq += 1;
        self.busy[idx] = true;
        self.owners[idx] = Some(owner);

        if let Some(text) = kind.progress_text() {
            self.status = Some(StatusMessage::info(text));
        }

        let ticket = RequestTicket {
            kind,
            generation: self.generations[idx],
            seq: self.next_seq,
        };
        log::debug!("begin {:?} (gen {}, seq {})", kind, ticket.generation, ticket.seq);
        Some(ticket)
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let idx = ticket.kind.index();
        self.busy[idx] && self.generations[idx] == ticket.generation
    }

    /// `busy -> idle` для актуального билета
    fn settle(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            log::warn!(
                "Discarding stale {:?} completion (gen {}, current {})",
                ticket.kind,
                ticket.generation,
                self.generations[ticket.kind.index()]
            );
            return false;
        }
        self.release(ticket.kind);
        true
    }

    fn release(&mut self, kind: WorkflowKind) {
        let idx = kind.index();
        self.busy[idx] = false;
        self.owners[idx] = None;
    }

    /// Билет процесса `kind` становится устаревшим, сообщение о его ходе снимается
    fn invalidate(&mut self, kind: WorkflowKind) {
        self.generations[kind.index()] += 1;
        self.release(kind);
        let showing_progress = match (kind.progress_text(), &self.status) {
            (Some(text), Some(status)) => status.severity == Severity::Info && status.text == text,
            _ => false,
        };
        if showing_progress {
            self.status = None;
        }
    }

    fn supersede_fetch(&mut self, by: WorkflowKind) {
        if self.is_busy(WorkflowKind::Fetch) {
            log::debug!("In-flight Fetch superseded by {:?}", by);
            self.invalidate(WorkflowKind::Fetch);
        }
    }

    /// Полная замена датасета; выбранная область пересчитывается до публикации.
    /// Fetch не перекрывает уже опубликованный более новый результат.
    /// Результат Upload/Clear публикуется всегда: это состояние сервера после изменения.
    fn publish(&mut self, ticket: &RequestTicket, dataset: DashboardDataset) -> bool {
        if !ticket.kind.is_mutating() && ticket.seq < self.published_seq {
            log::warn!(
                "Dropping {:?} result: a newer dataset (seq {}) is already published",
                ticket.kind,
                self.published_seq
            );
            return false;
        }
        self.selected_area = reconcile_selection(&self.selected_area, &dataset.area_keys());
        self.dataset = Some(dataset);
        self.published_seq = self.published_seq.max(ticket.seq);
        if ticket.kind.is_mutating() {
            self.supersede_fetch(ticket.kind);
        }
        true
    }

    pub fn finish_fetch(
        &mut self,
        ticket: RequestTicket,
        result: Result<DashboardDataset, DashboardError>,
    ) -> Completion {
        if !self.settle(&ticket) {
            return Completion::Stale;
        }
        match result {
            Ok(dataset) => {
                if !self.publish(&ticket, dataset) {
                    return Completion::Stale;
                }
            }
            Err(DashboardError::Cancelled) => return Completion::Stale,
            Err(e) => {
                log::error!("Fetch failed: {}", e);
                // Уже показанный датасет не подменяем; если его не было: остаётся пусто
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
        Completion::Applied
    }

    pub fn finish_upload(
        &mut self,
        ticket: RequestTicket,
        result: Result<DashboardDataset, DashboardError>,
    ) -> Completion {
        if !self.settle(&ticket) {
            return Completion::Stale;
        }
        match result {
            Ok(dataset) => {
                if !self.publish(&ticket, dataset) {
                    return Completion::Stale;
                }
                self.status = Some(StatusMessage::success(MSG_UPLOAD_OK));
            }
            Err(DashboardError::Cancelled) => return Completion::Stale,
            Err(e) => {
                log::error!("Upload failed: {}", e);
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
        Completion::Applied
    }

    /// Очистка применяется только после подтверждения сервера
    pub fn finish_clear(
        &mut self,
        ticket: RequestTicket,
        result: Result<(), DashboardError>,
    ) -> Completion {
        if !self.settle(&ticket) {
            return Completion::Stale;
        }
        match result {
            Ok(()) => {
                self.dataset = None;
                self.selected_area.clear();
                self.published_seq = self.published_seq.max(ticket.seq);
                self.supersede_fetch(ticket.kind);
                self.status = Some(StatusMessage::success(MSG_CLEAR_OK));
            }
            Err(DashboardError::Cancelled) => return Completion::Stale,
            Err(e) => {
                log::error!("Clear failed: {}", e);
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
        Completion::Applied
    }

    pub fn finish_export(
        &mut self,
        ticket: RequestTicket,
        result: Result<(), DashboardError>,
    ) -> Completion {
        if !self.settle(&ticket) {
            return Completion::Stale;
        }
        match result {
            Ok(()) => self.status = Some(StatusMessage::success(MSG_EXPORT_OK)),
            Err(DashboardError::Cancelled) => return Completion::Stale,
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
        Completion::Applied
    }

    /// Ошибка, пойманная до сетевого вызова
    pub fn reject(&mut self, error: DashboardError) {
        log::warn!("{} rejected locally: {}", error.kind(), error);
        self.status = Some(StatusMessage::error(error.to_string()));
    }

    /// Незавершённые запросы страницы `owner` становятся устаревшими (уход со страницы).
    /// Запросы других открытых страниц продолжаются.
    pub fn cancel_owned(&mut self, owner: ViewId) {
        for kind in WorkflowKind::ALL {
            let idx = kind.index();
            if self.busy[idx] && self.owners[idx] == Some(owner) {
                log::debug!("Cancelling in-flight {:?} of {}", kind, owner);
                self.invalidate(kind);
            }
        }
    }

    /// Выбор области из текущего набора ключей; чужой ключ игнорируется
    pub fn select_area(&mut self, area: &str) -> bool {
        let known = self
            .dataset
            .as_ref()
            .and_then(|d| d.top_medicines_by_area.as_ref())
            .map_or(false, |m| m.contains_key(area));
        if known {
            self.selected_area = area.to_string();
        }
        known
    }

    pub fn dismiss_status(&mut self) {
        self.status = None;
    }
}

/// Выбранная область после смены набора ключей: прежняя, если она ещё есть,
/// иначе первая по порядку ответа; пустой набор: пустая строка.
pub fn reconcile_selection(previous: &str, keys: &[String]) -> String {
    if keys.iter().any(|k| k == previous) {
        return previous.to_string();
    }
    keys.first().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d400_sales_analytics::{LabeledSeries, OrderedMap};

    const VIEW: ViewId = "d400_sales_analytics--dashboard";
    const OTHER_VIEW: ViewId = "d400_sales_analytics--analytics";

    fn dataset_with_areas(areas: &[&str]) -> DashboardDataset {
        let mut map = OrderedMap::new();
        for area in areas {
            map.insert(*area, LabeledSeries::new(vec!["X".into()], vec![1.0]));
        }
        DashboardDataset {
            total_records: 1,
            top_medicines_by_area: Some(map),
            ..DashboardDataset::default()
        }
    }

    #[test]
    fn test_upload_selects_first_area() {
        let mut store = SessionStore::new();
        let ticket = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        assert!(store.is_busy(WorkflowKind::Upload));

        let outcome = store.finish_upload(ticket, Ok(dataset_with_areas(&["East", "West"])));
        assert_eq!(outcome, Completion::Applied);
        assert_eq!(store.selected_area(), "East");
        assert!(!store.is_busy(WorkflowKind::Upload));
        assert_eq!(store.status(), Some(&StatusMessage::success(MSG_UPLOAD_OK)));
    }

    #[test]
    fn test_selection_kept_when_still_present() {
        let mut store = SessionStore::new();
        let t = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        store.finish_upload(t, Ok(dataset_with_areas(&["East", "West"])));
        assert!(store.select_area("West"));

        let t = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        store.finish_fetch(t, Ok(dataset_with_areas(&["North", "West"])));
        assert_eq!(store.selected_area(), "West");

        let t = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        store.finish_fetch(t, Ok(dataset_with_areas(&["South"])));
        assert_eq!(store.selected_area(), "South");
    }

    #[test]
    fn test_select_unknown_area_is_ignored() {
        let mut store = SessionStore::new();
        let t = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        store.finish_fetch(t, Ok(dataset_with_areas(&["East"])));
        assert!(!store.select_area("Atlantis"));
        assert_eq!(store.selected_area(), "East");
    }

    #[test]
    fn test_second_mutating_workflow_is_noop() {
        let mut store = SessionStore::new();
        let _upload = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        assert!(store.begin(WorkflowKind::Upload, VIEW).is_none());
        assert!(store.begin(WorkflowKind::Clear, VIEW).is_none());
        // чтение и экспорт не блокируются
        assert!(store.begin(WorkflowKind::Fetch, VIEW).is_some());
        assert!(store.begin(WorkflowKind::Export, VIEW).is_some());
        assert!(store.begin(WorkflowKind::Export, VIEW).is_none());
    }

    #[test]
    fn test_failed_clear_keeps_dataset() {
        let mut store = SessionStore::new();
        let t = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        store.finish_upload(t, Ok(dataset_with_areas(&["East"])));

        let t = store.begin(WorkflowKind::Clear, VIEW).unwrap();
        // до подтверждения сервера датасет на месте
        assert!(store.dataset().is_some());
        store.finish_clear(t, Err(DashboardError::Clear("boom".into())));

        assert!(store.dataset().is_some());
        assert_eq!(store.selected_area(), "East");
        assert_eq!(store.status(), Some(&StatusMessage::error("boom")));
    }

    #[test]
    fn test_clear_without_dataset_is_idempotent() {
        let mut store = SessionStore::new();
        let t = store.begin(WorkflowKind::Clear, VIEW).unwrap();
        assert_eq!(store.finish_clear(t, Ok(())), Completion::Applied);
        assert!(store.dataset().is_none());
        assert_eq!(store.selected_area(), "");
    }

    #[test]
    fn test_superseded_fetch_is_discarded() {
        let mut store = SessionStore::new();
        let slow = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        let fast = store.begin(WorkflowKind::Fetch, VIEW).unwrap();

        assert_eq!(
            store.finish_fetch(fast, Ok(dataset_with_areas(&["New"]))),
            Completion::Applied
        );
        assert_eq!(
            store.finish_fetch(slow, Ok(dataset_with_areas(&["Old"]))),
            Completion::Stale
        );
        assert_eq!(store.area_keys(), vec!["New"]);
    }

    #[test]
    fn test_older_fetch_does_not_overwrite_newer_upload() {
        let mut store = SessionStore::new();
        let fetch = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        let upload = store.begin(WorkflowKind::Upload, VIEW).unwrap();

        store.finish_upload(upload, Ok(dataset_with_areas(&["Uploaded"])));
        assert_eq!(
            store.finish_fetch(fetch, Ok(dataset_with_areas(&["Stale"]))),
            Completion::Stale
        );
        assert_eq!(store.area_keys(), vec!["Uploaded"]);
        assert!(!store.is_busy(WorkflowKind::Fetch));
    }

    #[test]
    fn test_upload_finishing_after_later_fetch_is_published() {
        let mut store = SessionStore::new();
        let upload = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        let fetch = store.begin(WorkflowKind::Fetch, VIEW).unwrap();

        assert_eq!(
            store.finish_fetch(fetch, Ok(dataset_with_areas(&["PreUpload"]))),
            Completion::Applied
        );
        assert_eq!(
            store.finish_upload(upload, Ok(dataset_with_areas(&["Uploaded"]))),
            Completion::Applied
        );
        assert_eq!(store.area_keys(), vec!["Uploaded"]);
        assert_eq!(store.selected_area(), "Uploaded");
        assert_eq!(store.status(), Some(&StatusMessage::success(MSG_UPLOAD_OK)));
        assert!(!store.is_mutating());
    }

    #[test]
    fn test_fetch_begun_during_upload_is_superseded_by_its_result() {
        let mut store = SessionStore::new();
        let upload = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        let fetch = store.begin(WorkflowKind::Fetch, VIEW).unwrap();

        store.finish_upload(upload, Ok(dataset_with_areas(&["Uploaded"])));
        assert!(!store.is_busy(WorkflowKind::Fetch));
        assert_eq!(
            store.finish_fetch(fetch, Ok(dataset_with_areas(&["PreUpload"]))),
            Completion::Stale
        );
        assert_eq!(store.area_keys(), vec!["Uploaded"]);
    }

    #[test]
    fn test_fetch_started_before_clear_does_not_resurrect() {
        let mut store = SessionStore::new();
        let fetch = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        let clear = store.begin(WorkflowKind::Clear, VIEW).unwrap();
        store.finish_clear(clear, Ok(()));
        store.finish_fetch(fetch, Ok(dataset_with_areas(&["Old"])));
        assert!(store.dataset().is_none());
    }

    #[test]
    fn test_cancel_owned_discards_completions_and_progress() {
        let mut store = SessionStore::new();
        let t = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        assert_eq!(store.status(), Some(&StatusMessage::info("Analyzing files...")));

        store.cancel_owned(VIEW);
        assert!(!store.is_mutating());
        assert_eq!(store.status(), None);
        assert_eq!(
            store.finish_upload(t, Ok(dataset_with_areas(&["East"]))),
            Completion::Stale
        );
        assert!(store.dataset().is_none());
        assert_eq!(store.status(), None);
    }

    #[test]
    fn test_cancel_owned_keeps_other_view_workflows() {
        let mut store = SessionStore::new();
        let upload = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        let fetch = store.begin(WorkflowKind::Fetch, OTHER_VIEW).unwrap();

        store.cancel_owned(OTHER_VIEW);
        assert!(!store.is_busy(WorkflowKind::Fetch));
        assert!(store.is_current(&upload));
        assert_eq!(store.status(), Some(&StatusMessage::info("Analyzing files...")));

        assert_eq!(
            store.finish_fetch(fetch, Ok(dataset_with_areas(&["Old"]))),
            Completion::Stale
        );
        assert_eq!(
            store.finish_upload(upload, Ok(dataset_with_areas(&["East"]))),
            Completion::Applied
        );
        assert_eq!(store.area_keys(), vec!["East"]);
        assert_eq!(store.status(), Some(&StatusMessage::success(MSG_UPLOAD_OK)));
    }

    #[test]
    fn test_cancel_owned_keeps_foreign_error_status() {
        let mut store = SessionStore::new();
        let _export = store.begin(WorkflowKind::Export, VIEW).unwrap();
        store.reject(DashboardError::Validation("Nothing to export".into()));
        store.cancel_owned(VIEW);
        assert_eq!(store.status().map(|s| s.severity), Some(Severity::Error));
    }

    #[test]
    fn test_empty_service_shape_is_not_data() {
        let mut store = SessionStore::new();
        assert!(!store.has_data());
        let t = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        store.finish_fetch(t, Ok(DashboardDataset::empty()));
        assert!(store.dataset().is_some());
        assert!(!store.has_data());

        let t = store.begin(WorkflowKind::Upload, VIEW).unwrap();
        store.finish_upload(t, Ok(dataset_with_areas(&["East"])));
        assert!(store.has_data());
    }

    #[test]
    fn test_failed_initial_fetch_leaves_dataset_absent() {
        let mut store = SessionStore::new();
        let t = store.begin(WorkflowKind::Fetch, VIEW).unwrap();
        store.finish_fetch(t, Err(DashboardError::Fetch("offline".into())));
        assert!(store.dataset().is_none());
        assert_eq!(store.status().map(|s| s.severity), Some(Severity::Error));
    }

    #[test]
    fn test_reconcile_selection() {
        let keys = vec!["A".to_string(), "B".to_string()];
        assert_eq!(reconcile_selection("B", &keys), "B");
        assert_eq!(reconcile_selection("Z", &keys), "A");
        assert_eq!(reconcile_selection("", &keys), "A");
        assert_eq!(reconcile_selection("A", &[]), "");
    }
}
