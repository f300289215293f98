use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

const ACTIVE_PARAM: &str = "active";

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
        }
    }

    /// Открывает таб из `?active=` (или `fallback_key`) и дальше держит
    /// параметр в адресной строке синхронным с активным табом
    pub fn init_router_integration(&self, fallback_key: &str, title_for: fn(&str) -> &'static str) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let key = active_key_from_search(&search).unwrap_or_else(|| fallback_key.to_string());
        let title = match title_for(&key) {
            "" => key.clone(),
            label => label.to_string(),
        };
        self.open_tab(&key, &title);

        let this = *self;
        Effect::new(move |_| {
            if let Some(active_key) = this.active.get() {
                let new_url = search_for_active(&active_key);

                let current_search = window()
                    .and_then(|w| w.location().search().ok())
                    .unwrap_or_default();

                if current_search != new_url {
                    if let Some(w) = window() {
                        if let Ok(history) = w.history() {
                            let _ = history.replace_state_with_url(
                                &wasm_bindgen::JsValue::NULL,
                                "",
                                Some(&new_url),
                            );
                        }
                    }
                }
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        log::debug!("open_tab: key='{}', title='{}'", key, title);
        let exists = self
            .opened
            .with_untracked(|tabs| tabs.iter().any(|tab| tab.key == key));
        if !exists {
            let tab = Tab {
                key: key.to_string(),
                title: title.to_string(),
            };
            self.opened.update(|tabs| tabs.push(tab));
        }
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    /// Закрытие таба размонтирует страницу; её незавершённые запросы отменяются
    pub fn close_tab(&self, key: &str) {
        log::debug!("close_tab: key='{}'", key);
        self.opened.update(|tabs| tabs.retain(|tab| tab.key != key));
        if self
            .active
            .with_untracked(|active| active.as_deref() == Some(key))
        {
            let next_active = self.opened.with_untracked(|tabs| next_active(tabs));
            self.active.set(next_active);
        }
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

pub fn active_key_from_search(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params
        .get(ACTIVE_PARAM)
        .filter(|key| !key.is_empty())
        .cloned()
}

pub fn search_for_active(key: &str) -> String {
    let query = serde_qs::to_string(&HashMap::from([(ACTIVE_PARAM, key)])).unwrap_or_default();
    format!("?{}", query)
}

/// После закрытия активного таба активным становится последний открытый
fn next_active(tabs: &[Tab]) -> Option<String> {
    tabs.last().map(|t| t.key.clone())
}
