//! Конфигурация клиента: единственная внешняя точка: адрес сервиса аналитики.
//!
//! Порядок приоритета:
//! 1. `<meta name="sales-api-base" content="...">` в index.html (runtime)
//! 2. переменная окружения `SALES_API_BASE` на этапе сборки
//! 3. встроенный конфиг по умолчанию
//!
//! Пустой `base_url` означает "тот же хост, порт 8000".

use once_cell::sync::OnceCell;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub upload_mode: UploadMode,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UiConfig {
    /// Через сколько мс сбрасывать сообщение об успешной загрузке отчётов
    #[serde(default = "default_status_dismiss_ms")]
    pub status_dismiss_ms: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_dismiss_ms: default_status_dismiss_ms(),
        }
    }
}

fn default_status_dismiss_ms() -> u32 {
    3000
}

/// Какой эндпоинт загрузки использовать
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    /// `POST /api/analyze-session/`: ответ сразу содержит датасет
    #[default]
    Session,
    /// `POST /api/upload/` сохраняет файлы, затем `GET /api/sales-data/`
    Persist,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = ""
upload_mode = "session"

[ui]
status_dismiss_ms = 3000
"#;

const META_NAME: &str = "sales-api-base";

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Конфигурация приложения (читается один раз)
pub fn config() -> &'static Config {
    CONFIG.get_or_init(load_config)
}

fn load_config() -> Config {
    let mut config = match parse_config(DEFAULT_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Embedded config is invalid: {}", e);
            Config {
                api: ApiConfig {
                    base_url: String::new(),
                    upload_mode: UploadMode::default(),
                },
                ui: UiConfig::default(),
            }
        }
    };

    if let Some(base) = option_env!("SALES_API_BASE") {
        config.api.base_url = normalize_base_url(base);
    }
    if let Some(base) = base_url_from_meta() {
        log::info!("Using API base from <meta name=\"{}\">: {}", META_NAME, base);
        config.api.base_url = normalize_base_url(&base);
    }
    config
}

pub fn parse_config(source: &str) -> Result<Config, toml::de::Error> {
    let mut config: Config = toml::from_str(source)?;
    config.api.base_url = normalize_base_url(&config.api.base_url);
    Ok(config)
}

/// Убирает пробелы и завершающий `/`, чтобы пути можно было просто склеивать
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn base_url_from_meta() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document
        .query_selector(&format!("meta[name=\"{}\"]", META_NAME))
        .ok()??;
    meta.get_attribute("content")
        .filter(|content| !content.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.api.base_url, "");
        assert_eq!(config.api.upload_mode, UploadMode::Session);
        assert_eq!(config.ui.status_dismiss_ms, 3000);
    }

    #[test]
    fn test_persist_mode_and_trailing_slash() {
        let config = parse_config(
            r#"
            [api]
            base_url = "https://analytics.example.com/ "
            upload_mode = "persist"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://analytics.example.com");
        assert_eq!(config.api.upload_mode, UploadMode::Persist);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_unknown_upload_mode_is_rejected() {
        assert!(parse_config("[api]\nupload_mode = \"batch\"\n").is_err());
    }
}
