//! Проверка и накопление файлов перед отправкой отчётов

use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: [&str; 7] = [".pdf", ".docx", ".doc", ".xlsx", ".xls", ".txt", ".csv"];
pub const MAX_FILE_SIZE_BYTES: f64 = 10.0 * 1024.0 * 1024.0;

pub const MSG_SELECT_FILES: &str = "Please select files to upload";

/// Расширение с точкой в нижнем регистре; имя без точки целиком считается расширением
pub fn extension_of(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    format!(".{}", last.to_lowercase())
}

pub fn validate_file(name: &str, size: f64) -> Result<(), String> {
    let ext = extension_of(name);
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(format!(
            "File type {} not allowed. Allowed types: {}",
            ext,
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }
    if size > MAX_FILE_SIZE_BYTES {
        return Err("File size too large. Maximum size: 10MB".to_string());
    }
    Ok(())
}

pub fn upload_success_message(count: usize) -> String {
    format!("Successfully uploaded {} file(s)", count)
}

pub fn upload_failure_message(reason: &str) -> String {
    format!("Upload failed: {}", reason)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile<F> {
    pub id: Uuid,
    pub name: String,
    pub size: f64,
    pub handle: F,
}

/// Очередь файлов, ожидающих отправки
#[derive(Debug, Clone, PartialEq)]
pub struct UploadQueue<F> {
    files: Vec<StagedFile<F>>,
}

impl<F> Default for UploadQueue<F> {
    fn default() -> Self {
        Self { files: Vec::new() }
    }
}

impl<F> UploadQueue<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет прошедшие проверку файлы; для отклонённых возвращает
    /// строки вида `"{name}: {причина}"`
    pub fn stage(&mut self, candidates: impl IntoIterator<Item = (String, f64, F)>) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, size, handle) in candidates {
            match validate_file(&name, size) {
                Ok(()) => self.files.push(StagedFile {
                    id: Uuid::new_v4(),
                    name,
                    size,
                    handle,
                }),
                Err(reason) => errors.push(format!("{}: {}", name, reason)),
            }
        }
        errors
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        self.files.len() != before
    }

    pub fn reset(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedFile<F>> {
        self.files.iter()
    }
}

impl<F: Clone> UploadQueue<F> {
    pub fn handles(&self) -> Vec<F> {
        self.files.iter().map(|f| f.handle.clone()).collect()
    }
}
