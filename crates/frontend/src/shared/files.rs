//! Извлечение выбранных пользователем файлов из событий браузера
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement};

fn collect(list: Option<FileList>) -> Vec<File> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Файлы из `<input type="file">`; поле сбрасывается, чтобы повторный
/// выбор того же файла снова вызвал `change`
pub fn files_from_input(ev: &Event) -> Vec<File> {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return Vec::new();
    };
    let files = collect(input.files());
    input.set_value("");
    files
}

pub fn files_from_drop(ev: &DragEvent) -> Vec<File> {
    collect(ev.data_transfer().and_then(|dt| dt.files()))
}
