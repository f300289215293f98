//! Форматирование чисел для карточек, осей графиков и списка файлов

/// Компактная сумма в рупиях: `₹1.2M`, `₹45.3K`, `₹512`
pub fn format_currency(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("₹{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("₹{:.1}K", value / 1_000.0)
    } else {
        format!("₹{:.0}", value)
    }
}

/// Подписи делений оси: без валюты, без лишних нулей
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (value / 1_000.0, "K")
    } else {
        (value, "")
    };
    format!("{}{}", trim_decimals(scaled, 1), suffix)
}

/// Целое с разделителем тысяч: `1,234,567`
pub fn format_number_int(value: f64) -> String {
    format_thousands(value.round() as i64)
}

fn format_thousands(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Доля в процентах без дробной части; при нулевом итоге: `0%`
pub fn format_share(value: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{:.0}%", value / total * 100.0)
    } else {
        "0%".to_string()
    }
}

/// Размер файла: `0 Bytes`, `512 Bytes`, `1.5 KB`, `10 MB`
pub fn format_file_size(bytes: f64) -> String {
    if bytes <= 0.0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut scaled = bytes;
    let mut i = 0;
    while scaled >= 1024.0 && i < UNITS.len() - 1 {
        scaled /= 1024.0;
        i += 1;
    }
    format!("{} {}", trim_decimals(scaled, 2), UNITS[i])
}

/// Округление до `decimals` знаков с отбрасыванием хвостовых нулей
fn trim_decimals(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.prec$}", value, prec = decimals);
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
