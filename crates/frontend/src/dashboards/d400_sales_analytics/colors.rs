//! Палитра графиков и детерминированный цвет по имени.
//!
//! Порядок палитры фиксирован: `color_for`: сумма кодов символов имени
//! по модулю длины палитры, поэтому одна и та же область всегда получает
//! один и тот же цвет на всех панелях и после каждого обновления данных.

pub const PALETTE: [&str; 12] = [
    "#3b82f6", // blue-500
    "#22c55e", // green-500
    "#f97316", // orange-500
    "#8b5cf6", // violet-500
    "#ec4899", // pink-500
    "#14b8a6", // teal-500
    "#f59e0b", // amber-500
    "#6366f1", // indigo-500
    "#d946ef", // fuchsia-500
    "#0ea5e9", // sky-500
    "#a855f7", // purple-500
    "#ef4444", // red-500
];

/// Цвет синтетического сегмента "Others"
pub const OTHERS_COLOR: &str = "#9ca3af";

/// Цвета тройки лидеров роста на обзорной странице
pub const HIGHLIGHT_COLORS: [&str; 3] = ["#EF4444", "#8B5CF6", "#3B82F6"];

pub fn color_for(name: &str) -> &'static str {
    let sum: u64 = name.chars().map(|c| c as u64).sum();
    PALETTE[(sum % PALETTE.len() as u64) as usize]
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// `#rrggbb` → `rgba(r, g, b, alpha)`; некорректный цвет возвращается как есть
pub fn with_alpha(color: &str, alpha: f64) -> String {
    let hex = color.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return color.to_string();
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
        _ => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_for_is_stable() {
        let first = color_for("North Zone");
        for _ in 0..10 {
            assert_eq!(color_for("North Zone"), first);
        }
    }

    #[test]
    fn test_color_for_is_char_sum_mod_palette() {
        // 'A' = 65, 65 % 12 = 5
        assert_eq!(color_for("A"), PALETTE[5]);
        assert_eq!(color_for(""), PALETTE[0]);
        // перестановка символов не меняет сумму
        assert_eq!(color_for("ab"), color_for("ba"));
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#3b82f6", 0.2), "rgba(59, 130, 246, 0.2)");
        assert_eq!(with_alpha("red", 0.5), "red");
    }
}
