//! Tab labels - единственный источник правды для заголовков табов.

/// Возвращает читаемый заголовок таба для данного ключа. Fallback: пустая строка.
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        // ── Dashboards (d4xx) ─────────────────────────────────────────────
        "d400_sales_analytics" => "Dashboard",
        "d400_sales_analytics_charts" => "Analytics",

        // ── Use Cases (u5xx) ──────────────────────────────────────────────
        "u501_report_upload" => "Upload Report",

        // ── Fallback ──────────────────────────────────────────────────────
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tabs::registry::KNOWN_TABS;

    #[test]
    fn test_every_registered_tab_has_label() {
        for key in KNOWN_TABS {
            assert!(!tab_label_for_key(key).is_empty(), "no label for {}", key);
        }
        assert_eq!(tab_label_for_key("unknown"), "");
    }
}
