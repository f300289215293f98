//! Page category constants.
//!
//! Every routed page declares:
//!   - HTML `id` in the format `{entity}--{category}` (e.g. `"d400_sales_analytics--dashboard"`)
//!   - `data-page-category` with one of the constants below
//!
//! The `--` separator keeps the entity name searchable: copy the id from
//! the browser DOM Inspector, paste into IDE search, and you land in the
//! `dashboards/d400_sales_analytics/` directory.

/// Analytical dashboard / chart view.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Use-case action page (uploads, imports).
pub const PAGE_CAT_USECASE: &str = "usecase";

/// Fallback pages outside the domain (not found).
pub const PAGE_CAT_SYSTEM: &str = "system";

pub const ALL_CATEGORIES: &[&str] = &[PAGE_CAT_DASHBOARD, PAGE_CAT_USECASE, PAGE_CAT_SYSTEM];

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    let parts: Vec<&str> = id.splitn(2, "--").collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

pub fn is_known_category(cat: &str) -> bool {
    ALL_CATEGORIES.contains(&cat)
}
