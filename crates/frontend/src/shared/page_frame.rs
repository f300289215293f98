//! PageFrame: root wrapper for every routed page.
//!
//! Puts `id="{entity}--{category}"` and `data-page-category` on the root element
//! and renders the standard header (title, optional subtitle).

use super::page_standard::*;
use leptos::prelude::*;

#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`, e.g. `"d400_sales_analytics--dashboard"`.
    page_id: &'static str,
    /// One of the PAGE_CAT_* constants from `page_standard`.
    category: &'static str,
    #[prop(into)] title: String,
    #[prop(optional, into)] subtitle: MaybeProp<String>,
    children: Children,
) -> impl IntoView {
    debug_assert!(is_valid_page_id(page_id), "bad page id: {page_id}");
    debug_assert!(is_known_category(category), "bad page category: {category}");
    let class = match category {
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        PAGE_CAT_USECASE => "page page--usecase",
        _ => "page",
    };

    view! {
        <div id=page_id class=class data-page-category=category>
            <div class="page__header">
                <div class="page__header-text">
                    <h1 class="page__title">{title}</h1>
                    {move || subtitle.get().map(|s| view! {
                        <div class="page__subtitle">{s}</div>
                    })}
                </div>
            </div>
            <div class="page__content">
                {children()}
            </div>
        </div>
    }
}
