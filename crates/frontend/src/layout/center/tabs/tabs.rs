use crate::layout::center::tabs::tab::Tab as TabComponent;
use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::layout::tabs::TabPage;
use leptos::prelude::*;

/// Полоса табов и контент всех открытых табов
#[component]
pub fn Tabs() -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    view! {
        <div class="tabs-container">
            <div class="tabs-bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab| {
                        view! { <TabComponent tab=tab /> }
                    }
                />
            </div>
            <div class="tab-content">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab: TabData| {
                        view! { <TabPage tab=tab tabs_store=tabs_store /> }
                    }
                />
                {move || tabs_store.opened.with(|tabs| tabs.is_empty()).then(|| view! {
                    <div class="placeholder">"Choose a page in the sidebar"</div>
                })}
            </div>
        </div>
    }
}
