use crate::layout::center::tabs::Tabs;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::left::sidebar::Sidebar;
use crate::layout::tabs::{tab_label_for_key, DEFAULT_TAB};
use crate::layout::Shell;
use leptos::prelude::*;

#[component]
fn MainLayout() -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    // Initialize router integration. This runs once when the component is created.
    tabs_store.init_router_integration(DEFAULT_TAB, tab_label_for_key);

    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=|| view! { <Tabs /> }.into_any()
        />
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! { <MainLayout /> }
}
