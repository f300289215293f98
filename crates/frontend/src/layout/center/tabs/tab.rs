use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn Tab(tab: TabData) -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    let key_for_active = tab.key.clone();
    let is_active =
        Memo::new(move |_| tabs_store.active.get().as_deref() == Some(key_for_active.as_str()));

    let key_for_click = tab.key.clone();
    let on_click = move |_| tabs_store.activate_tab(&key_for_click);

    let key_for_close = tab.key.clone();
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key_for_close);
    };

    view! {
        <div class="tab" class:active=is_active on:click=on_click>
            <span>{tab.title}</span>
            <button class="tab-close" title="Close" on:click=on_close>
                {icon("close")}
            </button>
        </div>
    }
}
