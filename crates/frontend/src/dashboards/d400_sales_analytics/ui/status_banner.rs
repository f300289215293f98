use crate::dashboards::d400_sales_analytics::store::{Severity, StatusMessage};
use crate::shared::icons::icon;
use leptos::prelude::*;

/// Сообщение последнего шага рабочего процесса; закрывается вручную
#[component]
pub fn StatusBanner(
    #[prop(into)] status: Signal<Option<StatusMessage>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    move || {
        status.get().map(|msg| {
            let class = match msg.severity {
                Severity::Info => "status-banner status-banner--info",
                Severity::Success => "status-banner status-banner--success",
                Severity::Error => "status-banner status-banner--error",
            };
            view! {
                <div class=class role="status">
                    <span class="status-banner__text">{msg.text}</span>
                    <button
                        class="status-banner__close"
                        title="Dismiss"
                        on:click=move |_| on_dismiss.run(())
                    >
                        {icon("close")}
                    </button>
                </div>
            }
        })
    }
}
