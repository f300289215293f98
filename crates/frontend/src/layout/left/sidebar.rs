//! Sidebar component with collapsible menu groups

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    items: Vec<(&'static str, &'static str, &'static str)>, // (id, label, icon)
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "dashboards",
            label: "Sales",
            icon: "sales",
            items: vec![
                ("d400_sales_analytics", tab_label_for_key("d400_sales_analytics"), "dashboard"),
                ("d400_sales_analytics_charts", tab_label_for_key("d400_sales_analytics_charts"), "analytics"),
            ],
        },
        MenuGroup {
            id: "reports",
            label: "Reports",
            icon: "file",
            items: vec![
                ("u501_report_upload", tab_label_for_key("u501_report_upload"), "upload"),
            ],
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let groups = get_menu_groups();
    let expanded_groups = RwSignal::new(groups.iter().map(|g| g.id.to_string()).collect::<Vec<_>>());

    view! {
        <div class="app-sidebar__content">
            {groups.into_iter().map(|group| {
                let group_id = group.id.to_string();
                let group_id_for_exp = group_id.clone();
                let group_id_for_show = group_id.clone();
                let items = StoredValue::new(group.items.clone());

                view! {
                    <div>
                        <div
                            class="app-sidebar__item"
                            style:padding-left="12px"
                            on:click=move |_| {
                                let gid = group_id.clone();
                                expanded_groups.update(move |items| {
                                    if let Some(pos) = items.iter().position(|x| x == &gid) {
                                        items.remove(pos);
                                    } else {
                                        items.push(gid);
                                    }
                                });
                            }
                        >
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=move || expanded_groups.with(|g| g.contains(&group_id_for_exp))
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>

                        <Show when=move || expanded_groups.with(|g| g.contains(&group_id_for_show))>
                            <div class="app-sidebar__children">
                                {items.get_value().into_iter().map(|(id, label, icon_name)| {
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || {
                                                ctx.active.with(|a| a.as_deref() == Some(id))
                                            }
                                            style:padding-left="10px"
                                            on:click=move |_| ctx.open_tab(id, label)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(icon_name)}
                                                <span>{label}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tabs::registry::KNOWN_TABS;

    #[test]
    fn test_menu_opens_only_registered_tabs() {
        let ids: Vec<&str> = get_menu_groups()
            .into_iter()
            .flat_map(|g| g.items.into_iter().map(|(id, _, _)| id))
            .collect();
        assert_eq!(ids.len(), KNOWN_TABS.len());
        for id in ids {
            assert!(KNOWN_TABS.contains(&id), "{} is not registered", id);
        }
    }
}
