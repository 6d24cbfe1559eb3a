use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions, ToastProvider};
use notes_core::screens::{delete_note, AddScreen, EditScreen, ListScreen, NotesApp, Screen};
use notes_core::store::SubscriptionEvent;

use crate::config::load_runtime_config;
use crate::data::MobileNoteStore;
use crate::device::forward_device_sensors;
use crate::sensors::{self, SensorBridge, UiSignal};
use crate::ui::{ButtonVariant, UiButton, MOBILE_UI_STYLES};
use crate::views::{AddView, EditView, ListView};

const TOAST_STYLES: &str = r"
.toast-container {
    position: fixed;
    inset: auto 12px 72px 12px;
    z-index: 9999;
    pointer-events: none;
}
.toast-list {
    margin: 0;
    padding: 0;
    list-style: none;
    display: flex;
    flex-direction: column;
    gap: 8px;
}
.toast {
    pointer-events: auto;
    border-radius: 10px;
    border: 1px solid var(--border);
    background: var(--surface);
    color: var(--text);
    padding: 10px 12px;
}
.toast[data-type='success'] { border-color: #10b981; }
.toast[data-type='error'] { border-color: #ef4444; }
.toast-title { font-size: 13px; font-weight: 700; }
.toast-description { font-size: 12px; color: var(--muted); margin-top: 2px; }
";

#[component]
pub fn App() -> Element {
    rsx! {
        ToastProvider {
            AppShell {}
        }
    }
}

#[component]
fn AppShell() -> Element {
    let config = use_hook(load_runtime_config);
    let mut store = use_signal(|| None::<MobileNoteStore>);
    let mut init_error = use_signal(|| None::<String>);
    let mut init_retry_version = use_signal(|| 0u64);
    let mut navigation = use_signal(NotesApp::new);
    let add_form = use_signal(AddScreen::new);
    let mut list = use_signal(ListScreen::new);
    let mut edit_form = use_signal(EditScreen::default);
    let mut dark = use_signal(|| false);
    let toasts = use_toast();

    use_future(forward_device_sensors);

    let init_config = config.clone();
    use_future(move || {
        let config = init_config.clone();
        async move {
            let _retry = init_retry_version();
            init_error.set(None);
            match MobileNoteStore::open(&config).await {
                Ok(opened) => {
                    toasts.info(opened.mode.describe(), ToastOptions::new());
                    store.set(Some(opened));
                }
                Err(error) => {
                    tracing::error!("Failed to open note store: {}", error);
                    init_error.set(Some(error.to_string()));
                }
            }
        }
    });

    // Live list: restarts whenever the store is (re)opened.
    use_future(move || async move {
        let Some(opened) = store() else {
            return;
        };
        list.set(ListScreen::new());
        let mut subscription = match opened.service.subscribe().await {
            Ok(subscription) => subscription,
            Err(error) => {
                list.write()
                    .apply(SubscriptionEvent::Cancelled(error.to_string()));
                return;
            }
        };
        while let Some(event) = subscription.next().await {
            if let SubscriptionEvent::Cancelled(reason) = &event {
                tracing::warn!("Note listener cancelled: {}", reason);
                toasts.error(
                    "Live updates stopped".to_string(),
                    ToastOptions::new().description(reason.clone()),
                );
            }
            list.write().apply(event);
        }
    });

    let sensor_config = config;
    use_future(move || {
        let config = sensor_config.clone();
        async move {
            let Some(mut events) = sensors::take_events() else {
                tracing::warn!("Sensor events are already being consumed");
                return;
            };
            let mut bridge = SensorBridge::new(&config);
            dark.set(bridge.is_dark());

            while let Some(event) = events.recv().await {
                match bridge.handle(event) {
                    Some(UiSignal::Theme { dark: value }) => dark.set(value),
                    Some(UiSignal::Shake) => {
                        let Some(opened) = store.peek().clone() else {
                            continue;
                        };
                        let Some(id) = navigation.write().take_shake_target() else {
                            continue;
                        };
                        edit_form.set(EditScreen::default());
                        tracing::info!("Shake detected, deleting note {id}");
                        let (info, _) = delete_note(&opened.service, Some(&id)).await;
                        toasts.info(info, ToastOptions::new());
                    }
                    None => {}
                }
            }
        }
    });

    let screen = navigation.read().screen();
    let app_class = if dark() { "app app--dark" } else { "app" };
    let title = match screen {
        Screen::Add => "Add note",
        Screen::List => "Notes",
        Screen::Edit => "Edit note",
    };

    rsx! {
        style { "{MOBILE_UI_STYLES}" }
        style { "{TOAST_STYLES}" }
        div {
            class: "{app_class}",
            header {
                style: "padding: 14px 16px; font-size: 18px; font-weight: 700; border-bottom: 1px solid var(--border);",
                "{title}"
            }

            if let Some(error) = init_error() {
                div {
                    style: "flex: 1; padding: 20px; display: flex; flex-direction: column; gap: 10px;",
                    p { style: "margin: 0; font-weight: 600;", "Could not open the notes database" }
                    p { class: "muted", style: "margin: 0; font-size: 12px;", "{error}" }
                    UiButton {
                        type: "button",
                        onclick: move |_| init_retry_version += 1,
                        "Retry"
                    }
                }
            } else {
                div {
                    style: "flex: 1; display: flex; flex-direction: column; overflow: hidden;",
                    {
                        match screen {
                            Screen::Add => rsx! { AddView { store, form: add_form } },
                            Screen::List => rsx! { ListView { store, list, nav: navigation, edit_form } },
                            Screen::Edit => rsx! { EditView { store, nav: navigation, form: edit_form } },
                        }
                    }
                }
            }

            nav {
                style: "display: flex; gap: 8px; padding: 10px 12px; border-top: 1px solid var(--border);",
                UiButton {
                    type: "button",
                    block: true,
                    variant: tab_variant(screen == Screen::Add),
                    onclick: move |_| navigation.write().show_add(),
                    "Add"
                }
                UiButton {
                    type: "button",
                    block: true,
                    variant: tab_variant(screen != Screen::Add),
                    onclick: move |_| navigation.write().show_list(),
                    "List"
                }
            }
        }
    }
}

const fn tab_variant(active: bool) -> ButtonVariant {
    if active {
        ButtonVariant::Primary
    } else {
        ButtonVariant::Ghost
    }
}
