use dioxus::prelude::*;
use notes_core::screens::AddScreen;

use crate::data::MobileNoteStore;
use crate::ui::{ButtonVariant, NoteFields, UiButton};

#[component]
pub fn AddView(store: Signal<Option<MobileNoteStore>>, mut form: Signal<AddScreen>) -> Element {
    let mut saving = use_signal(|| false);
    let draft = form.read().draft.clone();
    let info = form.read().info.clone();

    let on_save = move |_| {
        if saving() {
            return;
        }
        let Some(opened) = store.read().clone() else {
            form.write().info = "Database is not ready yet".to_string();
            return;
        };

        saving.set(true);
        spawn(async move {
            let mut screen = form();
            screen.save(&opened.service).await;
            form.set(screen);
            saving.set(false);
        });
    };

    rsx! {
        div {
            style: "padding: 16px; display: flex; flex-direction: column; gap: 12px;",
            NoteFields {
                subject: draft.subject,
                note_type: draft.note_type,
                content: draft.content,
                on_subject: move |value: String| form.write().draft.subject = value,
                on_type: move |value: String| form.write().draft.note_type = value,
                on_content: move |value: String| form.write().draft.content = value,
            }
            UiButton {
                type: "button",
                block: true,
                variant: ButtonVariant::Primary,
                disabled: saving(),
                onclick: on_save,
                if saving() { "Saving..." } else { "Save" }
            }
            if !info.is_empty() {
                p {
                    class: "muted",
                    style: "margin: 0; font-size: 13px;",
                    "{info}"
                }
            }
        }
    }
}
