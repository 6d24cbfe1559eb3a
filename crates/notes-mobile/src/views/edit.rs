use dioxus::prelude::*;
use dioxus_primitives::toast::{use_toast, ToastOptions};
use notes_core::screens::{EditScreen, NotesApp};

use crate::data::MobileNoteStore;
use crate::ui::{ButtonVariant, NoteFields, UiButton};

#[component]
pub fn EditView(
    store: Signal<Option<MobileNoteStore>>,
    mut nav: Signal<NotesApp>,
    mut form: Signal<EditScreen>,
) -> Element {
    let mut busy = use_signal(|| false);
    let toasts = use_toast();
    let draft = form.read().draft.clone();
    let info = form.read().info.clone();

    let on_save = move |_| {
        if busy() {
            return;
        }
        let Some(opened) = store.read().clone() else {
            return;
        };
        busy.set(true);
        spawn(async move {
            let mut screen = form();
            if screen.save(&opened.service).await {
                toasts.success(screen.info.clone(), ToastOptions::new());
                nav.write().back();
            }
            form.set(screen);
            busy.set(false);
        });
    };

    let on_delete = move |_| {
        if busy() {
            return;
        }
        let Some(opened) = store.read().clone() else {
            return;
        };
        busy.set(true);
        spawn(async move {
            let mut screen = form();
            if screen.delete(&opened.service).await {
                toasts.info(screen.info.clone(), ToastOptions::new());
                nav.write().back();
            }
            form.set(screen);
            busy.set(false);
        });
    };

    rsx! {
        div {
            style: "padding: 16px; display: flex; flex-direction: column; gap: 12px;",
            div {
                style: "display: flex; gap: 8px;",
                UiButton {
                    type: "button",
                    variant: ButtonVariant::Outline,
                    onclick: move |_| nav.write().back(),
                    "Back"
                }
                UiButton {
                    type: "button",
                    variant: ButtonVariant::Danger,
                    style: "margin-left: auto;",
                    disabled: busy(),
                    onclick: on_delete,
                    "Delete"
                }
            }
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
                disabled: busy(),
                onclick: on_save,
                if busy() { "Saving..." } else { "Save changes" }
            }
            p {
                class: "muted",
                style: "margin: 0; font-size: 12px;",
                "Shake the phone to delete this note"
            }
            if !info.is_empty() {
                p {
                    style: "margin: 0; font-size: 13px;",
                    "{info}"
                }
            }
        }
    }
}
