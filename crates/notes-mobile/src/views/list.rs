use dioxus::prelude::*;
use dioxus_primitives::scroll_area::{ScrollArea, ScrollDirection, ScrollType};
use notes_core::screens::{EditScreen, ListScreen, NoteCard, NotesApp, EMPTY_LIST_HINT};
use notes_core::NoteId;

use crate::data::MobileNoteStore;

#[component]
pub fn ListView(
    store: Signal<Option<MobileNoteStore>>,
    list: Signal<ListScreen>,
    mut nav: Signal<NotesApp>,
    mut edit_form: Signal<EditScreen>,
) -> Element {
    let mut open_note = move |id: NoteId| {
        let Some(note) = list.read().find(&id).cloned() else {
            return;
        };
        edit_form.set(EditScreen::open(&note));
        nav.write().open_note(note);

        let Some(opened) = store.read().clone() else {
            return;
        };
        spawn(async move {
            let mut screen = edit_form();
            screen.load(&opened.service).await;
            if edit_form.peek().id() == screen.id() {
                edit_form.set(screen);
            }
        });
    };

    let screen = list.read();
    let cards = screen.cards();

    rsx! {
        ScrollArea {
            direction: ScrollDirection::Vertical,
            scroll_type: ScrollType::Auto,
            tabindex: "0",
            style: "flex: 1; padding: 12px; display: flex; flex-direction: column; gap: 8px;",

            if let Some(error) = screen.error() {
                p {
                    style: "margin: 0; font-size: 12px; color: #ef4444;",
                    "Live updates stopped: {error}"
                }
            }

            if screen.is_loading() {
                p { class: "muted", style: "text-align: center;", "Loading..." }
            } else if screen.is_empty() {
                p { class: "muted", style: "text-align: center; margin-top: 24px;", "{EMPTY_LIST_HINT}" }
            }

            for card in cards {
                {
                    let NoteCard { id, title, type_line, preview } = card;
                    let key = id.as_ref().map_or_else(String::new, ToString::to_string);
                    rsx! {
                        button {
                            key: "{key}",
                            class: "note-card",
                            r#type: "button",
                            onclick: move |_| {
                                if let Some(id) = id.clone() {
                                    open_note(id);
                                }
                            },
                            strong { "{title}" }
                            span { class: "muted", style: "font-size: 12px;", "{type_line}" }
                            p {
                                style: "margin: 4px 0 0 0; white-space: pre-line; font-size: 13px;",
                                "{preview}"
                            }
                        }
                    }
                }
            }
        }
    }
}
