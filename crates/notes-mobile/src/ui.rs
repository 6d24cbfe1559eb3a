//! Shared mobile UI primitives with light and dark palettes.

use dioxus::prelude::*;

/// Palette variables plus the button/input/textarea wrappers.
pub const MOBILE_UI_STYLES: &str = r"
.app {
    --bg: #f9fafb;
    --surface: #ffffff;
    --text: #111827;
    --muted: #6b7280;
    --border: #d1d5db;
    --accent: #2563eb;
    min-height: 100vh;
    display: flex;
    flex-direction: column;
    background: var(--bg);
    color: var(--text);
    font-family: sans-serif;
}

.app--dark {
    --bg: #0f172a;
    --surface: #1e293b;
    --text: #f1f5f9;
    --muted: #94a3b8;
    --border: #334155;
    --accent: #60a5fa;
}

.ui-button {
    border-radius: 10px;
    padding: 10px 12px;
    font-size: 13px;
    font-weight: 600;
    border: 1px solid transparent;
    transition: background-color 120ms ease, color 120ms ease, border-color 120ms ease;
}

.ui-button:disabled {
    opacity: 0.55;
}

.ui-button--block {
    width: 100%;
}

.ui-button--primary {
    background: var(--accent);
    color: #ffffff;
    border-color: var(--accent);
}

.ui-button--outline {
    background: var(--surface);
    color: var(--text);
    border-color: var(--border);
}

.ui-button--ghost {
    background: transparent;
    color: var(--text);
}

.ui-button--danger {
    background: #dc2626;
    color: #ffffff;
    border-color: #dc2626;
}

.ui-input,
.ui-textarea {
    width: 100%;
    box-sizing: border-box;
    border: 1px solid var(--border);
    border-radius: 10px;
    padding: 10px 12px;
    font-size: 14px;
    background: var(--surface);
    color: var(--text);
}

.ui-textarea {
    min-height: 160px;
    resize: none;
}

.note-card {
    background: var(--surface);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 12px 14px;
    display: flex;
    flex-direction: column;
    gap: 4px;
    text-align: left;
}

.muted {
    color: var(--muted);
}
";

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Outline,
    Ghost,
    Danger,
}

impl ButtonVariant {
    const fn class(self) -> &'static str {
        match self {
            Self::Primary => "ui-button--primary",
            Self::Outline => "ui-button--outline",
            Self::Ghost => "ui-button--ghost",
            Self::Danger => "ui-button--danger",
        }
    }
}

#[component]
pub fn UiButton(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] block: bool,
    #[props(default)] disabled: bool,
    onclick: Option<EventHandler<MouseEvent>>,
    #[props(extends = GlobalAttributes)]
    #[props(extends = button)]
    attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let mut class_name = format!("ui-button {}", variant.class());
    if block {
        class_name.push_str(" ui-button--block");
    }

    rsx! {
        button {
            class: "{class_name}",
            disabled,
            onclick: move |event| {
                if let Some(handler) = &onclick {
                    handler.call(event);
                }
            },
            ..attributes,
            {children}
        }
    }
}

#[component]
pub fn UiInput(
    oninput: Option<EventHandler<FormEvent>>,
    #[props(extends = GlobalAttributes)]
    #[props(extends = input)]
    attributes: Vec<Attribute>,
) -> Element {
    rsx! {
        input {
            class: "ui-input",
            oninput: move |event| _ = oninput.map(|handler| handler(event)),
            ..attributes,
        }
    }
}

#[component]
pub fn UiTextarea(
    oninput: Option<EventHandler<FormEvent>>,
    #[props(extends = GlobalAttributes)]
    #[props(extends = textarea)]
    attributes: Vec<Attribute>,
) -> Element {
    rsx! {
        textarea {
            class: "ui-textarea",
            oninput: move |event| _ = oninput.map(|handler| handler(event)),
            ..attributes,
        }
    }
}

/// Labelled subject/type/content form shared by the add and edit screens.
#[component]
pub fn NoteFields(
    subject: String,
    note_type: String,
    content: String,
    on_subject: EventHandler<String>,
    on_type: EventHandler<String>,
    on_content: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 10px;",
            UiInput {
                placeholder: "Subject",
                value: "{subject}",
                oninput: move |event: FormEvent| on_subject.call(event.value()),
            }
            UiInput {
                placeholder: "Type",
                value: "{note_type}",
                oninput: move |event: FormEvent| on_type.call(event.value()),
            }
            UiTextarea {
                placeholder: "Content",
                value: "{content}",
                oninput: move |event: FormEvent| on_content.call(event.value()),
            }
        }
    }
}
