//! Field Widget Component
//!
//! Renders one resolved [`WidgetDescriptor`] as a native control and routes
//! its input through the descriptor's update rule.

use leptos::prelude::*;
use schemaform::widget::{WidgetDescriptor, WidgetKind};
use schemaform::ValueObject;

use super::layout::{date_input_value, input_class};

/// Renders a single field control.
///
/// The control element is created once for the widget's kind; its value,
/// disabled flag, placeholder and error class follow `widget`, so edits
/// never remount it. `current` is the value object the field belongs to
/// (the record, or the row in a list form). Every edit calls `on_change`
/// with a new copy of it.
#[component]
pub fn FieldWidget(
    #[prop(into)] widget: Signal<WidgetDescriptor>,
    #[prop(into)] current: Signal<ValueObject>,
    on_change: Callback<(ValueObject, String)>,
) -> impl IntoView {
    let class = move || widget.with(input_class);
    let disabled = move || widget.with(|w| w.disabled);
    let placeholder = move || widget.with(|w| w.placeholder.clone().unwrap_or_default());
    let text = move || widget.with(WidgetDescriptor::display_text);

    let on_input = move |ev: leptos::ev::Event| {
        let raw = event_target_value(&ev);
        let snapshot = current.get_untracked();
        let handler = widget.get_untracked();
        let changed = handler.apply_change(&snapshot, &raw, |next, key| {
            on_change.run((next, key.to_string()));
        });
        if !changed {
            log::debug!("Input for '{}' did not produce a change", handler.key);
        }
    };

    match widget.with_untracked(|w| w.kind.clone()) {
        WidgetKind::DatePicker { .. } => {
            let value = move || widget.with(|w| date_input_value(w, chrono::Local::now().naive_local()));
            view! {
                <input
                    type="date"
                    class=class
                    title=text
                    prop:value=value
                    disabled=disabled
                    on:change=on_input
                />
            }
            .into_any()
        }
        WidgetKind::TextArea { .. } => {
            let rows = move || {
                widget.with(|w| match w.kind {
                    WidgetKind::TextArea { rows } => rows.to_string(),
                    _ => String::new(),
                })
            };
            view! {
                <textarea
                    class=class
                    placeholder=placeholder
                    disabled=disabled
                    rows=rows
                    prop:value=text
                    on:input=on_input
                />
            }
            .into_any()
        }
        WidgetKind::Select { .. } => {
            let options = Memo::new(move |_| {
                widget.with(|w| match &w.kind {
                    WidgetKind::Select { options } => options.clone(),
                    _ => Vec::new(),
                })
            });
            view! {
                <select class=class prop:value=text disabled=disabled on:change=on_input>
                    {move || {
                        options
                            .get()
                            .into_iter()
                            .map(|opt| {
                                let option_class = if opt.disabled { "select-option-disabled" } else { "" };
                                view! {
                                    <option class=option_class value=opt.id disabled=opt.disabled>
                                        {opt.label}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
            }
            .into_any()
        }
        WidgetKind::TextInput { mode } => view! {
            <input
                type=mode.as_str()
                class=class
                placeholder=placeholder
                disabled=disabled
                prop:value=text
                on:input=on_input
            />
        }
        .into_any(),
        WidgetKind::Number { .. } => {
            let min = move || {
                widget.with(|w| match w.kind {
                    WidgetKind::Number { minimum } => minimum.map(|m| m.to_string()),
                    _ => None,
                })
            };
            view! {
                <input
                    type="number"
                    placeholder=placeholder
                    disabled=disabled
                    min=min
                    prop:value=text
                    on:input=on_input
                />
            }
            .into_any()
        }
    }
}
