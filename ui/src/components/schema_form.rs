//! Single-Record Schema Form Component
//!
//! Renders one labeled row per visible schema property and reports every
//! edit through a single `on_input_change` callback. The form holds no
//! state of its own: the host owns the value and feeds it back in.

use leptos::prelude::*;
use schemaform::record::{FieldRow, RecordForm};
use schemaform::{ErrorMap, FieldConfigs, FormError, FormSettings, SchemaNode, ValueObject};

use super::field_widget::FieldWidget;
use super::layout::widget_shape;

/// Schema-driven form for one record.
///
/// An unsupported property type makes the field list render as an error,
/// which surfaces through the host's `ErrorBoundary`.
#[component]
pub fn SchemaForm(
    /// Object schema whose properties become fields
    #[prop(into)]
    schema: Signal<SchemaNode>,
    /// Current record
    #[prop(into)]
    value: Signal<ValueObject>,
    /// Receives `(next value, changed key)` after every edit
    on_input_change: Callback<(ValueObject, String)>,
    /// Per-field messages, usually from `schemaform::validation::field_errors`
    #[prop(optional)]
    error_messages: Option<Signal<ErrorMap>>,
    #[prop(optional)]
    config: Option<FieldConfigs>,
    #[prop(into, default = false.into())]
    disable_fields: Signal<bool>,
    #[prop(optional, into)]
    form_title: Option<String>,
    #[prop(optional)]
    settings: Option<FormSettings>,
    /// Rendered after the generated fields, e.g. a submit button
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    let config = StoredValue::new(config.unwrap_or_default());
    let settings = StoredValue::new(settings.unwrap_or_default());

    let rows = Memo::new(move |_| -> Result<Vec<FieldRow>, FormError> {
        let schema = schema.get();
        let value = value.get();
        let errors = error_messages.map(|e| e.get()).unwrap_or_default();
        let disable_fields = disable_fields.get();

        config.with_value(|configs| {
            settings.with_value(|settings| {
                RecordForm {
                    schema: &schema,
                    value: &value,
                    errors: &errors,
                    configs,
                    settings,
                    disable_fields,
                }
                .rows()
            })
        })
    });

    // Field items are keyed by property and widget kind, so typing into a
    // field updates it in place instead of rebuilding the list.
    let field_keys = move || {
        rows.with(|rows| match rows {
            Ok(rows) => rows
                .iter()
                .map(|row| (row.key.clone(), row.widget.as_ref().map(|w| widget_shape(&w.kind))))
                .collect::<Vec<_>>(),
            Err(_) => Vec::new(),
        })
    };

    let failure = move || {
        rows.with(|rows| rows.as_ref().err().cloned()).map(|e| {
            log::error!("Schema form render failed: {}", e);
            Err::<(), FormError>(e)
        })
    };

    view! {
        <div class="schema-form-container">
            <div class="schema-form">
                <div class="page-title my-1 mx-sm-1">{form_title}</div>
                {failure}
                <For
                    each=field_keys
                    key=|entry| entry.clone()
                    children=move |(field_key, _)| {
                        view! { <FieldItem field_key=field_key rows=rows value=value on_input_change=on_input_change /> }
                    }
                />
                {children.map(|c| c())}
            </div>
        </div>
    }
}

/// One labeled field with its error message and optional link control
#[component]
fn FieldItem(
    field_key: String,
    rows: Memo<Result<Vec<FieldRow>, FormError>>,
    value: Signal<ValueObject>,
    on_input_change: Callback<(ValueObject, String)>,
) -> impl IntoView {
    let row = Memo::new(move |_| {
        rows.with(|rows| {
            rows.as_ref()
                .ok()
                .and_then(|rows| rows.iter().find(|row| row.key == field_key).cloned())
        })
    });

    let title = move || row.with(|r| r.as_ref().map(|r| r.title.clone()).unwrap_or_default());
    let required = move || if row.with(|r| r.as_ref().is_some_and(|r| r.required)) { " *" } else { "" };
    let error = move || {
        row.with(|r| r.as_ref().and_then(|r| r.error.clone()))
            .map(|message| view! { <div class="errorMessage">{message}</div> })
    };
    let link = Memo::new(move |_| row.with(|r| r.as_ref().and_then(|r| r.link.clone())));

    let widget = row.with_untracked(|r| r.as_ref().and_then(|r| r.widget.clone())).map(|initial| {
        let widget = Memo::new(move |_| {
            row.with(|r| r.as_ref().and_then(|r| r.widget.clone()))
                .unwrap_or_else(|| initial.clone())
        });
        view! { <FieldWidget widget=widget current=value on_change=on_input_change /> }
    });

    view! {
        <div class="item">
            <div class="item-title">
                {title}
                <span class="required-star-icon">{required}</span>
            </div>
            <div class="item-component">
                <div class="row">
                    {widget}
                    {move || link.get().map(|url| view! {
                        <button
                            type="button"
                            class="icon-button"
                            title="Open link"
                            on:click=move |_| open_link(&url)
                        >
                            "↗"
                        </button>
                    })}
                </div>
                {error}
            </div>
        </div>
    }
}

/// Open `url` in a new browsing context
fn open_link(url: &str) {
    if let Err(e) = window().open_with_url_and_target(url, "_blank") {
        log::warn!("Failed to open link {}: {:?}", url, e);
    }
}
