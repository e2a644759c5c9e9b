//! List Schema Form Component
//!
//! Tabular variant of the schema form: one row per record, one column per
//! visible property plus a delete column. Only the cells inside the scrolled
//! viewport are rendered.

use leptos::prelude::*;
use schemaform::list::{Cell, HeaderCell, ListForm, PlacedCell};
use schemaform::{ErrorMap, FieldConfigs, FormError, FormSettings, SchemaNode, ValueObject};

use super::field_widget::FieldWidget;
use super::layout::{action_style, cell_shape, cell_style, header_style};

/// Everything one render pass of the grid needs, detached from the borrowed
/// list model.
#[derive(Clone, Debug, PartialEq)]
struct GridFrame {
    total_width: u32,
    grid_width: u32,
    content_height: u32,
    header: Vec<HeaderCell>,
    cells: Vec<PlacedCell>,
}

type FrameMemo = Memo<Result<GridFrame, FormError>>;

#[component]
pub fn ListSchemaForm(
    #[prop(into)]
    schema: Signal<SchemaNode>,
    /// One value object per row
    #[prop(into)]
    data: Signal<Vec<ValueObject>>,
    /// Receives `(next row value, changed key, row index)`
    on_input_change: Callback<(ValueObject, String, usize)>,
    on_add_row: Callback<()>,
    /// Receives the index of the row to remove
    on_delete_row: Callback<usize>,
    /// Viewport width in pixels
    width: u32,
    /// Viewport height of the grid body in pixels
    height: u32,
    #[prop(optional)]
    column_width: Option<u32>,
    #[prop(optional)]
    row_height: Option<u32>,
    /// Per-row field messages
    #[prop(optional)]
    error_messages: Option<Signal<Vec<ErrorMap>>>,
    #[prop(optional)]
    config: Option<FieldConfigs>,
    #[prop(optional)]
    settings: Option<FormSettings>,
    #[prop(into, default = false.into())]
    disabled: Signal<bool>,
    #[prop(optional, into)]
    form_title: Option<String>,
) -> impl IntoView {
    let config = StoredValue::new(config.unwrap_or_default());
    let settings = StoredValue::new(settings.unwrap_or_default());
    let header_height = settings.with_value(|s| s.header_height);

    let (scroll_left, set_scroll_left) = signal(0u32);
    let (scroll_top, set_scroll_top) = signal(0u32);

    let frame = Memo::new(move |_| -> Result<GridFrame, FormError> {
        let schema = schema.get();
        let rows = data.get();
        let errors = error_messages.map(|e| e.get()).unwrap_or_default();
        let disabled = disabled.get();
        let (left, top) = (scroll_left.get(), scroll_top.get());

        config.with_value(|configs| {
            settings.with_value(|settings| {
                let list = ListForm {
                    schema: &schema,
                    rows: &rows,
                    errors: &errors,
                    configs,
                    settings,
                    disabled,
                    width,
                    height,
                    column_width,
                    row_height,
                };
                let layout = list.layout();

                Ok(GridFrame {
                    total_width: layout.total_width(),
                    grid_width: layout.grid_width,
                    content_height: layout.total_height(),
                    header: layout.visible_header(left),
                    cells: list.visible_cells(&layout, left, top)?,
                })
            })
        })
    });

    let failure = move || {
        frame.with(|f| f.as_ref().err().cloned()).map(|e| {
            log::error!("List schema form render failed: {}", e);
            Err::<(), FormError>(e)
        })
    };

    let grid_style = move || {
        let grid_width = frame.with(|f| f.as_ref().map(|f| f.grid_width).unwrap_or(width));
        format!("position: relative; overflow: auto; width: {}px; height: {}px;", grid_width, height)
    };

    let content_style = move || {
        let (total_width, content_height) =
            frame.with(|f| f.as_ref().map(|f| (f.total_width, f.content_height)).unwrap_or_default());
        format!("position: relative; width: {}px; height: {}px;", total_width, content_height)
    };

    let header_cells = move || frame.with(|f| f.as_ref().map(|f| f.header.clone()).unwrap_or_default());

    // Cells are keyed by position and kind; scrolling or editing a row keeps
    // the mounted widgets and only moves or updates them.
    let cell_keys = move || {
        frame.with(|f| match f {
            Ok(f) => f
                .cells
                .iter()
                .map(|placed| (placed.row, placed.column, cell_shape(&placed.cell)))
                .collect::<Vec<_>>(),
            Err(_) => Vec::new(),
        })
    };

    let on_scroll = move |ev: leptos::ev::Event| {
        let target = event_target::<web_sys::Element>(&ev);
        set_scroll_left.set(target.scroll_left().max(0) as u32);
        set_scroll_top.set(target.scroll_top().max(0) as u32);
    };

    let on_add = move |_| {
        if disabled.get_untracked() {
            return;
        }
        log::debug!("Adding row");
        on_add_row.run(());
    };

    view! {
        <div class="list-schema-form" style=format!("width: {}px;", width)>
            <div class="action-container">
                <div class="flex-1">
                    <div class="page-title my-1 mx-1">{form_title}</div>
                </div>
                <button
                    type="button"
                    class="add-row"
                    title="Add row"
                    style=move || action_style(disabled.get())
                    disabled=move || disabled.get()
                    on:click=on_add
                >
                    "+"
                </button>
            </div>
            <hr />
            <div
                class="list-header"
                style=format!("position: relative; overflow: hidden; width: {}px; height: {}px;", width, header_height)
            >
                <div style=move || format!("position: absolute; left: -{}px; top: 0;", scroll_left.get())>
                    <For
                        each=header_cells
                        key=|cell| cell.clone()
                        children=move |cell| {
                            view! { <div class="title" style=header_style(cell.left, cell.width, header_height)>{cell.title}</div> }
                        }
                    />
                </div>
            </div>
            {failure}
            <div class="list-grid" style=grid_style on:scroll=on_scroll>
                <div style=content_style>
                    <For
                        each=cell_keys
                        key=|entry| *entry
                        children=move |(row, column, _)| {
                            view! {
                                <GridCell
                                    row=row
                                    column=column
                                    frame=frame
                                    data=data
                                    on_input_change=on_input_change
                                    on_delete_row=on_delete_row
                                />
                            }
                        }
                    />
                </div>
            </div>
        </div>
    }
}

/// One positioned grid cell: a field widget or the row-delete control
#[component]
fn GridCell(
    row: usize,
    column: usize,
    frame: FrameMemo,
    data: Signal<Vec<ValueObject>>,
    on_input_change: Callback<(ValueObject, String, usize)>,
    on_delete_row: Callback<usize>,
) -> impl IntoView {
    let placed = Memo::new(move |_| {
        frame.with(|f| {
            f.as_ref()
                .ok()
                .and_then(|f| f.cells.iter().find(|c| c.row == row && c.column == column).cloned())
        })
    });
    let style = move || placed.with(|p| p.as_ref().map(cell_style).unwrap_or_default());

    let content = match placed.with_untracked(|p| p.as_ref().map(|p| p.cell.clone())) {
        Some(Cell::Field(initial)) => {
            let widget = Memo::new(move |_| {
                placed.with(|p| match p.as_ref().map(|p| &p.cell) {
                    Some(Cell::Field(widget)) => widget.clone(),
                    _ => initial.clone(),
                })
            });
            let current = Signal::derive(move || data.with(|rows| rows.get(row).cloned().unwrap_or_default()));
            let on_change = Callback::new(move |(next, key): (ValueObject, String)| {
                on_input_change.run((next, key, row));
            });
            view! { <FieldWidget widget=widget current=current on_change=on_change /> }.into_any()
        }
        Some(Cell::Delete { .. }) => {
            let disabled =
                move || placed.with(|p| matches!(p.as_ref().map(|p| &p.cell), Some(Cell::Delete { disabled: true })));
            view! {
                <button
                    type="button"
                    class="delete-row"
                    title="Delete row"
                    style=move || format!("float: right; {}", action_style(disabled()))
                    disabled=disabled
                    on:click=move |_| {
                        log::debug!("Deleting row {}", row);
                        on_delete_row.run(row);
                    }
                >
                    "🗑"
                </button>
            }
            .into_any()
        }
        Some(Cell::Empty) | None => ().into_any(),
    };

    view! { <div class="cell" style=style>{content}</div> }
}
