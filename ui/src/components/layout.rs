//! Pure helpers shared by the form components

use chrono::NaiveDateTime;
use schemaform::list::{Cell, PlacedCell};
use schemaform::widget::{WidgetDescriptor, WidgetKind};

/// Absolute-position style for a grid cell
pub fn cell_style(cell: &PlacedCell) -> String {
    format!(
        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px;",
        cell.left, cell.top, cell.width, cell.height
    )
}

/// Absolute-position style for a header slot
pub fn header_style(left: u32, width: u32, height: u32) -> String {
    format!("position: absolute; left: {}px; top: 0; width: {}px; height: {}px;", left, width, height)
}

/// `YYYY-MM-DD` value for a native date input; falls back to `now`
pub fn date_input_value(widget: &WidgetDescriptor, now: NaiveDateTime) -> String {
    let selected = match &widget.kind {
        WidgetKind::DatePicker { selected } => selected.unwrap_or(now),
        _ => now,
    };
    selected.format("%Y-%m-%d").to_string()
}

/// Which control element a widget mounts. Keyed lists remount a field only
/// when this changes.
pub fn widget_shape(kind: &WidgetKind) -> &'static str {
    match kind {
        WidgetKind::DatePicker { .. } => "date",
        WidgetKind::TextArea { .. } => "textarea",
        WidgetKind::Select { .. } => "select",
        WidgetKind::TextInput { mode } => mode.as_str(),
        WidgetKind::Number { .. } => "number",
    }
}

pub fn cell_shape(cell: &Cell) -> &'static str {
    match cell {
        Cell::Field(widget) => widget_shape(&widget.kind),
        Cell::Empty => "empty",
        Cell::Delete { .. } => "delete",
    }
}

pub fn input_class(widget: &WidgetDescriptor) -> &'static str {
    if widget.has_error() {
        "input-error"
    } else {
        ""
    }
}

/// Opacity and pointer style for controls that follow the form's disabled flag
pub fn action_style(disabled: bool) -> &'static str {
    if disabled {
        "pointer-events: none; opacity: 0.5;"
    } else {
        "pointer-events: all; opacity: 1;"
    }
}
