//! Tabular (list) form model
//!
//! Applies the same field resolution as the single-record form to every row
//! of a data set, one column per visible property plus a trailing
//! row-delete column. Column widths and the windowed cell set are computed
//! here; the `ui` crate only positions what it is given.
//!
//! Both grid axes are windowed with `virtualizer`: rows are sized by the
//! row height, columns by their resolved widths.

use virtualizer::{VirtualItem, Virtualizer, VirtualizerOptions};

use crate::defaults::{generate_default, ValueObject};
use crate::error::Result;
use crate::field_config::{is_hidden, FieldConfigs};
use crate::record::{field_title, ACTION_KEY};
use crate::schema::SchemaNode;
use crate::settings::FormSettings;
use crate::validation::ErrorMap;
use crate::widget::{FieldRequest, FieldResolver, WidgetDescriptor};

// ============================================================================
// Columns
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Field,
    /// Synthetic row-delete column
    Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub kind: ColumnKind,
    /// Header text; empty for the action column
    pub title: String,
    pub width: u32,
}

/// Visible column keys: schema properties in declaration order, then
/// `"Action"`, minus anything the config hides.
pub fn visible_column_keys(schema: &SchemaNode, configs: &FieldConfigs) -> Vec<String> {
    schema
        .properties
        .keys()
        .filter(|key| !key.is_empty() && *key != ACTION_KEY)
        .chain(std::iter::once(ACTION_KEY))
        .filter(|key| !is_hidden(configs, key))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Cells
// ============================================================================

/// Content of one grid cell
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Field(WidgetDescriptor),
    /// Array column with no resolvable schema
    Empty,
    Delete { disabled: bool },
}

/// A cell with its pixel box inside the grid
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCell {
    pub row: usize,
    pub column: usize,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub cell: Cell,
}

/// A header slot with its horizontal position
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeaderCell {
    pub column: usize,
    pub left: u32,
    pub width: u32,
    pub title: String,
}

// ============================================================================
// Grid Layout
// ============================================================================

/// Columns and pixel geometry of one list render
#[derive(Clone, Debug)]
pub struct GridLayout {
    pub columns: Vec<Column>,
    /// Width handed to the grid viewport
    pub grid_width: u32,
    /// Height of the grid viewport
    pub grid_height: u32,
    pub dynamic_columns: usize,
    pub fixed_width: u32,
    column_axis: Virtualizer,
    row_axis: Virtualizer,
}

impl GridLayout {
    /// Sum of all column widths
    pub fn total_width(&self) -> u32 {
        px(self.column_axis.total_size())
    }

    /// Sum of all row heights
    pub fn total_height(&self) -> u32 {
        px(self.row_axis.total_size())
    }

    pub fn column_offset(&self, index: usize) -> u32 {
        self.column_axis.item_start(index).map(px).unwrap_or(0)
    }

    pub fn row_offset(&self, index: usize) -> u32 {
        self.row_axis.item_start(index).map(px).unwrap_or(0)
    }

    /// Columns intersecting the viewport scrolled to `scroll_left`, plus overscan
    pub fn visible_columns(&self, scroll_left: u32) -> Vec<VirtualItem> {
        let mut items = Vec::new();
        self.column_axis
            .for_each_virtual_item_for(scroll_left.into(), self.grid_width, |item| items.push(item));
        items
    }

    /// Rows intersecting the viewport scrolled to `scroll_top`, plus overscan
    pub fn visible_rows(&self, scroll_top: u32) -> Vec<VirtualItem> {
        let mut items = Vec::new();
        self.row_axis
            .for_each_virtual_item_for(scroll_top.into(), self.grid_height, |item| items.push(item));
        items
    }

    /// Header slots inside the horizontal viewport
    pub fn visible_header(&self, scroll_left: u32) -> Vec<HeaderCell> {
        self.visible_columns(scroll_left)
            .into_iter()
            .filter_map(|item| {
                let column = self.columns.get(item.index)?;
                Some(HeaderCell {
                    column: item.index,
                    left: px(item.start),
                    width: item.size,
                    title: column.title.clone(),
                })
            })
            .collect()
    }
}

fn px(offset: u64) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

// ============================================================================
// List Form
// ============================================================================

/// Props of one list form render
#[derive(Clone, Copy, Debug)]
pub struct ListForm<'a> {
    pub schema: &'a SchemaNode,
    pub rows: &'a [ValueObject],
    /// Per-row error maps, indexed like `rows`; may be shorter
    pub errors: &'a [ErrorMap],
    pub configs: &'a FieldConfigs,
    pub settings: &'a FormSettings,
    pub disabled: bool,
    pub width: u32,
    pub height: u32,
    /// Width for every column without its own configured width
    pub column_width: Option<u32>,
    pub row_height: Option<u32>,
}

impl<'a> ListForm<'a> {
    pub fn columns(&self) -> Vec<Column> {
        self.layout().columns
    }

    /// Resolve columns and widths, and build the row and column windows.
    pub fn layout(&self) -> GridLayout {
        let keys = visible_column_keys(self.schema, self.configs);
        let configured = |key: &str| self.configs.get(key).and_then(|c| c.width);

        let mut fixed_width = 0u32;
        let mut dynamic_columns = 0usize;
        for key in &keys {
            if key == ACTION_KEY {
                fixed_width = fixed_width.saturating_add(self.settings.action_column_width);
            } else if let Some(width) = configured(key) {
                fixed_width = fixed_width.saturating_add(width);
            } else {
                dynamic_columns += 1;
            }
        }

        let dynamic_width = match u32::try_from(dynamic_columns) {
            Ok(count) if count > 0 => {
                self.width
                    .saturating_sub(self.settings.scrollbar_gutter)
                    .saturating_sub(fixed_width)
                    / count
            }
            _ => 0,
        };

        let columns: Vec<Column> = keys
            .into_iter()
            .map(|key| {
                if key == ACTION_KEY {
                    let width = self.settings.action_column_width;
                    return Column { key, kind: ColumnKind::Action, title: String::new(), width };
                }
                let width = configured(&key).or(self.column_width).unwrap_or(dynamic_width);
                let config_title = self.configs.get(&key).and_then(|c| c.title.as_deref());
                let title = match self.schema.properties.get(&key) {
                    Some(prop) => field_title(&key, prop, config_title),
                    None => config_title.map(str::to_string).unwrap_or_default(),
                };
                Column { key, kind: ColumnKind::Field, title, width }
            })
            .collect();

        let widths: Vec<u32> = columns.iter().map(|c| c.width).collect();
        let column_axis = Virtualizer::new(
            VirtualizerOptions::new(widths.len(), move |i| widths.get(i).copied().unwrap_or(0))
                .with_overscan(self.settings.overscan),
        );
        let row_height = self.row_height();
        let row_axis = Virtualizer::new(
            VirtualizerOptions::new(self.rows.len(), move |_| row_height).with_overscan(self.settings.overscan),
        );

        let grid_width = if dynamic_columns > 0 { self.width } else { fixed_width };

        GridLayout {
            columns,
            grid_width,
            grid_height: self.height,
            dynamic_columns,
            fixed_width,
            column_axis,
            row_axis,
        }
    }

    pub fn row_height(&self) -> u32 {
        self.row_height.unwrap_or(self.settings.row_height)
    }

    /// Resolve the cell at `(row, column)` against the visible column set.
    pub fn cell(&self, columns: &[Column], row: usize, column: usize) -> Result<Cell> {
        let Some(col) = columns.get(column) else {
            return Ok(Cell::Empty);
        };

        if col.kind == ColumnKind::Action {
            return Ok(Cell::Delete { disabled: self.disabled });
        }

        let Some(prop) = self.schema.properties.get(&col.key) else {
            return Ok(Cell::Empty);
        };
        let title = field_title(&col.key, prop, self.configs.get(&col.key).and_then(|c| c.title.as_deref()));
        let error = self
            .errors
            .get(row)
            .and_then(|errors| errors.get(&col.key))
            .map(String::as_str);

        let resolver = FieldResolver::new(self.settings, self.disabled);
        let widget = resolver.resolve(FieldRequest {
            schema: prop,
            key: &col.key,
            title: &title,
            value: self.rows.get(row).and_then(|r| r.get(&col.key)),
            error,
            config: self.configs.get(&col.key),
        })?;

        Ok(widget.map(Cell::Field).unwrap_or(Cell::Empty))
    }

    /// Cells inside the viewport scrolled to `(scroll_left, scroll_top)`,
    /// plus the configured overscan.
    pub fn visible_cells(&self, layout: &GridLayout, scroll_left: u32, scroll_top: u32) -> Result<Vec<PlacedCell>> {
        let visible_rows = layout.visible_rows(scroll_top);
        let visible_columns = layout.visible_columns(scroll_left);

        let mut cells = Vec::with_capacity(visible_rows.len() * visible_columns.len());
        for row in &visible_rows {
            for column in &visible_columns {
                cells.push(PlacedCell {
                    row: row.index,
                    column: column.index,
                    left: px(column.start),
                    top: px(row.start),
                    width: column.size,
                    height: row.size,
                    cell: self.cell(&layout.columns, row.index, column.index)?,
                });
            }
        }
        Ok(cells)
    }

    /// Default row for an add-row handler
    pub fn new_row(&self) -> ValueObject {
        generate_default(self.schema)
    }

    /// Copy of `rows` with the row at `index` replaced by `next`
    pub fn replace_row(rows: &[ValueObject], index: usize, next: ValueObject) -> Vec<ValueObject> {
        let mut out = rows.to_vec();
        if let Some(slot) = out.get_mut(index) {
            *slot = next;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_config::FieldConfig;
    use serde_json::json;

    fn schema() -> SchemaNode {
        SchemaNode::from_value(&json!({
            "type": "object",
            "properties": {
                "hostName": { "type": "string" },
                "port": { "type": "integer" },
                "role": { "type": "string", "enum": ["primary", "replica"] }
            }
        }))
        .unwrap()
    }

    fn rows() -> Vec<ValueObject> {
        (0..50)
            .map(|i| {
                let mut row = ValueObject::new();
                row.insert("hostName".to_string(), json!(format!("host-{}", i)));
                row.insert("port".to_string(), json!(8000 + i));
                row
            })
            .collect()
    }

    fn form<'a>(
        schema: &'a SchemaNode,
        rows: &'a [ValueObject],
        configs: &'a FieldConfigs,
        settings: &'a FormSettings,
    ) -> ListForm<'a> {
        ListForm {
            schema,
            rows,
            errors: &[],
            configs,
            settings,
            disabled: false,
            width: 511,
            height: 360,
            column_width: None,
            row_height: None,
        }
    }

    #[test]
    fn test_three_properties_give_four_columns() {
        let schema = schema();
        let keys = visible_column_keys(&schema, &FieldConfigs::new());
        assert_eq!(keys, vec!["hostName", "port", "role", "Action"]);
    }

    #[test]
    fn test_hidden_columns_removed() {
        let schema = schema();
        let mut configs = FieldConfigs::new();
        configs.insert("port".to_string(), FieldConfig::hidden());
        let keys = visible_column_keys(&schema, &configs);
        assert_eq!(keys, vec!["hostName", "role", "Action"]);

        configs.insert(ACTION_KEY.to_string(), FieldConfig::hidden());
        assert_eq!(visible_column_keys(&schema, &configs), vec!["hostName", "role"]);
    }

    #[test]
    fn test_column_widths_split_leftover() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let mut configs = FieldConfigs::new();
        configs.insert("port".to_string(), FieldConfig { width: Some(100), ..Default::default() });
        let list = form(&schema, &rows, &configs, &settings);

        let widths: Vec<u32> = list.columns().iter().map(|c| c.width).collect();
        // (511 - 16 - 100 - 95) / 2 = 150
        assert_eq!(widths, vec![150, 100, 150, 95]);

        let layout = list.layout();
        assert_eq!(layout.dynamic_columns, 2);
        assert_eq!(layout.fixed_width, 195);
        assert_eq!(layout.grid_width, 511);
        assert_eq!(layout.total_width(), 495);
    }

    #[test]
    fn test_all_fixed_columns_shrink_grid() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let mut configs = FieldConfigs::new();
        for key in ["hostName", "port", "role"] {
            configs.insert(key.to_string(), FieldConfig { width: Some(80), ..Default::default() });
        }
        let layout = form(&schema, &rows, &configs, &settings).layout();
        assert_eq!(layout.dynamic_columns, 0);
        assert_eq!(layout.grid_width, 80 * 3 + 95);
    }

    #[test]
    fn test_form_column_width_overrides_dynamic() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let list = ListForm { column_width: Some(120), ..form(&schema, &rows, &configs, &settings) };
        let widths: Vec<u32> = list.columns().iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![120, 120, 120, 95]);
    }

    #[test]
    fn test_headers() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let mut configs = FieldConfigs::new();
        configs.insert("role".to_string(), FieldConfig { title: Some("Node Role".to_string()), ..Default::default() });
        let titles: Vec<String> = form(&schema, &rows, &configs, &settings)
            .columns()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Host Name", "Port", "Node Role", ""]);
    }

    #[test]
    fn test_cells_resolve_per_row() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let list = form(&schema, &rows, &configs, &settings);
        let columns = list.columns();

        let Cell::Field(widget) = list.cell(&columns, 3, 0).unwrap() else {
            panic!("Expected field cell");
        };
        assert_eq!(widget.display_text(), "host-3");

        let next = widget.next_value(&rows[3], "renamed").unwrap();
        assert_eq!(next["hostName"], json!("renamed"));
        assert_eq!(next["port"], json!(8003));
        assert_eq!(rows[3]["hostName"], json!("host-3"));

        assert_eq!(list.cell(&columns, 3, 3).unwrap(), Cell::Delete { disabled: false });
    }

    #[test]
    fn test_disabled_form_disables_delete_and_fields() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let list = ListForm { disabled: true, ..form(&schema, &rows, &configs, &settings) };
        let columns = list.columns();

        assert_eq!(list.cell(&columns, 0, 3).unwrap(), Cell::Delete { disabled: true });
        let Cell::Field(widget) = list.cell(&columns, 0, 1).unwrap() else {
            panic!("Expected field cell");
        };
        assert!(widget.disabled);
    }

    #[test]
    fn test_row_errors() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let mut second = ErrorMap::new();
        second.insert("port".to_string(), "must be integer".to_string());
        let errors = vec![ErrorMap::new(), second];
        let list = ListForm { errors: &errors, ..form(&schema, &rows, &configs, &settings) };
        let columns = list.columns();

        let Cell::Field(widget) = list.cell(&columns, 1, 1).unwrap() else {
            panic!("Expected field cell");
        };
        assert!(widget.has_error());
        let Cell::Field(widget) = list.cell(&columns, 5, 1).unwrap() else {
            panic!("Expected field cell");
        };
        assert!(!widget.has_error());
    }

    #[test]
    fn test_visible_cells_are_windowed() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let list = form(&schema, &rows, &configs, &settings);

        // 360px / 36px rows = 10 rows, plus 2 overscan below
        let layout = list.layout();
        let cells = list.visible_cells(&layout, 0, 0).unwrap();
        let rendered_rows: std::collections::BTreeSet<usize> = cells.iter().map(|c| c.row).collect();
        assert_eq!(rendered_rows.len(), 12);
        assert_eq!(cells.len(), 12 * 4);

        let scrolled = list.visible_cells(&layout, 0, 36 * 20).unwrap();
        assert_eq!(scrolled.first().map(|c| (c.row, c.top)), Some((18, 36 * 18)));
    }

    #[test]
    fn test_header_slots_follow_column_offsets() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let mut configs = FieldConfigs::new();
        configs.insert("port".to_string(), FieldConfig { width: Some(100), ..Default::default() });
        let layout = form(&schema, &rows, &configs, &settings).layout();

        let header = layout.visible_header(0);
        let slots: Vec<(usize, u32, u32)> = header.iter().map(|h| (h.column, h.left, h.width)).collect();
        assert_eq!(slots, vec![(0, 0, 150), (1, 150, 100), (2, 250, 150), (3, 400, 95)]);
        assert_eq!(header[0].title, "Host Name");
        assert_eq!(header[3].title, "");
        assert_eq!(layout.column_offset(2), 250);
    }

    #[test]
    fn test_columns_windowed_horizontally() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings { overscan: 0, ..Default::default() };
        let configs = FieldConfigs::new();
        let list = ListForm { width: 400, column_width: Some(300), ..form(&schema, &rows, &configs, &settings) };
        let layout = list.layout();
        assert_eq!(layout.total_width(), 300 * 3 + 95);

        let at_start: Vec<usize> = layout.visible_columns(0).iter().map(|c| c.index).collect();
        assert_eq!(at_start, vec![0, 1]);

        let scrolled = list.visible_cells(&layout, 300, 0).unwrap();
        let columns: std::collections::BTreeSet<usize> = scrolled.iter().map(|c| c.column).collect();
        assert_eq!(columns.into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(scrolled[0].left, 300);
    }

    #[test]
    fn test_empty_list_has_no_cells() {
        let schema = schema();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let list = form(&schema, &[], &configs, &settings);
        let layout = list.layout();

        assert_eq!(layout.total_height(), 0);
        assert!(layout.visible_rows(0).is_empty());
        assert!(list.visible_cells(&layout, 0, 0).unwrap().is_empty());
        assert_eq!(layout.visible_header(0).len(), 4);
    }

    #[test]
    fn test_new_and_replaced_rows() {
        let schema = schema();
        let rows = rows();
        let settings = FormSettings::default();
        let configs = FieldConfigs::new();
        let list = form(&schema, &rows, &configs, &settings);

        let fresh = list.new_row();
        assert_eq!(fresh["hostName"], json!(""));
        assert_eq!(fresh["port"], json!(0));
        assert_eq!(fresh["role"], json!("primary"));

        let replaced = ListForm::replace_row(&rows, 2, fresh.clone());
        assert_eq!(replaced[2], fresh);
        assert_eq!(replaced.len(), rows.len());
        assert_eq!(rows[2]["hostName"], json!("host-2"));
    }
}
