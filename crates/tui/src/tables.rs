//! Table model and renderer for the result row array.
//!
//! The column set is the union of the keys of every row (not just the
//! first), in first-seen order; rows render in original order. Structured
//! cell values are flattened to their compact JSON encoding, which is also
//! the exact text a cell copy puts on the clipboard.

use indexmap::IndexSet;
use ratatui::{prelude::*, widgets::*};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::theme;

/// Widest a column is allowed to render.
const MAX_COLUMN_WIDTH: u16 = 28;

/// Union of all row keys, order-preserving on first occurrence.
pub fn derive_columns(rows: &[Value]) -> Vec<String> {
    let mut columns: IndexSet<String> = IndexSet::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                columns.insert(key.clone());
            }
        }
    }
    columns.into_iter().collect()
}

/// The display (and copy) text of one cell.
///
/// Missing keys render empty; strings render verbatim; anything structured
/// is flattened to compact JSON.
pub fn cell_text(row: &Value, column: &str) -> String {
    match row.get(column) {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(value) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Render the tabular result view with the cell cursor and copy marks.
pub fn draw_result_table(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Result;
    let cursor_row = app.result.row;
    let cursor_col = app.result.col;
    let mut row_offset = app.result.row_offset;
    let mut col_offset = app.result.col_offset;

    let Some(rows) = app.result.rows() else {
        return;
    };
    if rows.is_empty() {
        let p = Paragraph::new("无表格数据").style(theme::text_muted());
        f.render_widget(p, area);
        return;
    }

    let columns = derive_columns(rows);

    // Keep the cell cursor inside the visible window.
    let inner_height = area.height.saturating_sub(2); // block borders
    let visible_rows = inner_height.saturating_sub(1).max(1) as usize; // header row
    if cursor_row < row_offset {
        row_offset = cursor_row;
    }
    if cursor_row >= row_offset + visible_rows {
        row_offset = cursor_row + 1 - visible_rows;
    }

    let widths: Vec<u16> = columns
        .iter()
        .map(|column| {
            let content = rows
                .iter()
                .map(|row| cell_text(row, column).width())
                .max()
                .unwrap_or(0)
                .max(column.width());
            (content as u16 + 1).clamp(4, MAX_COLUMN_WIDTH)
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    if cursor_col < col_offset {
        col_offset = cursor_col;
    }
    while !visible_span(&widths, col_offset, inner_width).contains(&cursor_col)
        && col_offset < columns.len().saturating_sub(1)
    {
        col_offset += 1;
    }
    let shown = visible_span(&widths, col_offset, inner_width);

    let header_cells: Vec<Cell> = shown
        .clone()
        .map(|col| Cell::from(columns[col].clone()).style(theme::title_style()))
        .collect();

    let mut body: Vec<Row> = Vec::new();
    for (row_idx, row_value) in rows.iter().enumerate().skip(row_offset).take(visible_rows) {
        let cells: Vec<Cell> = shown
            .clone()
            .map(|col| {
                let mut text = cell_text(row_value, &columns[col]);
                let copied = app.result.cell_copied(row_idx, col);
                if copied {
                    text = format!("✓ {text}");
                }
                let mut style = if copied { theme::copied_style() } else { theme::text_style() };
                if focused && row_idx == cursor_row && col == cursor_col {
                    style = theme::cell_cursor_style();
                }
                Cell::from(text).style(style)
            })
            .collect();
        body.push(Row::new(cells));
    }

    let constraints: Vec<Constraint> = shown.map(|col| Constraint::Length(widths[col])).collect();

    let mut title_spans = vec![
        Span::styled("测试结果 (表格视图)", theme::title_style()),
        Span::styled(
            format!("  {}/{} 行  {} 列", cursor_row + 1, rows.len(), columns.len()),
            theme::text_muted(),
        ),
    ];
    if app.result.whole_result_copied() {
        title_spans.push(Span::styled("  已复制!", theme::copied_style()));
    }

    let table = Table::new(body, constraints)
        .header(Row::new(header_cells))
        .column_spacing(1)
        .block(
            Block::default()
                .title(Line::from(title_spans))
                .borders(Borders::ALL)
                .border_style(theme::border_style(focused)),
        );

    app.result.row_offset = row_offset;
    app.result.col_offset = col_offset;
    f.render_widget(table, area);
}

/// Columns that fit in `width` starting at `first`, always at least one.
fn visible_span(widths: &[u16], first: usize, width: u16) -> std::ops::Range<usize> {
    let mut used = 0u16;
    let mut last = first;
    for (idx, column_width) in widths.iter().enumerate().skip(first) {
        let needed = column_width + 1; // column spacing
        if used + needed > width && idx > first {
            break;
        }
        used = used.saturating_add(needed);
        last = idx;
    }
    first..last + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn columns_are_the_union_of_all_rows_in_first_seen_order() {
        let rows = vec![json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4})];
        assert_eq!(derive_columns(&rows), ["a", "b", "c"]);
    }

    #[test]
    fn columns_from_later_rows_are_appended() {
        let rows = vec![json!({"z": 1}), json!({"a": 1}), json!({"z": 2, "m": 3})];
        assert_eq!(derive_columns(&rows), ["z", "a", "m"]);
    }

    #[test]
    fn cell_text_flattens_structured_values() {
        let row = json!({
            "plain": "text",
            "number": 42,
            "flag": true,
            "nothing": null,
            "nested": {"x": 1},
            "list": [1, 2]
        });
        assert_eq!(cell_text(&row, "plain"), "text");
        assert_eq!(cell_text(&row, "number"), "42");
        assert_eq!(cell_text(&row, "flag"), "true");
        assert_eq!(cell_text(&row, "nothing"), "null");
        assert_eq!(cell_text(&row, "nested"), "{\"x\":1}");
        assert_eq!(cell_text(&row, "list"), "[1,2]");
        assert_eq!(cell_text(&row, "missing"), "");
    }

    #[test]
    fn visible_span_always_contains_the_first_column() {
        let widths = vec![20, 20, 20];
        assert_eq!(visible_span(&widths, 0, 10), 0..1);
        assert_eq!(visible_span(&widths, 0, 45), 0..2);
        assert_eq!(visible_span(&widths, 2, 10), 2..3);
    }
}
