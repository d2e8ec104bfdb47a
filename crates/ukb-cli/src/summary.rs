use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::DecodeResult;

pub fn print_summary(result: &DecodeResult) {
    println!("Output: {}", result.output.display());
    println!(
        "Rows: {} read, {} written in {:.1}s",
        result.rows_read,
        result.rows_written,
        result.elapsed.as_secs_f64()
    );
    println!("Columns renamed: {}/{}", result.renamed, result.columns);

    if result.codings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Coding"),
        header_cell("Columns"),
        header_cell("Entries"),
        header_cell("Status"),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for coding in &result.codings {
        table.add_row(vec![
            Cell::new(coding.coding_id),
            Cell::new(coding.columns),
            if coding.resolved {
                Cell::new(coding.entries)
            } else {
                dim_cell("-")
            },
            status_cell(coding.resolved),
        ]);
    }
    println!("{table}");
}

fn status_cell(resolved: bool) -> Cell {
    if resolved {
        Cell::new("resolved")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("unresolved").fg(Color::Yellow)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
