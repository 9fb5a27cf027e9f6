use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use wb_model::LEVEL_SEPARATOR;

use crate::commands::{MapReport, TableRow};

pub fn print_map_report(report: &MapReport) {
    println!("Root table: {}", report.table);
    println!("{}", mapping_table(report));
    println!("{}", summary_line(report));
}

pub fn print_map_report_json(report: &MapReport) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_tables(rows: &[TableRow]) {
    println!("{}", tables_table(rows));
}

pub fn mapping_table(report: &MapReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Path"),
        header_cell("Friendly path"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    for row in &report.rows {
        table.add_row(vec![
            Cell::new(&row.header),
            Cell::new(row.path.to_string()).fg(Color::Green),
            Cell::new(row.friendly.join(LEVEL_SEPARATOR)),
            Cell::new(&row.preview),
        ]);
    }
    for header in &report.unmapped_headers {
        table.add_row(vec![
            Cell::new(header),
            dim_cell("unmapped"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table
}

pub fn tables_table(rows: &[TableRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Name"),
        header_cell("Fields"),
        header_cell("Relationships"),
        header_cell("Ranks"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.name).add_attribute(Attribute::Bold),
            Cell::new(&row.friendly_name),
            Cell::new(row.fields),
            Cell::new(row.relationships),
            match row.ranks {
                Some(count) => Cell::new(count).fg(Color::Cyan),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn summary_line(report: &MapReport) -> String {
    let summary = &report.summary;
    format!(
        "Headers: {} | Mapped: {} | Unmapped: {} | Required fields mapped: {}/{}",
        summary.total_headers,
        summary.mapped,
        summary.unmapped,
        summary.required_mapped,
        summary.required_total
    )
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
