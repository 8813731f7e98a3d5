use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lineage_cli::types::{RunReport, ViewSummary};

pub fn print_summary(report: &RunReport) {
    println!("Legacy: {}", report.legacy);
    println!("Lineage file: {}", report.lineage_file.display());
    if report.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", report.output_root.display());
    }
    for schema in &report.skipped_schemas {
        println!("Skipped schema: {schema}");
    }
    if report.views.is_empty() {
        println!("No views generated.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Schema"),
        header_cell("Legacy view"),
        header_cell("Target table"),
        header_cell("Fields"),
        header_cell("Legacy match"),
        header_cell("Landing match"),
        header_cell("DMS rules"),
        header_cell("DQ rules"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_fields = 0usize;
    let mut total_rules = 0usize;
    for view in &report.views {
        total_fields += view.catalog_fields;
        total_rules += view.replication_rules;
        table.add_row(vec![
            Cell::new(view.schema),
            Cell::new(&view.legacy_view)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&view.target_table),
            Cell::new(view.catalog_fields),
            match_cell(view.matched_legacy, view),
            match_cell(view.matched_landing, view),
            Cell::new(view.replication_rules),
            Cell::new(view.quality_rules),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} views", report.views.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_fields).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_rules).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

/// Highlight views where nothing or only part of the catalog matched.
fn match_cell(matched: usize, view: &ViewSummary) -> Cell {
    if matched == 0 {
        Cell::new(matched).fg(Color::Red).add_attribute(Attribute::Bold)
    } else if matched < view.catalog_fields {
        Cell::new(matched).fg(Color::Yellow)
    } else {
        Cell::new(matched).fg(Color::Green)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
