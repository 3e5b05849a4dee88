//! Table formatting utilities

use prettytable::{Cell, Row, Table};
use zoia_patch::CopyPlan;

use super::io::short_path;

const SOURCE_WIDTH: usize = 48;

/// Create a table with headers
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.set_titles(Row::new(header_cells));

    table
}

/// Add a row to a table
pub fn add_table_row(table: &mut Table, cells: &[String]) {
    let row_cells: Vec<Cell> = cells.iter().map(|s| Cell::new(s)).collect();
    table.add_row(Row::new(row_cells));
}

/// Render a copy plan as a slot / patch / source table
pub fn slot_table(plan: &CopyPlan) -> Table {
    let mut table = create_table(&["Slot", "Patch", "Source"]);
    for op in plan {
        let patch = op.base_id.as_deref().unwrap_or("(empty)");
        add_table_row(
            &mut table,
            &[
                format!("{:03}", op.slot),
                patch.to_string(),
                short_path(&op.source, SOURCE_WIDTH),
            ],
        );
    }
    table
}
