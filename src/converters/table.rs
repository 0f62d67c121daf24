//! GFM table rendering shared by the CSV, spreadsheet and Word converters.

/// Render a table whose width is fixed by `header`.
///
/// Every body row is padded with empty cells or truncated to exactly
/// `header.len()` cells, so ragged input never breaks column alignment.
pub fn render_table<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let width = header.len();
    let mut out = String::new();

    push_row(&mut out, header.iter().map(|c| sanitize_cell(c.as_ref())));
    push_row(&mut out, std::iter::repeat_n("---".to_string(), width));

    for row in rows {
        let cells = row
            .iter()
            .map(|c| sanitize_cell(c))
            .chain(std::iter::repeat(String::new()))
            .take(width);
        push_row(&mut out, cells);
    }
    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    out.push_str("| ");
    out.push_str(&cells.collect::<Vec<_>>().join(" | "));
    out.push_str(" |\n");
}

/// Escape pipes and fold line breaks so a cell stays on one table line.
pub fn sanitize_cell(cell: &str) -> String {
    cell.trim()
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
