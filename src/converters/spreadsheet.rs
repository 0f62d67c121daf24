//! XLSX workbooks: one table per worksheet, cached formula values.

use crate::config::ConversionConfig;
use crate::converters::table::render_table;
use crate::error::ConvertError;
use crate::formats::XLSX_MIME;
use crate::output::{ConversionResult, Metadata, SheetSummary};
use crate::pipeline::input::SourceFile;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use tracing::{debug, warn};

pub fn convert(file: &SourceFile, config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(&file.bytes)).map_err(|e| ConvertError::conversion("Excel file", e))?;

    let names = workbook.sheet_names();
    debug!("Workbook '{}': {} sheets", file.filename, names.len());

    let mut markdown = format!("# {}\n\n", file.filename);
    let mut sheets = Vec::with_capacity(names.len());
    let mut messages = Vec::new();

    for name in names {
        markdown.push_str(&format!("## Sheet: {name}\n\n"));
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let (section, summary) = render_sheet(&name, &range, config.sheet_row_limit);
                markdown.push_str(&section);
                sheets.push(summary);
            }
            Err(e) => {
                warn!("Sheet '{}' of '{}' could not be read: {}", name, file.filename, e);
                markdown.push_str("*Unreadable sheet*");
                messages.push(format!("Sheet '{name}' could not be read: {e}"));
                sheets.push(SheetSummary {
                    name,
                    rows: 0,
                    columns: 0,
                });
            }
        }
        markdown.push_str("\n\n");
    }

    let mut metadata = Metadata::basic(&file.filename, XLSX_MIME, file.size()).with("sheets", sheets);
    if !messages.is_empty() {
        metadata.insert("messages", messages);
    }

    Ok(ConversionResult::new(markdown.trim_end().to_string(), metadata, XLSX_MIME))
}

fn render_sheet(name: &str, range: &Range<Data>, row_limit: usize) -> (String, SheetSummary) {
    let rows: Vec<Vec<String>> = range
        .rows()
        .filter(|row| !is_blank_row(row))
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    if rows.is_empty() {
        let summary = SheetSummary {
            name: name.to_string(),
            rows: 0,
            columns: 0,
        };
        return ("*Empty sheet*".to_string(), summary);
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    debug!("Sheet '{}': {} rows × {} columns", name, rows.len(), columns);

    let header: Vec<String> = (1..=columns).map(|i| format!("Column {i}")).collect();
    let shown = &rows[..rows.len().min(row_limit)];
    let mut section = render_table(&header, shown);
    if rows.len() > row_limit {
        section.push_str(&format!("\n*Note: Only showing first {row_limit} rows*"));
    }

    let summary = SheetSummary {
        name: name.to_string(),
        rows: rows.len(),
        columns,
    };
    (section.trim_end().to_string(), summary)
}

/// A row is skipped only when no cell holds a value; whitespace counts.
fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Minimal XLSX: one worksheet per entry, each a list of numeric rows.
    fn xlsx(sheets: &[(&str, Vec<Vec<u32>>)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();

        let mut overrides = String::new();
        let mut sheet_entries = String::new();
        let mut rels = String::new();
        for (i, (name, _)) in sheets.iter().enumerate() {
            let n = i + 1;
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
            sheet_entries.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }

        zip.start_file("[Content_Types].xml", opts).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
        )
        .unwrap();

        zip.start_file("_rels/.rels", opts).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
        )
        .unwrap();

        zip.start_file("xl/workbook.xml", opts).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
        )
        .unwrap();

        zip.start_file("xl/_rels/workbook.xml.rels", opts).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        )
        .unwrap();

        for (i, (_, rows)) in sheets.iter().enumerate() {
            let mut data = String::new();
            for (r, row) in rows.iter().enumerate() {
                data.push_str(&format!(r#"<row r="{}">"#, r + 1));
                for (c, value) in row.iter().enumerate() {
                    let col = char::from(b'A' + c as u8);
                    data.push_str(&format!(r#"<c r="{col}{}"><v>{value}</v></c>"#, r + 1));
                }
                data.push_str("</row>");
            }
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), opts).unwrap();
            write!(
                zip,
                r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
            )
            .unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    fn without_part(bytes: Vec<u8>, part: &str) -> Vec<u8> {
        let mut src = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for i in 0..src.len() {
            let entry = src.by_index(i).unwrap();
            if entry.name() != part {
                out.raw_copy_file(entry).unwrap();
            }
        }
        out.finish().unwrap().into_inner()
    }

    fn run(bytes: Vec<u8>) -> Result<ConversionResult, ConvertError> {
        let file = SourceFile::new(bytes, Some(XLSX_MIME), "book.xlsx");
        convert(&file, &ConversionConfig::default())
    }

    fn sheets(r: &ConversionResult) -> Vec<SheetSummary> {
        match r.metadata().get("sheets") {
            Some(crate::output::MetaValue::Sheets(s)) => s.clone(),
            other => panic!("unexpected sheets metadata: {other:?}"),
        }
    }

    #[test]
    fn small_sheet_renders_positional_header() {
        let r = run(xlsx(&[("Data", vec![vec![1, 2], vec![3, 4]])])).unwrap();
        assert!(r.markdown().starts_with("# book.xlsx\n\n## Sheet: Data\n\n"));
        assert!(r.markdown().contains("| Column 1 | Column 2 |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |"));
        assert_eq!(
            sheets(&r),
            vec![SheetSummary {
                name: "Data".into(),
                rows: 2,
                columns: 2
            }]
        );
    }

    #[test]
    fn rows_beyond_limit_are_cut_with_note() {
        let rows: Vec<Vec<u32>> = (1..=150).map(|i| vec![i]).collect();
        let r = run(xlsx(&[("Big", rows)])).unwrap();
        let body_rows = r
            .markdown()
            .lines()
            .filter(|l| l.starts_with("| ") && !l.contains("Column") && !l.contains("---"))
            .count();
        assert_eq!(body_rows, 100);
        assert!(r.markdown().contains("*Note: Only showing first 100 rows*"));
        assert_eq!(sheets(&r)[0].rows, 150);
    }

    #[test]
    fn empty_sheet_gets_placeholder() {
        let r = run(xlsx(&[("Blank", vec![]), ("Full", vec![vec![7]])])).unwrap();
        assert!(r.markdown().contains("## Sheet: Blank\n\n*Empty sheet*"));
        assert!(r.markdown().contains("## Sheet: Full"));
        assert_eq!(sheets(&r)[0].rows, 0);
    }

    #[test]
    fn missing_sheet_part_is_noted_and_others_render() {
        let book = xlsx(&[
            ("Kept", vec![vec![1]]),
            ("Lost", vec![vec![2]]),
            ("After", vec![vec![3]]),
        ]);
        let r = run(without_part(book, "xl/worksheets/sheet2.xml")).unwrap();
        assert!(r.markdown().contains("## Sheet: Lost\n\n*Unreadable sheet*"));
        assert!(r.markdown().contains("## Sheet: Kept\n\n| Column 1 |\n| --- |\n| 1 |"));
        assert!(r.markdown().contains("## Sheet: After\n\n| Column 1 |\n| --- |\n| 3 |"));

        let messages = r.metadata().get("messages").and_then(|v| v.as_list()).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Sheet 'Lost' could not be read"));
        assert_eq!(sheets(&r).len(), 3);
        assert_eq!(sheets(&r)[1].rows, 0);
    }

    #[test]
    fn whitespace_cells_keep_their_row() {
        assert!(!is_blank_row(&[Data::Empty, Data::String("  ".into())]));
        assert!(!is_blank_row(&[Data::Float(0.0)]));
        assert!(is_blank_row(&[Data::Empty, Data::String(String::new())]));
        assert!(is_blank_row(&[]));
    }

    #[test]
    fn unopenable_workbook_is_fatal() {
        let err = run(b"not a workbook".to_vec()).unwrap_err();
        assert!(err.to_string().starts_with("Error converting Excel file:"));
    }

    #[test]
    fn integral_floats_print_without_fraction() {
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
