//! Word documents: `word/document.xml` walked with `quick-xml`, in memory.
//!
//! Structure kept: Title/Heading styles, list paragraphs, bold/italic runs,
//! hyperlinks (resolved through `word/_rels/document.xml.rels`), tables,
//! tabs and breaks. Text boxes become blocks of their own, placed after the
//! paragraph they are anchored in. Anything skipped or guessed is reported in
//! `metadata.messages` rather than failing the conversion.

use crate::config::ConversionConfig;
use crate::converters::table::{render_table, sanitize_cell};
use crate::converters::unknown;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{BTreeSet, HashMap};
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";

/// Compound File Binary signature of legacy `.doc` files.
const OLE_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

pub fn convert(file: &SourceFile, config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    if file.bytes.starts_with(&OLE_MAGIC) {
        return Ok(legacy_binary(file, config));
    }

    let mut archive =
        ZipArchive::new(Cursor::new(&file.bytes)).map_err(|e| ConvertError::conversion("DOCX", e))?;
    let document = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| ConvertError::conversion("DOCX", format!("missing {DOCUMENT_PART}")))?;
    let links = match read_part(&mut archive, RELS_PART) {
        Ok(Some(rels)) => parse_relationships(&rels),
        _ => HashMap::new(),
    };

    let mut walker = DocumentWalker::new(&links);
    walker.walk(&document);
    let (markdown, messages) = walker.finish();

    debug!("DOCX '{}': {} bytes of markdown, {} messages", file.filename, markdown.len(), messages.len());
    for message in &messages {
        warn!("DOCX '{}': {}", file.filename, message);
    }

    let declared = file.content_type_or_default();
    let metadata = Metadata::basic(&file.filename, declared, file.size()).with("messages", messages);
    Ok(ConversionResult::new(markdown, metadata, declared))
}

/// Legacy `.doc` binaries have no XML body; summarise them instead.
fn legacy_binary(file: &SourceFile, config: &ConversionConfig) -> ConversionResult {
    warn!("'{}' is a legacy Word binary, falling back to a file summary", file.filename);
    let (markdown, mut metadata, content_type, _) = unknown::summarize(file, config).into_parts();
    metadata.insert(
        "messages",
        vec!["Legacy Word binary format (.doc) cannot be converted structurally; showing a file summary".to_string()],
    );
    ConversionResult::new(markdown, metadata, content_type)
}

/// Read one archive member as UTF-8. `Ok(None)` when the member is absent.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>, ConvertError> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ConvertError::conversion("DOCX", e)),
    };
    let mut content = String::new();
    part.read_to_string(&mut content)
        .map_err(|e| ConvertError::conversion("DOCX", format!("{name}: {e}")))?;
    Ok(Some(content))
}

/// Relationship id → target, from the document's `.rels` part.
fn parse_relationships(xml: &str) -> HashMap<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut links = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (get_attribute(e, "Id"), get_attribute(e, "Target")) {
                    links.insert(id, target);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    links
}

fn get_attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// `w:b` / `w:i` toggles: present means on unless `w:val` says otherwise.
fn toggle_on(e: &BytesStart) -> bool {
    !matches!(get_attribute(e, "val").as_deref(), Some("0" | "false" | "off" | "none"))
}

#[derive(Default)]
struct Paragraph {
    style: Option<String>,
    numbered: bool,
    text: String,
}

/// Runs, hyperlinks and tables remember how many paragraphs were open when
/// they started, so content inside a text box stays with the text box.
#[derive(Default)]
struct Run {
    depth: usize,
    bold: bool,
    italic: bool,
    text: String,
}

struct Hyperlink {
    depth: usize,
    target: Option<String>,
    text: String,
}

#[derive(Default)]
struct Table {
    depth: usize,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

/// An emitted top-level block; consecutive list items share a line break.
struct Block {
    text: String,
    list_item: bool,
}

struct DocumentWalker<'a> {
    links: &'a HashMap<String, String>,
    blocks: Vec<Block>,
    paragraphs: Vec<Paragraph>,
    runs: Vec<Run>,
    in_text: bool,
    hyperlinks: Vec<Hyperlink>,
    tables: Vec<Table>,
    /// Open drawing-like elements; `true` once a text box is seen inside.
    drawings: Vec<bool>,
    /// Text-box blocks waiting for their anchoring paragraph to close,
    /// keyed by the paragraph depth they were produced at.
    deferred: Vec<(usize, Block)>,
    /// `mc:Fallback` nesting; fallbacks repeat their `mc:Choice` content.
    fallback_depth: usize,
    images: usize,
    unknown_styles: BTreeSet<String>,
    messages: Vec<String>,
}

impl<'a> DocumentWalker<'a> {
    fn new(links: &'a HashMap<String, String>) -> Self {
        Self {
            links,
            blocks: Vec::new(),
            paragraphs: Vec::new(),
            runs: Vec::new(),
            in_text: false,
            hyperlinks: Vec::new(),
            tables: Vec::new(),
            drawings: Vec::new(),
            deferred: Vec::new(),
            fallback_depth: 0,
            images: 0,
            unknown_styles: BTreeSet::new(),
            messages: Vec::new(),
        }
    }

    fn walk(&mut self, xml: &str) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"Fallback" => self.fallback_depth += 1,
                Ok(Event::End(ref e)) if e.local_name().as_ref() == b"Fallback" => {
                    self.fallback_depth = self.fallback_depth.saturating_sub(1);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    self.messages.push(format!(
                        "XML error at position {}: {}; content after this point was dropped",
                        reader.error_position(),
                        e
                    ));
                    self.unwind();
                    break;
                }
                _ if self.fallback_depth > 0 => {}
                Ok(Event::Start(ref e)) => self.open(e),
                Ok(Event::Empty(ref e)) => {
                    self.open(e);
                    self.close(e.local_name().as_ref());
                }
                Ok(Event::End(ref e)) => self.close(e.local_name().as_ref()),
                Ok(Event::Text(ref t)) if self.in_text => {
                    if let Ok(text) = t.unescape() {
                        if let Some(run) = self.current_run() {
                            run.text.push_str(&text);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Close everything still open so text read before an error is kept.
    fn unwind(&mut self) {
        loop {
            let depth = self.paragraphs.len();
            if self.runs.last().is_some_and(|r| r.depth == depth) {
                self.close(b"r");
            } else if self.hyperlinks.last().is_some_and(|h| h.depth == depth) {
                self.close(b"hyperlink");
            } else if depth > 0 {
                self.close(b"p");
            } else {
                break;
            }
        }
    }

    /// The innermost run, if it belongs to the innermost paragraph.
    fn current_run(&mut self) -> Option<&mut Run> {
        let depth = self.paragraphs.len();
        self.runs.last_mut().filter(|r| r.depth == depth)
    }

    fn open(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"p" => self.paragraphs.push(Paragraph::default()),
            b"pStyle" => {
                if let Some(p) = self.paragraphs.last_mut() {
                    p.style = get_attribute(e, "val");
                }
            }
            b"numPr" => {
                if let Some(p) = self.paragraphs.last_mut() {
                    p.numbered = true;
                }
            }
            b"r" => {
                let depth = self.paragraphs.len();
                self.runs.push(Run {
                    depth,
                    ..Run::default()
                });
            }
            b"b" => {
                if let Some(run) = self.current_run() {
                    run.bold = toggle_on(e);
                }
            }
            b"i" => {
                if let Some(run) = self.current_run() {
                    run.italic = toggle_on(e);
                }
            }
            b"t" => self.in_text = true,
            b"tab" => self.push_run_char('\t'),
            b"br" | b"cr" => self.push_run_char('\n'),
            b"drawing" | b"pict" | b"object" => self.drawings.push(false),
            b"txbxContent" => {
                if let Some(has_text_box) = self.drawings.last_mut() {
                    *has_text_box = true;
                }
            }
            b"hyperlink" => {
                let target = match get_attribute(e, "id") {
                    Some(id) => {
                        let target = self.links.get(&id).cloned();
                        if target.is_none() {
                            self.messages.push(format!("Unresolved hyperlink relationship '{id}'"));
                        }
                        target
                    }
                    None => None,
                };
                self.hyperlinks.push(Hyperlink {
                    depth: self.paragraphs.len(),
                    target,
                    text: String::new(),
                });
            }
            b"tbl" => {
                let depth = self.paragraphs.len();
                self.tables.push(Table {
                    depth,
                    ..Table::default()
                });
            }
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    table.row.clear();
                }
            }
            b"tc" => {
                if let Some(table) = self.tables.last_mut() {
                    table.cell.clear();
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"r" => {
                if let Some(run) = self.runs.pop() {
                    let text = emphasize(&run.text, run.bold, run.italic);
                    match self.hyperlinks.last_mut().filter(|h| h.depth == run.depth) {
                        Some(link) => link.text.push_str(&text),
                        None => {
                            if let Some(p) = self.paragraphs.last_mut() {
                                p.text.push_str(&text);
                            }
                        }
                    }
                }
            }
            b"hyperlink" => {
                if let Some(link) = self.hyperlinks.pop() {
                    let text = match link.target {
                        Some(url) if !link.text.trim().is_empty() => format!("[{}]({})", link.text, url),
                        _ => link.text,
                    };
                    if let Some(p) = self.paragraphs.last_mut() {
                        p.text.push_str(&text);
                    }
                }
            }
            b"drawing" | b"pict" | b"object" => {
                if let Some(false) = self.drawings.pop() {
                    self.images += 1;
                }
            }
            b"p" => {
                if let Some(p) = self.paragraphs.pop() {
                    self.finish_paragraph(p);
                    self.release_deferred();
                }
            }
            b"tc" => {
                if let Some(table) = self.tables.last_mut() {
                    let cell = std::mem::take(&mut table.cell).join(" ");
                    table.row.push(cell);
                }
            }
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            b"tbl" => {
                if let Some(table) = self.tables.pop() {
                    self.finish_table(table);
                }
            }
            _ => {}
        }
    }

    fn push_run_char(&mut self, ch: char) {
        if let Some(run) = self.current_run() {
            run.text.push(ch);
        }
    }

    /// Route a finished block to the enclosing table cell, the enclosing
    /// paragraph's deferred list, or the document.
    fn place(&mut self, block: Block) {
        let depth = self.paragraphs.len();
        match self.tables.last_mut() {
            Some(table) if table.depth == depth => table.cell.push(sanitize_cell(&block.text)),
            _ if depth > 0 => self.deferred.push((depth, block)),
            _ => self.blocks.push(block),
        }
    }

    /// Text-box blocks follow the paragraph that anchored them.
    fn release_deferred(&mut self) {
        let depth = self.paragraphs.len();
        let (ready, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.deferred).into_iter().partition(|(d, _)| *d > depth);
        self.deferred = waiting;
        for (_, block) in ready {
            self.place(block);
        }
    }

    fn finish_paragraph(&mut self, p: Paragraph) {
        let text = p.text.trim();
        if text.is_empty() {
            return;
        }

        let style = p.style.as_deref().unwrap_or("Normal");
        let heading = heading_level(style);
        let list_item = p.numbered || style.starts_with("List");
        if heading.is_none() && !list_item && !is_body_style(style) {
            self.unknown_styles.insert(style.to_string());
        }

        let line = match heading {
            Some(level) => format!("{} {}", "#".repeat(level), text.replace('\n', " ")),
            None if list_item => format!("- {text}"),
            None => text.to_string(),
        };

        self.place(Block {
            text: line,
            list_item: list_item && heading.is_none(),
        });
    }

    fn finish_table(&mut self, table: Table) {
        let width = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return;
        }
        let Some((first, rest)) = table.rows.split_first() else {
            return;
        };

        let depth = self.paragraphs.len();
        if let Some(outer) = self.tables.last_mut().filter(|t| t.depth == depth) {
            // Nested table: flatten into the enclosing cell.
            outer.cell.push(table.rows.iter().flatten().cloned().collect::<Vec<_>>().join(" "));
            return;
        }

        let mut header = first.clone();
        header.resize(width, String::new());
        let rendered = render_table(&header, rest);
        self.place(Block {
            text: rendered.trim_end().to_string(),
            list_item: false,
        });
    }

    fn finish(mut self) -> (String, Vec<String>) {
        // Anything still deferred had its anchor cut off by an XML error.
        for (_, block) in std::mem::take(&mut self.deferred) {
            self.blocks.push(block);
        }
        if self.images > 0 {
            self.messages.push(format!("{} image(s) omitted", self.images));
        }
        for style in &self.unknown_styles {
            self.messages
                .push(format!("Unrecognised paragraph style '{style}' rendered as plain text"));
        }

        let mut out = String::new();
        let mut previous_list = false;
        for block in &self.blocks {
            if !out.is_empty() {
                out.push_str(if previous_list && block.list_item { "\n" } else { "\n\n" });
            }
            out.push_str(&block.text);
            previous_list = block.list_item;
        }
        (out, self.messages)
    }
}

/// `Title` → 1, `Heading3` / `heading 3` → 3, capped at 6.
fn heading_level(style: &str) -> Option<usize> {
    if style.eq_ignore_ascii_case("title") {
        return Some(1);
    }
    let lower = style.to_ascii_lowercase();
    let digits = lower.strip_prefix("heading")?.trim();
    digits.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n.min(6))
}

fn is_body_style(style: &str) -> bool {
    matches!(style, "Normal" | "NoSpacing" | "Subtitle" | "Quote" | "Caption")
        || style.starts_with("BodyText")
        || style.starts_with("TableContents")
}

/// Wrap the non-blank core of `text` in markdown emphasis, keeping the
/// surrounding whitespace outside the markers.
fn emphasize(text: &str, bold: bool, italic: bool) -> String {
    let core = text.trim();
    if core.is_empty() || (!bold && !italic) {
        return text.to_string();
    }
    let marker = match (bold, italic) {
        (true, true) => "***",
        (true, false) => "**",
        _ => "*",
    };
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();
    format!("{}{marker}{core}{marker}{}", &text[..start], &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const W_NS: &str = concat!(
        r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" "#,
        r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" "#,
        r#"xmlns:v="urn:schemas-microsoft-com:vml""#,
    );

    fn docx(body: &str, rels: Option<&str>) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        zip.start_file(DOCUMENT_PART, opts).unwrap();
        write!(zip, r#"<?xml version="1.0" encoding="UTF-8"?><w:document {W_NS}><w:body>{body}</w:body></w:document>"#).unwrap();
        if let Some(rels) = rels {
            zip.start_file(RELS_PART, opts).unwrap();
            write!(
                zip,
                r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
            )
            .unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn para(style: Option<&str>, runs: &str) -> String {
        let ppr = style
            .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{s}"/></w:pPr>"#))
            .unwrap_or_default();
        format!("<w:p>{ppr}{runs}</w:p>")
    }

    fn run(text: &str) -> String {
        format!(r#"<w:r><w:t xml:space="preserve">{text}</w:t></w:r>"#)
    }

    fn convert_bytes(bytes: Vec<u8>) -> Result<ConversionResult, ConvertError> {
        let file = SourceFile::new(bytes, Some(crate::formats::DOCX_MIME), "memo.docx");
        convert(&file, &ConversionConfig::default())
    }

    fn messages(r: &ConversionResult) -> Vec<String> {
        r.metadata().get("messages").and_then(|v| v.as_list()).unwrap().to_vec()
    }

    #[test]
    fn headings_lists_and_emphasis() {
        let body = [
            para(Some("Title"), &run("Memo")),
            para(Some("Heading2"), &run("Agenda")),
            para(
                Some("ListParagraph"),
                r#"<w:r><w:rPr><w:b/></w:rPr><w:t>First</w:t></w:r>"#,
            ),
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>Second</w:t></w:r></w:p>"#.to_string(),
            para(
                None,
                &format!(r#"{}<w:r><w:rPr><w:i/></w:rPr><w:t>now</w:t></w:r>"#, run("Act ")),
            ),
        ]
        .concat();
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert_eq!(r.markdown(), "# Memo\n\n## Agenda\n\n- **First**\n- Second\n\nAct *now*");
        assert!(messages(&r).is_empty());
    }

    #[test]
    fn hyperlinks_resolve_through_relationships() {
        let body = para(
            None,
            &format!(r#"{}<w:hyperlink r:id="rId7">{}</w:hyperlink>"#, run("See "), run("the site")),
        );
        let rels = r#"<Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>"#;
        let r = convert_bytes(docx(&body, Some(rels))).unwrap();
        assert_eq!(r.markdown(), "See [the site](https://example.com)");
    }

    #[test]
    fn tables_become_markdown_tables() {
        let cell = |t: &str| format!("<w:tc>{}</w:tc>", para(None, &run(t)));
        let body = format!(
            "<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
            cell("Name"),
            cell("Qty"),
            cell("Pen"),
            cell("3")
        );
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert_eq!(r.markdown(), "| Name | Qty |\n| --- | --- |\n| Pen | 3 |");
    }

    #[test]
    fn images_and_unknown_styles_are_reported() {
        let body = [
            para(Some("FancyQuote"), &run("Styled")),
            para(None, "<w:r><w:drawing/></w:r>"),
        ]
        .concat();
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert_eq!(r.markdown(), "Styled");
        let msgs = messages(&r);
        assert!(msgs.iter().any(|m| m.contains("1 image(s) omitted")));
        assert!(msgs.iter().any(|m| m.contains("FancyQuote")));
    }

    fn text_box(inner: &str) -> String {
        format!(r#"<w:r><w:drawing><wps:wsp><wps:txbx><w:txbxContent>{inner}</w:txbxContent></wps:txbx></wps:wsp></w:drawing></w:r>"#)
    }

    #[test]
    fn text_box_keeps_surrounding_paragraph() {
        let body = para(
            None,
            &format!(
                "{}{}{}",
                run("Before box "),
                text_box(&para(None, &run("Inside box"))),
                run("after box")
            ),
        );
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert_eq!(r.markdown(), "Before box after box\n\nInside box");
        assert!(messages(&r).is_empty());
    }

    #[test]
    fn text_box_formatting_stays_inside_the_box() {
        let inner = r#"<w:p><w:pPr><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:rPr><w:i/></w:rPr><w:t>Note</w:t></w:r></w:p>"#;
        let body = para(None, &format!("{}{}", text_box(inner), run("Plain")));
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert_eq!(r.markdown(), "Plain\n\n*Note*");
    }

    #[test]
    fn alternate_content_fallback_is_not_repeated() {
        let choice = text_box(&para(None, &run("Boxed")));
        let fallback = format!(
            r#"<w:r><w:pict><v:shape><v:textbox><w:txbxContent>{}</w:txbxContent></v:textbox></v:shape></w:pict></w:r>"#,
            para(None, &run("Boxed"))
        );
        let body = [
            para(
                None,
                &format!(
                    "{}<mc:AlternateContent><mc:Choice Requires=\"wps\">{choice}</mc:Choice><mc:Fallback>{fallback}</mc:Fallback></mc:AlternateContent>",
                    run("Lead")
                ),
            ),
            para(None, "<w:r><w:drawing/></w:r>"),
        ]
        .concat();
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert_eq!(r.markdown(), "Lead\n\nBoxed");
        assert_eq!(messages(&r), vec!["1 image(s) omitted".to_string()]);
    }

    #[test]
    fn xml_error_keeps_partial_output() {
        let body = format!("{}<w:p><w:r><w:t>broken</w:r></w:p>", para(None, &run("Kept")));
        let r = convert_bytes(docx(&body, None)).unwrap();
        assert!(r.markdown().starts_with("Kept"));
        assert!(messages(&r).iter().any(|m| m.starts_with("XML error")));
    }

    #[test]
    fn not_a_zip_is_fatal() {
        let err = convert_bytes(b"plain text pretending".to_vec()).unwrap_err();
        assert!(err.to_string().starts_with("Error converting DOCX:"));
    }

    #[test]
    fn zip_without_document_part_is_fatal() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("hello.txt", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"hi").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let err = convert_bytes(bytes).unwrap_err();
        assert!(err.to_string().contains("missing word/document.xml"));
    }

    #[test]
    fn legacy_doc_binary_degrades_to_summary() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0xA1, 0xB1, 0x1A, 0xE1, 0xFF, 0x00]);
        let file = SourceFile::new(bytes, Some("application/msword"), "old.doc");
        let r = convert(&file, &ConversionConfig::default()).unwrap();
        assert!(r.markdown().starts_with("# Binary File: old.doc"));
        assert!(messages(&r)[0].contains("Legacy Word binary"));
    }

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level("Title"), Some(1));
        assert_eq!(heading_level("Heading3"), Some(3));
        assert_eq!(heading_level("heading 9"), Some(6));
        assert_eq!(heading_level("HeadingX"), None);
        assert_eq!(heading_level("Normal"), None);
    }

    #[test]
    fn emphasis_keeps_outer_whitespace() {
        assert_eq!(emphasize(" bold ", true, false), " **bold** ");
        assert_eq!(emphasize("x", true, true), "***x***");
        assert_eq!(emphasize("  ", true, false), "  ");
    }
}
