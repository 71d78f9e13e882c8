//! DOCX document parser using zip and roxmltree.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use chrono::{DateTime, Utc};
use roxmltree::Node;
use zip::ZipArchive;

use crate::detect::{detect_format_from_bytes, ContainerKind};
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Numbering, Paragraph, ParagraphStyle, TextRun, TextStyle};

use super::options::ParseOptions;

const PACKAGE_RELS: &str = "_rels/.rels";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const CORE_PROPERTIES: &str = "docProps/core.xml";
const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_STYLES: &str = "/styles";
const DEFAULT_STYLE_NAME: &str = "Normal";

/// DOCX document parser.
///
/// Reads the main document part, the style definitions and the core
/// properties out of the package; [`DocxParser::parse`] turns them into a
/// [`Document`].
pub struct DocxParser {
    document_xml: String,
    styles_xml: Option<String>,
    core_xml: Option<String>,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a DOCX file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a DOCX from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a DOCX from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        if detect_format_from_bytes(data)? == ContainerKind::Empty {
            return Err(Error::MissingPart(DEFAULT_MAIN_PART.to_string()));
        }

        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let main_part = match read_part(&mut archive, PACKAGE_RELS)? {
            Some(rels) => find_relationship_target(&rels, "", REL_OFFICE_DOCUMENT)?,
            None => None,
        }
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        let document_xml = read_part(&mut archive, &main_part)?
            .ok_or_else(|| Error::MissingPart(main_part.clone()))?;

        let (dir, file) = split_part_name(&main_part);
        let part_rels = format!("{}_rels/{}.rels", dir, file);
        let styles_part = match read_part(&mut archive, &part_rels)? {
            Some(rels) => find_relationship_target(&rels, dir, REL_STYLES)?,
            None => None,
        }
        .unwrap_or_else(|| format!("{}styles.xml", dir));
        let styles_xml = read_part(&mut archive, &styles_part)?;

        let core_xml = if options.read_metadata {
            read_part(&mut archive, CORE_PROPERTIES)?
        } else {
            None
        };

        log::debug!(
            "Loaded DOCX package: main part {}, styles {}",
            main_part,
            if styles_xml.is_some() { "present" } else { "absent" }
        );

        Ok(Self {
            document_xml,
            styles_xml,
            core_xml,
            options,
        })
    }

    /// Parse a DOCX from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a DOCX from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse the document and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        let styles = match self.styles_xml {
            Some(ref xml) => StyleMap::parse(xml)?,
            None => StyleMap::default(),
        };

        let xml = roxmltree::Document::parse(&self.document_xml)?;
        let body = xml
            .root_element()
            .children()
            .find(|n| has_tag(*n, "body"))
            .ok_or_else(|| Error::MissingPart("w:body".to_string()))?;

        let mut nodes = Vec::new();
        collect_paragraphs(body, self.options.include_tables, &mut nodes);

        let mut document = Document::new();
        for node in nodes {
            document.add_paragraph(parse_paragraph(node, &styles));
        }

        if let Some(ref core) = self.core_xml {
            match parse_core_properties(core) {
                Ok(metadata) => document.metadata = metadata,
                Err(e) => log::warn!("Ignoring unreadable core properties: {}", e),
            }
        }

        log::debug!("Parsed {} paragraphs", document.paragraph_count());
        Ok(document)
    }
}

/// Style id → display name, plus the default paragraph style.
#[derive(Debug, Default)]
struct StyleMap {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleMap {
    fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut map = Self::default();

        for style in doc.descendants().filter(|n| has_tag(*n, "style")) {
            let Some(style_id) = attribute_value(style, "styleId") else {
                continue;
            };

            let name = child(style, "name")
                .and_then(|n| attribute_value(n, "val"))
                .unwrap_or(style_id)
                .to_string();

            let is_default = attribute_value(style, "default").is_some_and(is_true_value);
            if is_default && attribute_value(style, "type") == Some("paragraph") {
                map.default_paragraph = Some(name.clone());
            }

            map.names.insert(style_id.to_string(), name);
        }

        Ok(map)
    }

    /// Resolve a paragraph's style id; unknown or absent ids fall back to the
    /// default paragraph style.
    fn resolve(&self, style_id: Option<&str>) -> String {
        style_id
            .and_then(|id| self.names.get(id))
            .or(self.default_paragraph.as_ref())
            .cloned()
            .unwrap_or_else(|| DEFAULT_STYLE_NAME.to_string())
    }
}

fn collect_paragraphs<'a, 'i>(
    container: Node<'a, 'i>,
    include_tables: bool,
    out: &mut Vec<Node<'a, 'i>>,
) {
    for node in container.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "p" => out.push(node),
            "tbl" if include_tables => {
                for cell in node
                    .children()
                    .filter(|n| has_tag(*n, "tr"))
                    .flat_map(|row| row.children().filter(|n| has_tag(*n, "tc")))
                {
                    collect_paragraphs(cell, include_tables, out);
                }
            }
            _ => {}
        }
    }
}

fn parse_paragraph(node: Node<'_, '_>, styles: &StyleMap) -> Paragraph {
    let properties = child(node, "pPr");
    let style_id = properties
        .and_then(|p| child(p, "pStyle"))
        .and_then(|n| attribute_value(n, "val"));
    let numbering = properties
        .and_then(|p| child(p, "numPr"))
        .and_then(parse_numbering);

    let mut paragraph = Paragraph::new();
    paragraph.style = ParagraphStyle {
        style_name: Some(styles.resolve(style_id)),
        numbering,
    };

    for run in node.descendants().filter(|n| has_tag(*n, "r")) {
        if owning_paragraph(run) != Some(node) || is_deleted(run) {
            continue;
        }
        paragraph.add_run(parse_run(run));
    }

    paragraph
}

/// `numId` 0 explicitly removes numbering.
fn parse_numbering(num_pr: Node<'_, '_>) -> Option<Numbering> {
    let num_id = child(num_pr, "numId").and_then(|n| attribute_value(n, "val"));
    if num_id.map(str::trim) == Some("0") {
        return None;
    }

    let num_id = num_id.and_then(|v| v.trim().parse().ok()).unwrap_or(0);
    let level = child(num_pr, "ilvl")
        .and_then(|n| attribute_value(n, "val"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    Some(Numbering::new(num_id, level))
}

fn parse_run(run: Node<'_, '_>) -> TextRun {
    let properties = child(run, "rPr");
    let bold = properties
        .and_then(|p| child(p, "b"))
        .map(is_toggle_on)
        .unwrap_or(false);
    let highlight = properties
        .and_then(|p| child(p, "highlight"))
        .and_then(|n| attribute_value(n, "val"))
        .filter(|v| *v != "none")
        .map(str::to_string);

    let mut text = String::new();
    for node in run.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or("")),
            "tab" | "ptab" => text.push('\t'),
            "br" => match attribute_value(node, "type") {
                None | Some("textWrapping") => text.push('\n'),
                _ => {}
            },
            "cr" => text.push('\n'),
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }

    TextRun {
        text,
        style: TextStyle { bold, highlight },
    }
}

fn parse_core_properties(xml: &str) -> Result<Metadata> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut metadata = Metadata::default();

    for node in doc.root_element().children().filter(|n| n.is_element()) {
        let value = node.text().map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            continue;
        };

        match node.tag_name().name() {
            "title" => metadata.title = Some(value.to_string()),
            "subject" => metadata.subject = Some(value.to_string()),
            "creator" => metadata.creator = Some(value.to_string()),
            "created" => metadata.created = parse_w3c_date(value),
            "modified" => metadata.modified = parse_w3c_date(value),
            _ => {}
        }
    }

    Ok(metadata)
}

/// Parse a W3CDTF timestamp (e.g. `2024-01-15T10:30:45Z`).
fn parse_w3c_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| Error::Xml(format!("{}: {}", name, e)))?;

    match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => Ok(Some(stripped.to_string())),
        None => Ok(Some(content)),
    }
}

/// Find the target of the first relationship whose type ends with `type_suffix`.
fn find_relationship_target(rels_xml: &str, base_dir: &str, type_suffix: &str) -> Result<Option<String>> {
    let doc = roxmltree::Document::parse(rels_xml)?;

    Ok(doc
        .descendants()
        .filter(|n| has_tag(*n, "Relationship"))
        .find(|n| attribute_value(*n, "Type").is_some_and(|t| t.ends_with(type_suffix)))
        .and_then(|n| attribute_value(n, "Target"))
        .map(|target| resolve_target(base_dir, target)))
}

fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Split `word/document.xml` into (`word/`, `document.xml`).
fn split_part_name(part: &str) -> (&str, &str) {
    match part.rfind('/') {
        Some(idx) => (&part[..=idx], &part[idx + 1..]),
        None => ("", part),
    }
}

fn owning_paragraph<'a, 'i>(node: Node<'a, 'i>) -> Option<Node<'a, 'i>> {
    node.ancestors().skip(1).find(|n| has_tag(*n, "p"))
}

fn is_deleted(run: Node<'_, '_>) -> bool {
    run.ancestors()
        .skip(1)
        .take_while(|n| !has_tag(*n, "p"))
        .any(|n| has_tag(n, "del") || has_tag(n, "moveFrom"))
}

fn is_toggle_on(node: Node<'_, '_>) -> bool {
    attribute_value(node, "val").map_or(true, is_true_value)
}

fn is_true_value(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on"
    )
}

fn has_tag(node: Node<'_, '_>, expected: &str) -> bool {
    node.is_element() && node.tag_name().name() == expected
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|n| has_tag(*n, name))
}

/// Attribute lookup by local name, ignoring the namespace prefix.
fn attribute_value<'a>(node: Node<'a, '_>, key: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == key)
        .map(|a| a.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn parser(body: &str, styles: Option<&str>) -> DocxParser {
        DocxParser {
            document_xml: format!(
                r#"<w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
                W_NS, body
            ),
            styles_xml: styles.map(|s| format!(r#"<w:styles xmlns:w="{}">{}</w:styles>"#, W_NS, s)),
            core_xml: None,
            options: ParseOptions::default(),
        }
    }

    #[test]
    fn test_parse_runs_and_bold() {
        let doc = parser(
            r#"<w:p>
                <w:r><w:rPr><w:b/></w:rPr><w:t>Bold</w:t></w:r>
                <w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t xml:space="preserve"> not bold</w:t></w:r>
              </w:p>"#,
            None,
        )
        .parse()
        .unwrap();

        assert_eq!(doc.paragraph_count(), 1);
        let p = &doc.paragraphs[0];
        assert_eq!(p.plain_text(), "Bold not bold");
        assert!(p.runs[0].style.bold);
        assert!(!p.runs[1].style.bold);
        assert_eq!(p.style_name(), Some(DEFAULT_STYLE_NAME));
    }

    #[test]
    fn test_parse_style_names() {
        let styles = r#"
            <w:style w:type="paragraph" w:default="1" w:styleId="Body"><w:name w:val="Body Text"/></w:style>
            <w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>"#;
        let doc = parser(
            r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/></w:pPr><w:r><w:t>Item</w:t></w:r></w:p>
               <w:p><w:r><w:t>Plain</w:t></w:r></w:p>
               <w:p><w:pPr><w:pStyle w:val="Missing"/></w:pPr><w:r><w:t>Other</w:t></w:r></w:p>"#,
            Some(styles),
        )
        .parse()
        .unwrap();

        assert_eq!(doc.paragraphs[0].style_name(), Some("List Paragraph"));
        assert_eq!(doc.paragraphs[1].style_name(), Some("Body Text"));
        assert_eq!(doc.paragraphs[2].style_name(), Some("Body Text"));
    }

    #[test]
    fn test_parse_numbering() {
        let doc = parser(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr></w:pPr><w:r><w:t>One</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:numId w:val="0"/></w:numPr></w:pPr><w:r><w:t>Two</w:t></w:r></w:p>"#,
            None,
        )
        .parse()
        .unwrap();

        assert_eq!(
            doc.paragraphs[0].style.numbering,
            Some(Numbering::new(3, 1))
        );
        assert!(!doc.paragraphs[1].has_numbering());
    }

    #[test]
    fn test_parse_special_run_content() {
        let doc = parser(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br w:type="page"/></w:r>
               <w:hyperlink><w:r><w:t>-link</w:t></w:r></w:hyperlink>
               <w:del><w:r><w:delText>gone</w:delText></w:r></w:del></w:p>"#,
            None,
        )
        .parse()
        .unwrap();

        let p = &doc.paragraphs[0];
        assert_eq!(p.plain_text(), "a\tb\nc-link");
        assert_eq!(p.runs.len(), 2);
    }

    #[test]
    fn test_parse_highlight() {
        let doc = parser(
            r#"<w:p><w:r><w:rPr><w:highlight w:val="yellow"/></w:rPr><w:t>hit</w:t></w:r>
               <w:r><w:rPr><w:highlight w:val="none"/></w:rPr><w:t>miss</w:t></w:r></w:p>"#,
            None,
        )
        .parse()
        .unwrap();

        let p = &doc.paragraphs[0];
        assert!(p.runs[0].is_highlighted());
        assert!(!p.runs[1].is_highlighted());
    }

    #[test]
    fn test_tables_skipped_by_default() {
        let body = r#"<w:p><w:r><w:t>top</w:t></w:r></w:p>
            <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;

        let doc = parser(body, None).parse().unwrap();
        assert_eq!(doc.paragraph_count(), 1);

        let mut with_tables = parser(body, None);
        with_tables.options = ParseOptions::new().with_tables(true);
        let doc = with_tables.parse().unwrap();
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.paragraphs[1].plain_text(), "cell");
    }

    #[test]
    fn test_malformed_document_xml() {
        let mut p = parser("", None);
        p.document_xml = "<w:document><w:body>".to_string();
        assert!(matches!(p.parse(), Err(Error::Xml(_))));
    }

    #[test]
    fn test_parse_core_properties() {
        let xml = r#"<cp:coreProperties
            xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
            xmlns:dc="http://purl.org/dc/elements/1.1/"
            xmlns:dcterms="http://purl.org/dc/terms/">
            <dc:title>Checklist</dc:title>
            <dc:creator>QA</dc:creator>
            <dcterms:created>2024-01-15T10:30:45Z</dcterms:created>
        </cp:coreProperties>"#;

        let metadata = parse_core_properties(xml).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Checklist"));
        assert_eq!(metadata.creator.as_deref(), Some("QA"));
        assert_eq!(metadata.created.unwrap().year(), 2024);
        assert!(metadata.modified.is_none());
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word/", "styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word/", "/word/styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word/sub/", "../styles.xml"), "word/styles.xml");
    }

    #[test]
    fn test_split_part_name() {
        assert_eq!(split_part_name("word/document.xml"), ("word/", "document.xml"));
        assert_eq!(split_part_name("document.xml"), ("", "document.xml"));
    }

    #[test]
    fn test_from_bytes_rejects_non_zip() {
        assert!(matches!(
            DocxParser::from_bytes(b"not a docx at all"),
            Err(Error::UnknownFormat)
        ));
    }
}
