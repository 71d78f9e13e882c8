//! DOCX (WordprocessingML) writer.
//!
//! Produces a minimal package: content types, package relationships, the
//! main document part with its styles, plus numbering definitions and core
//! properties when the document needs them. Highlighted runs carry
//! `<w:highlight w:val="yellow"/>`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{Cursor, Seek, Write};

use chrono::SecondsFormat;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Paragraph, TextRun};

use super::RenderOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

const DEFAULT_STYLE_ID: &str = "Normal";

/// Serialize a document to DOCX bytes.
pub fn to_docx(doc: &Document, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    DocxWriter::new(options).write(doc, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Writes documents as DOCX packages.
#[derive(Debug, Clone)]
pub struct DocxWriter {
    include_metadata: bool,
}

impl DocxWriter {
    /// Create a writer with the given options.
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            include_metadata: options.include_metadata,
        }
    }

    /// Write a DOCX package to `writer`.
    ///
    /// Fails with [`Error::InvalidXmlChar`] if any run contains a character
    /// that XML 1.0 cannot represent. Nothing is written in that case.
    pub fn write<W: Write + Seek>(&self, doc: &Document, writer: W) -> Result<()> {
        let styles = StyleTable::collect(doc);
        let body = document_xml(doc, &styles)?;

        let num_ids = numbering_ids(doc);
        let metadata = (self.include_metadata && !doc.metadata.is_empty())
            .then_some(&doc.metadata);

        let mut zip = ZipWriter::new(writer);
        let file_options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut put = |name: &str, content: &str| -> Result<()> {
            zip.start_file(name, file_options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        put(
            "[Content_Types].xml",
            &content_types_xml(!num_ids.is_empty(), metadata.is_some()),
        )?;
        put("_rels/.rels", &package_rels_xml(metadata.is_some()))?;
        put("word/document.xml", &body)?;
        put(
            "word/_rels/document.xml.rels",
            &document_rels_xml(!num_ids.is_empty()),
        )?;
        put("word/styles.xml", &styles.to_xml())?;
        if !num_ids.is_empty() {
            put("word/numbering.xml", &numbering_xml(&num_ids))?;
        }
        if let Some(metadata) = metadata {
            put("docProps/core.xml", &core_xml(metadata))?;
        }

        zip.finish()?;
        log::debug!(
            "Wrote DOCX: {} paragraphs, {} highlighted runs",
            doc.paragraph_count(),
            doc.highlighted_count()
        );
        Ok(())
    }
}

/// Paragraph style names mapped to generated style ids.
struct StyleTable {
    ids: BTreeMap<String, String>,
}

impl StyleTable {
    fn collect(doc: &Document) -> Self {
        let mut ids = BTreeMap::new();
        let mut taken: Vec<String> = vec![DEFAULT_STYLE_ID.to_string()];

        for name in doc.paragraphs.iter().filter_map(|p| p.style_name()) {
            if name == DEFAULT_STYLE_ID || ids.contains_key(name) {
                continue;
            }

            let base: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            let base = if base.is_empty() {
                "Style".to_string()
            } else {
                base
            };
            let mut id = base.clone();
            let mut n = 1;
            while taken.contains(&id) {
                n += 1;
                id = format!("{}{}", base, n);
            }

            taken.push(id.clone());
            ids.insert(name.to_string(), id);
        }

        Self { ids }
    }

    fn id_of(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        let _ = write!(xml, r#"<w:styles xmlns:w="{}">"#, W_NS);
        let _ = write!(
            xml,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="{0}"><w:name w:val="{0}"/><w:qFormat/></w:style>"#,
            DEFAULT_STYLE_ID
        );
        for (name, id) in &self.ids {
            let _ = write!(
                xml,
                r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{}"><w:name w:val="{}"/><w:basedOn w:val="{}"/></w:style>"#,
                id,
                escape_attr(name),
                DEFAULT_STYLE_ID
            );
        }
        xml.push_str("</w:styles>");
        xml
    }
}

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

fn document_xml(doc: &Document, styles: &StyleTable) -> Result<String> {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<w:document xmlns:w="{}" xmlns:r="{}"><w:body>"#, W_NS, R_NS);

    for (index, paragraph) in doc.paragraphs.iter().enumerate() {
        write_paragraph(&mut xml, paragraph, styles, index + 1)?;
    }

    xml.push_str(
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
    );
    xml.push_str("</w:body></w:document>");
    Ok(xml)
}

fn write_paragraph(
    xml: &mut String,
    paragraph: &Paragraph,
    styles: &StyleTable,
    line: usize,
) -> Result<()> {
    xml.push_str("<w:p>");

    let style_id = paragraph.style_name().and_then(|name| styles.id_of(name));
    if style_id.is_some() || paragraph.style.numbering.is_some() {
        xml.push_str("<w:pPr>");
        if let Some(id) = style_id {
            let _ = write!(xml, r#"<w:pStyle w:val="{}"/>"#, id);
        }
        if let Some(numbering) = paragraph.style.numbering {
            let _ = write!(
                xml,
                r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
                numbering.level, numbering.num_id
            );
        }
        xml.push_str("</w:pPr>");
    }

    for run in paragraph.runs.iter().filter(|r| !r.is_empty()) {
        write_run(xml, run, line)?;
    }

    xml.push_str("</w:p>");
    Ok(())
}

fn write_run(xml: &mut String, run: &TextRun, line: usize) -> Result<()> {
    xml.push_str("<w:r>");

    if run.style.bold || run.style.highlight.is_some() {
        xml.push_str("<w:rPr>");
        if run.style.bold {
            xml.push_str("<w:b/>");
        }
        if let Some(color) = &run.style.highlight {
            let _ = write!(xml, r#"<w:highlight w:val="{}"/>"#, escape_attr(color));
        }
        xml.push_str("</w:rPr>");
    }

    let mut pending = String::new();
    for c in run.text.chars() {
        match c {
            '\t' => {
                flush_text(xml, &mut pending);
                xml.push_str("<w:tab/>");
            }
            '\n' | '\r' => {
                flush_text(xml, &mut pending);
                xml.push_str("<w:br/>");
            }
            c if !is_xml_char(c) => {
                return Err(Error::InvalidXmlChar {
                    code: c as u32,
                    line,
                });
            }
            '&' => pending.push_str("&amp;"),
            '<' => pending.push_str("&lt;"),
            '>' => pending.push_str("&gt;"),
            c => pending.push(c),
        }
    }
    flush_text(xml, &mut pending);

    xml.push_str("</w:r>");
    Ok(())
}

fn flush_text(xml: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, pending);
    pending.clear();
}

/// Characters allowed by the XML 1.0 `Char` production.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn numbering_ids(doc: &Document) -> Vec<u32> {
    let mut ids: Vec<u32> = doc
        .paragraphs
        .iter()
        .filter_map(|p| p.style.numbering)
        .map(|n| n.num_id)
        .filter(|id| *id != 0)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn numbering_xml(num_ids: &[u32]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<w:numbering xmlns:w="{}">"#, W_NS);

    xml.push_str(r#"<w:abstractNum w:abstractNumId="0">"#);
    for level in 0..9u32 {
        let _ = write!(
            xml,
            r#"<w:lvl w:ilvl="{0}"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="&#8226;"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{1}" w:hanging="360"/></w:pPr></w:lvl>"#,
            level,
            720 * (level + 1)
        );
    }
    xml.push_str("</w:abstractNum>");

    for id in num_ids {
        let _ = write!(
            xml,
            r#"<w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num>"#,
            id
        );
    }
    xml.push_str("</w:numbering>");
    xml
}

fn content_types_xml(numbering: bool, core: bool) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    );
    if numbering {
        xml.push_str(
            r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#,
        );
    }
    if core {
        xml.push_str(
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
        );
    }
    xml.push_str("</Types>");
    xml
}

fn package_rels_xml(core: bool) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, PKG_REL_NS);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}" Target="word/document.xml"/>"#,
        REL_OFFICE_DOCUMENT
    );
    if core {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId2" Type="{}" Target="docProps/core.xml"/>"#,
            REL_CORE
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn document_rels_xml(numbering: bool) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, PKG_REL_NS);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}" Target="styles.xml"/>"#,
        REL_STYLES
    );
    if numbering {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId2" Type="{}" Target="numbering.xml"/>"#,
            REL_NUMBERING
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn core_xml(metadata: &Metadata) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );

    let text_fields = [
        ("dc:title", &metadata.title),
        ("dc:subject", &metadata.subject),
        ("dc:creator", &metadata.creator),
    ];
    for (tag, value) in text_fields {
        if let Some(value) = value {
            let _ = write!(xml, "<{0}>{1}</{0}>", tag, escape_attr(value));
        }
    }

    let date_fields = [
        ("dcterms:created", &metadata.created),
        ("dcterms:modified", &metadata.modified),
    ];
    for (tag, value) in date_fields {
        if let Some(date) = value {
            let _ = write!(
                xml,
                r#"<{0} xsi:type="dcterms:W3CDTF">{1}</{0}>"#,
                tag,
                date.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
    }

    xml.push_str("</cp:coreProperties>");
    xml
}
