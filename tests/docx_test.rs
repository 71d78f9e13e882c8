//! Integration tests for DOCX reading and writing.

use std::io::{Cursor, Write};

use refmark::extract::PhraseExtractor;
use refmark::render::{to_docx, RenderOptions};
use refmark::{
    parse_reference_bytes, Document, DocxParser, Error, ExtractionPolicy, Numbering, Paragraph,
    ParseOptions, HIGHLIGHT_COLOR,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const LIST_STYLES: &str = r#"
    <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
    <w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>
    <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>
    <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
"#;

/// Build an in-memory DOCX package from raw parts.
fn package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn document_part(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
        W_NS, body
    )
}

fn styles_part(styles: &str) -> String {
    format!(r#"<w:styles xmlns:w="{}">{}</w:styles>"#, W_NS, styles)
}

/// A reference DOCX with the default part layout.
fn reference_docx(body: &str) -> Vec<u8> {
    package(&[
        ("word/document.xml", document_part(body)),
        ("word/styles.xml", styles_part(LIST_STYLES)),
    ])
}

fn mixed_reference() -> Vec<u8> {
    reference_docx(
        r#"
        <w:p><w:r><w:t>Introduction to the checklist</w:t></w:r></w:p>
        <w:p><w:pPr><w:pStyle w:val="ListParagraph"/></w:pPr><w:r><w:t>Safety Requirements</w:t></w:r></w:p>
        <w:p><w:pPr><w:pStyle w:val="ListBullet"/></w:pPr><w:r><w:t>Access Control</w:t></w:r></w:p>
        <w:p><w:r><w:t>• Audit Logging</w:t></w:r></w:p>
        <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Encryption at Rest</w:t></w:r></w:p>
        <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="4"/></w:numPr></w:pPr><w:r><w:t>1. Key Rotation</w:t></w:r></w:p>
        <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Appendix</w:t></w:r></w:p>
        <w:p><w:r><w:t>   </w:t></w:r></w:p>
        "#,
    )
}

#[test]
fn test_parse_reference_paragraphs() {
    let doc = parse_reference_bytes(&mixed_reference()).unwrap();

    assert_eq!(doc.paragraph_count(), 8);
    assert_eq!(doc.paragraphs[0].style_name(), Some("Normal"));
    assert_eq!(doc.paragraphs[1].style_name(), Some("List Paragraph"));
    assert_eq!(doc.paragraphs[2].style_name(), Some("List Bullet"));
    assert!(doc.paragraphs[4].runs[0].style.bold);
    assert_eq!(
        doc.paragraphs[5].style.numbering,
        Some(Numbering::new(4, 0))
    );
}

#[test]
fn test_extract_full_policy() {
    let doc = parse_reference_bytes(&mixed_reference()).unwrap();
    let phrases = PhraseExtractor::new().extract(&doc);

    assert_eq!(
        phrases.as_slice(),
        [
            "Safety Requirements",
            "Encryption at Rest",
            "Access Control",
            "Audit Logging",
            "Key Rotation",
        ]
    );
}

#[test]
fn test_extract_bullet_or_style_policy() {
    let doc = parse_reference_bytes(&mixed_reference()).unwrap();
    let phrases = PhraseExtractor::with_policy(ExtractionPolicy::BulletOrStyleOnly).extract(&doc);

    assert_eq!(
        phrases.as_slice(),
        ["Safety Requirements", "Access Control", "Audit Logging"]
    );
    assert!(!phrases.contains("Encryption at Rest"));
    assert!(!phrases.contains("Key Rotation"));
}

#[test]
fn test_explicit_bold_off_is_not_bold() {
    let data = reference_docx(
        r#"<w:p><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>Not Emphasized</w:t></w:r></w:p>
           <w:p><w:r><w:rPr><w:b w:val="true"/></w:rPr><w:t>Emphasized</w:t></w:r></w:p>"#,
    );
    let doc = parse_reference_bytes(&data).unwrap();
    let phrases = PhraseExtractor::new().extract(&doc);

    assert_eq!(phrases.as_slice(), ["Emphasized"]);
}

#[test]
fn test_numbering_id_zero_is_not_numbered() {
    let data = reference_docx(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="0"/></w:numPr></w:pPr><w:r><w:t>Plain</w:t></w:r></w:p>"#,
    );
    let doc = parse_reference_bytes(&data).unwrap();

    assert!(!doc.paragraphs[0].has_numbering());
    assert!(PhraseExtractor::new().extract(&doc).is_empty());
}

#[test]
fn test_hyperlink_runs_and_deleted_runs() {
    let data = reference_docx(
        r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/></w:pPr>
             <w:r><w:t xml:space="preserve">See </w:t></w:r>
             <w:hyperlink><w:r><w:t>Policy</w:t></w:r></w:hyperlink>
             <w:del><w:r><w:delText>Removed</w:delText></w:r></w:del>
           </w:p>"#,
    );
    let doc = parse_reference_bytes(&data).unwrap();

    assert_eq!(doc.paragraphs[0].plain_text(), "See Policy");
}

#[test]
fn test_tables_are_opt_in() {
    let data = reference_docx(
        r#"<w:p><w:r><w:t>Body</w:t></w:r></w:p>
           <w:tbl><w:tr><w:tc><w:p><w:r><w:t>- Cell Item</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
    );

    let doc = parse_reference_bytes(&data).unwrap();
    assert_eq!(doc.paragraph_count(), 1);

    let doc = DocxParser::from_bytes_with_options(&data, ParseOptions::new().with_tables(true))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(doc.paragraph_count(), 2);
    assert!(PhraseExtractor::new().extract(&doc).contains("Cell Item"));
}

#[test]
fn test_main_part_from_package_relationships() {
    let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
        <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/main.xml"/>
    </Relationships>"#;
    let data = package(&[
        ("_rels/.rels", rels.to_string()),
        (
            "word/main.xml",
            document_part(r#"<w:p><w:r><w:t>- Relocated</w:t></w:r></w:p>"#),
        ),
    ]);

    let doc = parse_reference_bytes(&data).unwrap();
    assert_eq!(doc.paragraphs[0].plain_text(), "- Relocated");
}

#[test]
fn test_document_part_with_bom() {
    let body = format!(
        "\u{FEFF}{}",
        document_part(r#"<w:p><w:r><w:t>* Starred</w:t></w:r></w:p>"#)
    );
    let data = package(&[("word/document.xml", body)]);

    let doc = parse_reference_bytes(&data).unwrap();
    assert_eq!(doc.paragraphs[0].plain_text(), "* Starred");
}

#[test]
fn test_missing_document_part() {
    let data = package(&[("word/styles.xml", styles_part(LIST_STYLES))]);
    let result = parse_reference_bytes(&data);
    assert!(matches!(result, Err(Error::MissingPart(_))));
}

#[test]
fn test_malformed_document_xml() {
    let data = package(&[("word/document.xml", "<w:document><w:body>".to_string())]);
    let result = parse_reference_bytes(&data);
    assert!(matches!(result, Err(Error::Xml(_))));
}

#[test]
fn test_not_a_zip() {
    let result = parse_reference_bytes(b"<?xml version=\"1.0\"?><root/>");
    assert!(matches!(result, Err(Error::UnknownFormat)));
}

#[test]
fn test_written_document_reads_back() {
    let mut doc = Document::new();
    let mut first = Paragraph::new();
    first.add_text("<note>Review ");
    first.add_highlighted("Safety Requirements");
    first.add_text(" before deployment</note>");
    doc.add_paragraph(first);
    doc.add_paragraph(Paragraph::new());
    doc.add_paragraph(
        Paragraph::with_text("tab\there")
            .with_style_name("List Paragraph")
            .with_numbering(Numbering::new(2, 1)),
    );
    doc.metadata.title = Some("run".to_string());

    let bytes = to_docx(&doc, &RenderOptions::default()).unwrap();
    let parsed = parse_reference_bytes(&bytes).unwrap();

    assert_eq!(parsed.paragraph_count(), 3);
    assert_eq!(
        parsed.paragraphs[0].plain_text(),
        "<note>Review Safety Requirements before deployment</note>"
    );
    let highlighted: Vec<&str> = parsed.paragraphs[0]
        .runs
        .iter()
        .filter(|r| r.is_highlighted())
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(highlighted, vec!["Safety Requirements"]);
    assert_eq!(
        parsed.paragraphs[0].runs[1].style.highlight.as_deref(),
        Some(HIGHLIGHT_COLOR)
    );

    assert!(parsed.paragraphs[1].is_empty());
    assert_eq!(parsed.paragraphs[2].plain_text(), "tab\there");
    assert_eq!(parsed.paragraphs[2].style_name(), Some("List Paragraph"));
    assert_eq!(parsed.paragraphs[2].style.numbering, Some(Numbering::new(2, 1)));
    assert_eq!(parsed.metadata.title.as_deref(), Some("run"));
}
