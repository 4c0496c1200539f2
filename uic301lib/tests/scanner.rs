use uic301lib::{
    error::{Result, Uic301Error},
    index::{IndexBuilder, TagKind, TagListener, TagScanner},
};

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl TagListener for Recorder {
    type Output = ();

    fn start_tag_begin(&mut self, name: &str, offset: u64) -> Result<()> {
        self.events.push(format!("begin {name} {offset}"));
        Ok(())
    }

    fn start_tag_end(&mut self, name: &str, offset: u64, self_closing: bool) -> Result<()> {
        self.events.push(format!("start {name} {offset} {self_closing}"));
        Ok(())
    }

    fn end_tag_end(&mut self, name: &str, offset: u64, self_closing: bool) -> Result<Option<()>> {
        self.events.push(format!("end {name} {offset} {self_closing}"));
        Ok(None)
    }
}

fn record(input: &str) -> Result<Vec<String>> {
    let mut rec = Recorder::default();
    TagScanner::new(input.as_bytes()).run(&mut rec)?;
    Ok(rec.events)
}

#[test]
fn reports_byte_exact_offsets() {
    let events = record(r#"<a><b x="1>2"/></a>"#).expect("scan");
    assert_eq!(
        events,
        [
            "begin a 0",
            "start a 2 false",
            "begin b 3",
            "start b 14 true",
            "end b 14 true",
            "end a 18 false",
        ]
    );
}

#[test]
fn skips_declarations_and_comments() {
    let input = r#"<?xml version="1.0"?><!-- <ignored> --><a/>"#;
    let offset = input.find("<a").expect("find");
    let events = record(input).expect("scan");
    assert_eq!(
        events,
        [
            format!("begin a {offset}"),
            format!("start a {} true", offset + 3),
            format!("end a {} true", offset + 3),
        ]
    );
}

#[test]
fn malformed_tags_are_fatal() {
    for input in ["<a><b", "<a></ a>", r#"<a x="1></a>"#, "<a <b>", "<a></a b>"] {
        match record(input) {
            Err(Uic301Error::Scan { .. }) => {}
            other => panic!("{input}: expected scan error, got {other:?}"),
        }
    }
}

#[test]
fn builder_nests_by_expected_children() {
    let input = concat!(
        r#"<documents><document ignore-block="false" patched="false" error-count="1">"#,
        r#"<header line="1"/>"#,
        r#"<details error-count="1"><detail-g4 line="2"><field-error field="currency" error="x"/></detail-g4></details>"#,
        r#"<totals error-count="0"/>"#,
        "</document></documents>",
    );
    let mut builder = IndexBuilder::new();
    let tree = TagScanner::new(input.as_bytes())
        .run(&mut builder)
        .expect("scan")
        .expect("root");

    assert_eq!(tree.root().range(), 0..input.len() as u64);
    assert_eq!(tree.node_count(), 7);
    let doc = tree.document(0).expect("document");
    let kinds: Vec<_> = doc.children.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, [TagKind::Header, TagKind::Details, TagKind::Totals]);

    let detail = doc.detail(0).expect("detail");
    assert_eq!(detail.kind, TagKind::DetailG4);
    assert!(!detail.self_closing);
    assert_eq!(detail.children[0].kind, TagKind::FieldError);
    let detail_text = &input[detail.begin as usize..detail.end as usize + 1];
    assert!(detail_text.starts_with("<detail-g4") && detail_text.ends_with("</detail-g4>"));
    assert_eq!(doc.total_count(), 0);
}

#[test]
fn unexpected_child_closes_the_open_element() {
    let input = "<documents><document><header><field-error/><details/><totals/></document></documents>";
    let mut builder = IndexBuilder::new();
    let tree = TagScanner::new(input.as_bytes())
        .run(&mut builder)
        .expect("scan")
        .expect("root");
    let doc = tree.document(0).expect("document");
    let header = doc.header().expect("header");
    assert_eq!(header.end, header.start_end);
    assert_eq!(header.children.len(), 1);
    assert_eq!(doc.children.len(), 3);
}

#[test]
fn builder_rejects_foreign_structure() {
    for input in [
        "<document></document>",
        "<documents><total/></documents>",
        "<documents><unknown/></documents>",
        "<documents></documents><documents></documents>",
        "<documents></document>",
    ] {
        let mut builder = IndexBuilder::new();
        let result = TagScanner::new(input.as_bytes()).run(&mut builder);
        assert!(matches!(result, Err(Uic301Error::Scan { .. })), "{input}: {result:?}");
    }
}
