//! XML-проекция дерева документов.
//!
//! `documents > document > (header | details > detail-g4 | detail-g5 | totals > total)`,
//! поля записи идут атрибутами, ошибки полей дочерними `field-error`. Между тегами
//! ничего не пишется, поэтому смещения из сканера тегов точно адресуют файл.

use crate::{
    error::{Result, Uic301Error},
    layout::{G4Layout, G5Layout, HeaderLayout, Layout, TotalLayout},
    model::{Detail, Document, Documents, FieldError, Header, Record, Total},
    traits::{ReadFormat, WriteFormat},
    validate::CrossChecks,
};
use quick_xml::{
    events::{BytesDecl, BytesStart, Event},
    Reader, Writer,
};
use std::io::{BufRead, Write};

pub const DOCUMENTS: &str = "documents";
pub const DOCUMENT: &str = "document";
pub const DETAILS: &str = "details";
pub const TOTALS: &str = "totals";
pub const FIELD_ERROR: &str = "field-error";

pub struct Xml;

/* ------------------------------- WRITE ---------------------------------- */

impl WriteFormat for Xml {
    fn write<W: Write>(mut w: W, docs: &Documents) -> Result<()> {
        let mut wr = Writer::new(&mut w);

        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml)?;
        wr.write_event(Event::Start(BytesStart::new(DOCUMENTS))).map_err(xml)?;
        for doc in docs.iter() {
            write_document(&mut wr, doc).map_err(xml)?;
        }
        wr.write_event(Event::End(BytesStart::new(DOCUMENTS).to_end()))
            .map_err(xml)?;
        Ok(())
    }
}

fn write_document<W: Write>(
    wr: &mut Writer<W>,
    doc: &Document,
) -> std::result::Result<(), quick_xml::Error> {
    let errors = doc.error_count().to_string();
    let el = BytesStart::new(DOCUMENT).with_attributes([
        ("ignore-block", bool_str(doc.ignore_block())),
        ("patched", bool_str(doc.patched())),
        ("error-count", errors.as_str()),
    ]);
    wr.write_event(Event::Start(el))?;

    write_record(wr, doc.header())?;

    let details = doc.details();
    write_collection(wr, DETAILS, details.error_count(), details.is_empty(), |wr| {
        for detail in details.iter() {
            match detail {
                Detail::G4(d) => write_record(wr, d)?,
                Detail::G5Allocation(d) | Detail::G5Issue(d) => write_record(wr, d)?,
            }
        }
        Ok(())
    })?;

    let totals = doc.totals();
    write_collection(wr, TOTALS, totals.error_count(), totals.is_empty(), |wr| {
        for total in totals.iter() {
            write_record(wr, total)?;
        }
        Ok(())
    })?;

    wr.write_event(Event::End(BytesStart::new(DOCUMENT).to_end()))?;
    Ok(())
}

fn write_collection<W: Write, F>(
    wr: &mut Writer<W>,
    name: &str,
    errors: usize,
    empty: bool,
    body: F,
) -> std::result::Result<(), quick_xml::Error>
where
    F: FnOnce(&mut Writer<W>) -> std::result::Result<(), quick_xml::Error>,
{
    let errors = errors.to_string();
    let el = BytesStart::new(name).with_attributes([("error-count", errors.as_str())]);
    if empty {
        return wr.write_event(Event::Empty(el));
    }
    wr.write_event(Event::Start(el))?;
    body(wr)?;
    wr.write_event(Event::End(BytesStart::new(name).to_end()))?;
    Ok(())
}

fn write_record<L: Layout, W: Write>(
    wr: &mut Writer<W>,
    record: &Record<L>,
) -> std::result::Result<(), quick_xml::Error> {
    let line = record.line().to_string();
    let mut el = BytesStart::new(L::ELEMENT);
    el.push_attribute(("line", line.as_str()));
    for (attribute, value) in record.attributes() {
        el.push_attribute((attribute, value));
    }

    if record.errors().is_empty() {
        return wr.write_event(Event::Empty(el));
    }
    wr.write_event(Event::Start(el))?;
    for err in record.errors() {
        let fe = BytesStart::new(FIELD_ERROR)
            .with_attributes([("field", err.field), ("error", err.message.as_str())]);
        wr.write_event(Event::Empty(fe))?;
    }
    wr.write_event(Event::End(BytesStart::new(L::ELEMENT).to_end()))?;
    Ok(())
}

fn bool_str(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

fn xml<E: std::fmt::Display>(e: E) -> Uic301Error {
    Uic301Error::Xml(e.to_string())
}

/* ------------------------------- READ ----------------------------------- */

/// Everything materialized from a (possibly partial) serialized tree.
///
/// Records outside any `document` element land in the loose lists; that is
/// what a random-access read of a single record yields.
#[derive(Debug, Default)]
pub struct Fragment {
    pub documents: Vec<Document>,
    pub headers: Vec<Header>,
    pub details: Vec<Detail>,
    pub totals: Vec<Total>,
}

/// Attributes of a `document` start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentAttributes {
    pub ignore_block: bool,
    pub patched: bool,
    pub error_count: usize,
}

impl ReadFormat for Xml {
    fn read<R: BufRead>(r: R) -> Result<Documents> {
        let fragment = Xml::read_fragment(r, &CrossChecks::default())?;
        let mut docs = Documents::new();
        for doc in fragment.documents {
            docs.push(doc)?;
        }
        docs.seal();
        Ok(docs)
    }
}

impl Xml {
    /// Restores whatever records and documents `r` contains. Restored
    /// documents are sealed with `checks`, which recomputes their sums and
    /// cross-record violations.
    pub fn read_fragment<R: BufRead>(r: R, checks: &CrossChecks) -> Result<Fragment> {
        let mut reader = Reader::from_reader(r);
        let mut buf = Vec::new();
        let mut tree = TreeBuilder::new(checks);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => tree.open(&e)?,
                Ok(Event::Empty(e)) => {
                    tree.open(&e)?;
                    tree.close(e.name().as_ref())?;
                }
                Ok(Event::End(e)) => tree.close(e.name().as_ref())?,
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml(e)),
                _ => {}
            }
            buf.clear();
        }
        tree.finish()
    }

    /// Parses the first element of `start_tag`, which must be a `document`.
    pub fn read_document_attributes(start_tag: &[u8]) -> Result<DocumentAttributes> {
        let mut reader = Reader::from_reader(start_tag);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.name().as_ref() != DOCUMENT.as_bytes() {
                        return Err(Uic301Error::Xml(format!(
                            "expected <{DOCUMENT}>, found <{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    return document_attributes(&attributes(&e)?);
                }
                Ok(Event::Eof) => {
                    return Err(Uic301Error::Xml(format!("no <{DOCUMENT}> start tag")))
                }
                Err(e) => return Err(xml(e)),
                _ => {}
            }
            buf.clear();
        }
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for a in e.attributes() {
        let a = a.map_err(xml)?;
        let key = String::from_utf8(a.key.as_ref().to_vec()).map_err(xml)?;
        let value = a.unescape_value().map_err(xml)?.into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn parse_bool(attrs: &[(String, String)], name: &str) -> Result<bool> {
    match attribute(attrs, name) {
        Some("true") => Ok(true),
        Some("false") | None => Ok(false),
        Some(other) => Err(Uic301Error::Xml(format!("{name}='{other}' is not a boolean"))),
    }
}

fn document_attributes(attrs: &[(String, String)]) -> Result<DocumentAttributes> {
    let error_count = match attribute(attrs, "error-count") {
        Some(v) => v
            .parse()
            .map_err(|_| Uic301Error::Xml(format!("error-count='{v}' is not a number")))?,
        None => 0,
    };
    Ok(DocumentAttributes {
        ignore_block: parse_bool(attrs, "ignore-block")?,
        patched: parse_bool(attrs, "patched")?,
        error_count,
    })
}

fn read_record<L: Layout>(attrs: &[(String, String)]) -> Result<Record<L>> {
    let line = match attribute(attrs, "line") {
        Some(v) => v
            .parse()
            .map_err(|_| Uic301Error::Xml(format!("line='{v}' is not a number")))?,
        None => 0,
    };
    let mut record = Record::<L>::new(line);
    for (key, value) in attrs {
        if key == "line" {
            continue;
        }
        let idx = L::attribute_index(key).ok_or_else(|| {
            Uic301Error::Xml(format!("unknown attribute '{key}' on <{}>", L::ELEMENT))
        })?;
        record.assign(idx, value.clone())?;
    }
    if let Some(missing) = record.missing_field() {
        return Err(Uic301Error::Xml(format!(
            "<{}> line {line} lacks attribute '{missing}'",
            L::ELEMENT
        )));
    }
    Ok(record)
}

fn field_error<L: Layout>(attrs: &[(String, String)]) -> Result<FieldError> {
    let field = attribute(attrs, "field").unwrap_or_default();
    let idx = L::attribute_index(field).ok_or_else(|| {
        Uic301Error::Xml(format!("field-error names unknown field '{field}' of <{}>", L::ELEMENT))
    })?;
    let message = attribute(attrs, "error").unwrap_or_default();
    Ok(FieldError::new(L::FIELDS[idx].attribute, message))
}

enum OpenRecord {
    Header(Header),
    G4(Record<G4Layout>),
    G5(Record<G5Layout>),
    Total(Total),
}

impl OpenRecord {
    fn add_error(&mut self, attrs: &[(String, String)]) -> Result<()> {
        match self {
            OpenRecord::Header(r) => r.add_error(field_error::<HeaderLayout>(attrs)?),
            OpenRecord::G4(r) => r.add_error(field_error::<G4Layout>(attrs)?),
            OpenRecord::G5(r) => r.add_error(field_error::<G5Layout>(attrs)?),
            OpenRecord::Total(r) => r.add_error(field_error::<TotalLayout>(attrs)?),
        }
    }
}

struct OpenDocument {
    attributes: DocumentAttributes,
    header: Option<Header>,
    details: Vec<Detail>,
    totals: Vec<Total>,
}

struct TreeBuilder<'c> {
    checks: &'c CrossChecks,
    out: Fragment,
    document: Option<OpenDocument>,
    record: Option<OpenRecord>,
}

impl<'c> TreeBuilder<'c> {
    fn new(checks: &'c CrossChecks) -> Self {
        Self { checks, out: Fragment::default(), document: None, record: None }
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let attrs = attributes(e)?;
        let name = e.name();
        let record = match name.as_ref() {
            b"documents" | b"details" | b"totals" => return Ok(()),
            b"document" => {
                self.document = Some(OpenDocument {
                    attributes: document_attributes(&attrs)?,
                    header: None,
                    details: Vec::new(),
                    totals: Vec::new(),
                });
                return Ok(());
            }
            b"field-error" => {
                let record = self.record.as_mut().ok_or_else(|| {
                    Uic301Error::Xml("field-error outside of a record".into())
                })?;
                return record.add_error(&attrs);
            }
            b"header" => OpenRecord::Header(read_record(&attrs)?),
            b"detail-g4" => OpenRecord::G4(read_record(&attrs)?),
            b"detail-g5" => OpenRecord::G5(read_record(&attrs)?),
            b"total" => OpenRecord::Total(read_record(&attrs)?),
            other => {
                return Err(Uic301Error::Xml(format!(
                    "unexpected element <{}>",
                    String::from_utf8_lossy(other)
                )))
            }
        };
        self.record = Some(record);
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<()> {
        match name {
            b"header" | b"detail-g4" | b"detail-g5" | b"total" => self.close_record(),
            b"document" => self.close_document(),
            _ => Ok(()),
        }
    }

    fn close_record(&mut self) -> Result<()> {
        let Some(record) = self.record.take() else {
            return Ok(());
        };
        match (&mut self.document, record) {
            (Some(doc), OpenRecord::Header(h)) => doc.header = Some(h),
            (Some(doc), OpenRecord::G4(d)) => doc.details.push(Detail::G4(d)),
            (Some(doc), OpenRecord::G5(d)) => doc.details.push(Detail::from_g5(d)?),
            (Some(doc), OpenRecord::Total(t)) => doc.totals.push(t),
            (None, OpenRecord::Header(mut h)) => {
                h.seal();
                self.out.headers.push(h);
            }
            (None, OpenRecord::G4(d)) => {
                let mut d = Detail::G4(d);
                d.seal();
                self.out.details.push(d);
            }
            (None, OpenRecord::G5(d)) => {
                let mut d = Detail::from_g5(d)?;
                d.seal();
                self.out.details.push(d);
            }
            (None, OpenRecord::Total(mut t)) => {
                t.seal();
                self.out.totals.push(t);
            }
        }
        Ok(())
    }

    fn close_document(&mut self) -> Result<()> {
        let Some(open) = self.document.take() else {
            return Ok(());
        };
        let header = open
            .header
            .ok_or_else(|| Uic301Error::Xml("document without header".into()))?;
        let mut doc = Document::new(header)?;
        doc.set_ignore_block(open.attributes.ignore_block)?;
        doc.set_patched(open.attributes.patched)?;
        for detail in open.details {
            doc.add_detail(detail)?;
        }
        for total in open.totals {
            doc.add_total(total)?;
        }
        doc.seal_with(self.checks);
        self.out.documents.push(doc);
        Ok(())
    }

    fn finish(mut self) -> Result<Fragment> {
        // A truncated fragment still yields the record that was open.
        self.close_record()?;
        Ok(self.out)
    }
}
