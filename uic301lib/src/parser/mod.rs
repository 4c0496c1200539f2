//! Построчный парсер плоских файлов UIC 301.

pub mod state;

pub use state::ParserState;

use crate::{
    codes::{self, RecordKind, IDENTIFIER_LEN},
    config::ParserConfig,
    cursor::Cursor,
    error::{Result, Uic301Error},
    layout::Layout,
    model::{Detail, Document, Documents, G4Detail, G5Detail, Header, Record, Total},
    validate::{validate_record, CrossChecks},
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::{debug, info};

/// Parses, field-validates, cross-validates and seals every document of a file.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    checks: CrossChecks,
    ignored_companies: Vec<String>,
}

impl Parser {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            checks: config.cross_checks(),
            ignored_companies: config.ignored_companies.clone(),
        }
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Documents> {
        let path = path.as_ref();
        info!("Parsing UIC 301 file: {}", path.display());
        let file = File::open(path).map_err(Uic301Error::file("open", path))?;
        self.parse_reader(BufReader::new(file)).map_err(|e| match e {
            Uic301Error::Io(source) => Uic301Error::File { op: "read", path: path.into(), source },
            other => other,
        })
    }

    /// Fails on I/O errors and on structural errors; field and cross-record
    /// defects are recorded on the returned documents.
    pub fn parse_reader<R: BufRead>(&self, r: R) -> Result<Documents> {
        let mut state = ParserState::Init;
        let mut documents = Documents::new();
        let mut current: Option<Document> = None;
        let mut last_line = 0;

        for (idx, line) in r.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            last_line = line_no;

            let mut cursor = Cursor::new(text);
            let code = cursor.next("identifier", IDENTIFIER_LEN);
            let Some((kind, document_type)) = codes::classify(&code) else {
                return Err(Uic301Error::Structure {
                    line: line_no,
                    message: format!("unknown record identifier '{code}'"),
                    trace: cursor.into_trace(),
                });
            };
            state = state.transition(kind.into(), line_no, cursor.trace())?;
            debug!(line = line_no, ?kind, %document_type, "record classified");

            match kind {
                RecordKind::Header => {
                    if let Some(done) = current.take() {
                        self.finish(done, &mut documents)?;
                    }
                    let header: Header = parse_record(text, line_no)?;
                    let mut document = Document::new(header)?;
                    if self.ignored_companies.iter().any(|c| c == document.header().ru_compiling()) {
                        document.set_ignore_block(true)?;
                    }
                    current = Some(document);
                }
                RecordKind::DetailG4 => {
                    let record: G4Detail = parse_record(text, line_no)?;
                    open_document(&mut current, line_no)?.add_detail(Detail::G4(record))?;
                }
                RecordKind::DetailG5 => {
                    let record: G5Detail = parse_record(text, line_no)?;
                    open_document(&mut current, line_no)?.add_detail(Detail::from_g5(record)?)?;
                }
                RecordKind::Total => {
                    let record: Total = parse_record(text, line_no)?;
                    open_document(&mut current, line_no)?.add_total(record)?;
                }
            }
        }

        state.finish(last_line)?;
        if let Some(done) = current.take() {
            self.finish(done, &mut documents)?;
        }
        documents.seal_with(&self.checks);
        info!(
            documents = documents.len(),
            errors = documents.error_count(),
            "parse complete"
        );
        Ok(documents)
    }

    fn finish(&self, mut document: Document, documents: &mut Documents) -> Result<()> {
        document.seal_with(&self.checks);
        info!(
            line = document.header().line(),
            kind = %document.document_type(),
            details = document.details().len(),
            totals = document.totals().len(),
            errors = document.error_count(),
            "document sealed"
        );
        documents.push(document)
    }
}

/// Slices and field-validates one line.
fn parse_record<L: Layout>(text: &str, line_no: usize) -> Result<Record<L>> {
    let (mut record, trace) = Record::<L>::parse(text, line_no)?;
    debug!(line = line_no, "{}: {trace}", L::LABEL);
    validate_record(&mut record, text.chars().count())?;
    Ok(record)
}

fn open_document(current: &mut Option<Document>, line_no: usize) -> Result<&mut Document> {
    current.as_mut().ok_or_else(|| Uic301Error::Structure {
        line: line_no,
        message: "record outside of a document".into(),
        trace: String::new(),
    })
}
