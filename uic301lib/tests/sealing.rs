mod common;

use common::*;
use uic301lib::{
    codes::DocumentType,
    error::Uic301Error,
    layout::{HeaderField, HeaderLayout, TotalField, TotalLayout},
    model::{Detail, Details, Document, Documents, FieldError, Header, Record, Total, Totals},
};

fn sealed(err: Uic301Error) -> bool {
    matches!(err, Uic301Error::Sealed(_))
}

fn fresh_document() -> Document {
    let lines = g4_document();
    let (header, _) = Header::parse(&lines[0], 1).expect("header");
    let (detail, _) = Record::parse(&lines[1], 2).expect("detail");
    let (total, _) = Total::parse(&lines[2], 3).expect("total");
    let mut doc = Document::new(header).expect("document");
    doc.add_detail(Detail::G4(detail)).expect("add detail");
    doc.add_total(total).expect("add total");
    doc
}

#[test]
fn seal_is_idempotent() {
    let mut doc = fresh_document();
    doc.seal();
    let once = doc.clone();
    doc.seal();
    assert_eq!(doc, once);
    assert!(doc.is_valid());
    assert!(doc.header().is_sealed());
    assert!(doc.details().is_sealed());
    assert!(doc.totals().is_sealed());
    assert!(doc.details().iter().all(Detail::is_sealed));
    assert!(doc.totals().iter().all(Total::is_sealed));
    assert!(doc.details().amounts().values().all(|b| b.is_sealed()));
}

#[test]
fn totals_seal_once() {
    let lines = g4_document();
    let (total, _) = Total::parse(&lines[2], 3).expect("total");
    let mut totals = Totals::new();
    totals.push(total).expect("push");
    totals.seal();
    let once = totals.clone();
    totals.seal();
    assert_eq!(totals, once);
    assert!(totals.is_sealed());
    assert!(totals.iter().all(Total::is_sealed));
}

#[test]
fn document_mutators_fail_after_seal() {
    let lines = g4_document();
    let mut doc = fresh_document();
    doc.seal();

    let (detail, _) = Record::parse(&lines[1], 4).expect("detail");
    let (total, _) = Total::parse(&lines[2], 5).expect("total");
    assert!(sealed(doc.add_detail(Detail::G4(detail)).expect_err("add_detail")));
    assert!(sealed(doc.add_total(total).expect_err("add_total")));
    assert!(sealed(doc.set_ignore_block(true).expect_err("set_ignore_block")));
    assert!(sealed(doc.set_patched(true).expect_err("set_patched")));
    assert_eq!(doc.details().len(), 1);
    assert!(!doc.patched());
}

#[test]
fn collection_mutators_fail_after_seal() {
    let lines = g4_document();

    let mut details = Details::new(DocumentType::G4);
    details.seal();
    let (detail, _) = Record::parse(&lines[1], 2).expect("detail");
    assert!(sealed(details.push(Detail::G4(detail)).expect_err("details push")));

    let mut totals = Totals::new();
    totals.seal();
    let (total, _) = Total::parse(&lines[2], 3).expect("total");
    assert!(sealed(totals.push(total).expect_err("totals push")));

    let mut docs = Documents::new();
    docs.seal();
    assert!(sealed(docs.push(fresh_document()).expect_err("documents push")));
}

#[test]
fn record_mutators_fail_after_seal() {
    let lines = g4_document();

    let (mut header, _) = Header::parse(&lines[0], 1).expect("header");
    header.seal();
    header.seal();
    assert!(sealed(header.add_error(FieldError::new("identifier", "x")).expect_err("header add_error")));

    let mut total = Record::<TotalLayout>::new(3);
    total.seal();
    assert!(sealed(total.set(TotalField::Currency, "EUR").expect_err("total set")));

    let (detail, _) = Record::parse(&lines[1], 2).expect("detail");
    let mut detail = Detail::G4(detail);
    detail.seal();
    assert!(sealed(detail.add_error(FieldError::new("currency", "x")).expect_err("detail add_error")));
}

#[test]
fn fields_are_set_once() {
    let mut header = Record::<HeaderLayout>::new(1);
    header.set(HeaderField::RuCompiling, "1185").expect("first set");
    let err = header.set(HeaderField::RuCompiling, "1186").expect_err("second set");
    assert!(matches!(err, Uic301Error::FieldAlreadySet("ruCompiling")), "{err}");
    assert_eq!(header.get(HeaderField::RuCompiling), "1185");
    assert_eq!(header.missing_field(), Some("identifier"));
}

#[test]
fn document_requires_header_identifier() {
    let lines = g4_document();
    // A total line sliced with the header layout.
    let (not_a_header, _) = Header::parse(&lines[2], 1).expect("slice");
    assert!(matches!(Document::new(not_a_header), Err(Uic301Error::Parse(_))));
}

#[test]
fn sealed_documents_are_shared_across_threads() {
    let docs = parse(&g4_document());
    let docs = std::sync::Arc::new(docs);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let docs = docs.clone();
            std::thread::spawn(move || docs.get(0).map(|d| d.details().amounts().len()))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("join"), Some(1));
    }
}
