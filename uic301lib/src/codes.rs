//! Идентификаторы записей и справочники кодов для правил полей.

use std::fmt;

/// Settlement message family, selected by the first 3 identifier digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Reserved services allocated.
    G4,
    /// Shares apportioned, allocation side.
    G5Allocation,
    /// Shares apportioned, issue side.
    G5Issue,
}

impl DocumentType {
    pub fn family(self) -> &'static str {
        match self {
            DocumentType::G4 => "141",
            DocumentType::G5Allocation => "151",
            DocumentType::G5Issue => "152",
        }
    }

    pub fn from_family(prefix: &str) -> Option<Self> {
        match prefix {
            "141" => Some(DocumentType::G4),
            "151" => Some(DocumentType::G5Allocation),
            "152" => Some(DocumentType::G5Issue),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentType::G4 => "G4",
            DocumentType::G5Allocation => "G5-allocation",
            DocumentType::G5Issue => "G5-issue",
        })
    }
}

/// Physical line kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Header,
    DetailG4,
    DetailG5,
    Total,
}

/// One identifier: primary code, alternate-backend code, and the family it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Identifier {
    pub primary: &'static str,
    pub alternate: &'static str,
    pub document_type: DocumentType,
}

impl Identifier {
    fn matches(&self, code: &str) -> bool {
        self.primary == code || self.alternate == code
    }
}

pub const HEADER_IDS: &[Identifier] = &[
    Identifier { primary: "141110000", alternate: "141110100", document_type: DocumentType::G4 },
    Identifier { primary: "151110000", alternate: "151110100", document_type: DocumentType::G5Allocation },
    Identifier { primary: "152110000", alternate: "152110100", document_type: DocumentType::G5Issue },
];

pub const DETAIL_G4_IDS: &[Identifier] = &[
    Identifier { primary: "141120000", alternate: "141120100", document_type: DocumentType::G4 },
];

pub const DETAIL_G5_IDS: &[Identifier] = &[
    Identifier { primary: "151120000", alternate: "151120100", document_type: DocumentType::G5Allocation },
    Identifier { primary: "152120000", alternate: "152120100", document_type: DocumentType::G5Issue },
];

pub const TOTAL_IDS: &[Identifier] = &[
    Identifier { primary: "141130000", alternate: "141130100", document_type: DocumentType::G4 },
    Identifier { primary: "151130000", alternate: "151130100", document_type: DocumentType::G5Allocation },
    Identifier { primary: "152130000", alternate: "152130100", document_type: DocumentType::G5Issue },
];

pub const IDENTIFIER_LEN: usize = 9;
pub const FAMILY_LEN: usize = 3;

fn lookup(table: &[Identifier], code: &str) -> Option<DocumentType> {
    table.iter().find(|id| id.matches(code)).map(|id| id.document_type)
}

/// Classifies a 9-char identifier against every table.
pub fn classify(code: &str) -> Option<(RecordKind, DocumentType)> {
    let tables = [
        (RecordKind::Header, HEADER_IDS),
        (RecordKind::DetailG4, DETAIL_G4_IDS),
        (RecordKind::DetailG5, DETAIL_G5_IDS),
        (RecordKind::Total, TOTAL_IDS),
    ];
    tables
        .into_iter()
        .find_map(|(kind, table)| lookup(table, code).map(|t| (kind, t)))
}

/// Identifier family prefix of `code`, or the whole string if shorter.
pub fn family_of(code: &str) -> &str {
    code.get(..FAMILY_LEN).unwrap_or(code)
}

/// Static `(code, label)` list.
#[derive(Debug)]
pub struct CodeTable {
    pub name: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

impl CodeTable {
    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(c, _)| *c == code)
    }

    pub fn label(&self, code: &str) -> Option<&'static str> {
        self.entries.iter().find(|(c, _)| *c == code).map(|(_, l)| *l)
    }
}

pub const SERVICE_TYPE: CodeTable = CodeTable {
    name: "service type",
    entries: &[
        ("01", "seat reservation"),
        ("02", "couchette"),
        ("03", "sleeper"),
        ("04", "supplement"),
        ("05", "global price"),
        ("06", "ticket"),
        ("07", "car carrier"),
        ("08", "ancillary service"),
    ],
};

pub const TRANSACTION_TYPE: CodeTable = CodeTable {
    name: "transaction type",
    entries: &[("1", "sale"), ("2", "refund"), ("3", "exchange"), ("4", "cancellation fee")],
};

pub const JOURNEY_TYPE: CodeTable = CodeTable {
    name: "journey type",
    entries: &[("1", "single"), ("2", "return"), ("3", "circular")],
};

pub const TRAVEL_CLASS: CodeTable = CodeTable {
    name: "class",
    entries: &[("0", "classless"), ("1", "first"), ("2", "second")],
};

pub const PASSENGER_CATEGORY: CodeTable = CodeTable {
    name: "passenger category",
    entries: &[
        ("01", "adult"),
        ("02", "child"),
        ("03", "senior"),
        ("04", "youth"),
        ("05", "group"),
        ("06", "disabled"),
        ("07", "dog"),
    ],
};

pub const STATEMENT_TYPE: CodeTable = CodeTable {
    name: "statement type",
    entries: &[("0", "original"), ("1", "correction")],
};

pub const VAT_INDICATOR: CodeTable = CodeTable {
    name: "VAT indicator",
    entries: &[("0", "exempt"), ("1", "liable")],
};

pub const NET_BALANCE_TYPE: CodeTable = CodeTable {
    name: "net balance type",
    entries: &[("0", "none"), ("1", "debit"), ("2", "credit")],
};
