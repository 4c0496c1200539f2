//! Статические раскладки четырёх видов записей.
//!
//! Раскладка: перечисление полей плюс таблица по нему. Таблица задаёт ширину среза,
//! XML-атрибут (он же имя поля в сообщениях об ошибках) и правило проверки.

use crate::codes::{
    DocumentType, Identifier, DETAIL_G4_IDS, DETAIL_G5_IDS, HEADER_IDS,
    JOURNEY_TYPE, NET_BALANCE_TYPE, PASSENGER_CATEGORY, SERVICE_TYPE, STATEMENT_TYPE,
    TOTAL_IDS, TRANSACTION_TYPE, TRAVEL_CLASS, VAT_INDICATOR,
};
use crate::validate::fields::Rule;
use std::fmt::Debug;

#[derive(Debug)]
pub struct FieldSpec {
    /// Diagnostic name used in cursor traces.
    pub name: &'static str,
    pub attribute: &'static str,
    pub width: usize,
    pub rule: Rule,
}

const fn field(name: &'static str, attribute: &'static str, width: usize, rule: Rule) -> FieldSpec {
    FieldSpec { name, attribute, width, rule }
}

const OPTIONAL_TEXT: Rule = Rule::Optional(&Rule::Text);
const OPTIONAL_DATE: Rule = Rule::Optional(&Rule::Date);
const OPTIONAL_VAT: Rule = Rule::Optional(&Rule::Code(&VAT_INDICATOR));

pub trait Layout: Debug + Clone + PartialEq + Eq + 'static {
    type Field: Copy + Debug;

    /// Element name in the serialized tree.
    const ELEMENT: &'static str;
    /// Diagnostic name used in sealing errors.
    const LABEL: &'static str;
    const FIELDS: &'static [FieldSpec];
    const IDENTIFIERS: &'static [Identifier];

    fn index(field: Self::Field) -> usize;

    /// Sum of all field widths.
    fn line_width() -> usize {
        Self::FIELDS.iter().map(|f| f.width).sum()
    }

    fn document_type(identifier: &str) -> Option<DocumentType> {
        Self::IDENTIFIERS
            .iter()
            .find(|id| id.primary == identifier || id.alternate == identifier)
            .map(|id| id.document_type)
    }

    fn attribute_index(attribute: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|f| f.attribute == attribute)
    }
}

/* ------------------------------- HEADER --------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Identifier,
    RuCompiling,
    RuReceiving,
    StatementPeriod,
    DetailCount,
    TotalCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout;

impl Layout for HeaderLayout {
    type Field = HeaderField;
    const ELEMENT: &'static str = "header";
    const LABEL: &'static str = "header";
    const IDENTIFIERS: &'static [Identifier] = HEADER_IDS;
    const FIELDS: &'static [FieldSpec] = &[
        field("identifier", "identifier", 9, Rule::Digits),
        field("ruCompiling", "ru-compiling", 4, Rule::Digits),
        field("ruReceiving", "ru-receiving", 4, Rule::Digits),
        field("statementPeriod", "statement-period", 6, Rule::Period),
        field("detailCount", "detail-count", 6, Rule::Digits),
        field("totalCount", "total-count", 6, Rule::Digits),
    ];

    fn index(field: HeaderField) -> usize {
        field as usize
    }
}

/* ------------------------------- TOTAL ---------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalField {
    Identifier,
    RuCompiling,
    RuReceiving,
    StatementPeriod,
    StatementType,
    Currency,
    BccPeriod,
    GrossDebit,
    GrossCredit,
    CommissionDebit,
    CommissionCredit,
    NetBalanceType,
    NetBalanceAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalLayout;

impl Layout for TotalLayout {
    type Field = TotalField;
    const ELEMENT: &'static str = "total";
    const LABEL: &'static str = "total";
    const IDENTIFIERS: &'static [Identifier] = TOTAL_IDS;
    const FIELDS: &'static [FieldSpec] = &[
        field("identifier", "identifier", 9, Rule::Digits),
        field("ruCompiling", "ru-compiling", 4, Rule::Digits),
        field("ruReceiving", "ru-receiving", 4, Rule::Digits),
        field("statementPeriod", "statement-period", 6, Rule::Period),
        field("statementType", "statement-type", 1, Rule::Code(&STATEMENT_TYPE)),
        field("currency", "currency", 3, Rule::Letters),
        field("bccPeriod", "bcc-period", 2, Rule::Digits),
        field("grossDebit", "gross-debit", 12, Rule::Digits),
        field("grossCredit", "gross-credit", 12, Rule::Digits),
        field("commissionDebit", "commission-debit", 11, Rule::Digits),
        field("commissionCredit", "commission-credit", 11, Rule::Digits),
        field("netBalanceType", "net-balance-type", 1, Rule::Code(&NET_BALANCE_TYPE)),
        field("netBalanceAmount", "net-balance-amount", 12, Rule::Digits),
    ];

    fn index(field: TotalField) -> usize {
        field as usize
    }
}

/* ------------------------------ DETAIL G4 ------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum G4Field {
    Identifier,
    RuCompiling,
    RuReceiving,
    StatementPeriod,
    StatementType,
    Currency,
    BccPeriod,
    RuIssuing,
    RuSupplier,
    ServiceType,
    TransactionType,
    JourneyType,
    TrainNumber,
    DepartureDate,
    DepartureStation,
    ArrivalStation,
    TravelClass,
    PassengerCategory,
    TariffCode,
    Passengers,
    Services,
    SalesDate,
    PointOfSale,
    TicketNumber,
    GrossDebit,
    GrossCredit,
    CommissionRate,
    CommissionDebit,
    CommissionCredit,
    VatIndicator,
    Reserve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G4Layout;

impl Layout for G4Layout {
    type Field = G4Field;
    const ELEMENT: &'static str = "detail-g4";
    const LABEL: &'static str = "G4 detail";
    const IDENTIFIERS: &'static [Identifier] = DETAIL_G4_IDS;
    const FIELDS: &'static [FieldSpec] = &[
        field("identifier", "identifier", 9, Rule::Digits),
        field("ruCompiling", "ru-compiling", 4, Rule::Digits),
        field("ruReceiving", "ru-receiving", 4, Rule::Digits),
        field("statementPeriod", "statement-period", 6, Rule::Period),
        field("statementType", "statement-type", 1, Rule::Code(&STATEMENT_TYPE)),
        field("currency", "currency", 3, Rule::Letters),
        field("bccPeriod", "bcc-period", 2, Rule::Digits),
        field("ruIssuing", "ru-issuing", 4, Rule::Digits),
        field("ruSupplier", "ru-supplier", 4, Rule::Digits),
        field("serviceType", "service-type", 2, Rule::Code(&SERVICE_TYPE)),
        field("transactionType", "transaction-type", 1, Rule::Code(&TRANSACTION_TYPE)),
        field("journeyType", "journey-type", 1, Rule::Code(&JOURNEY_TYPE)),
        field("trainNumber", "train-number", 5, OPTIONAL_TEXT),
        field("departureDate", "departure-date", 6, Rule::Date),
        field("departureStation", "departure-station", 5, Rule::Digits),
        field("arrivalStation", "arrival-station", 5, Rule::Digits),
        field("travelClass", "class", 1, Rule::Code(&TRAVEL_CLASS)),
        field("passengerCategory", "passenger-category", 2, Rule::Code(&PASSENGER_CATEGORY)),
        field("tariffCode", "tariff-code", 5, OPTIONAL_TEXT),
        field("passengers", "passengers", 3, Rule::Digits),
        field("services", "services", 3, Rule::Digits),
        field("salesDate", "sales-date", 6, Rule::Date),
        field("pointOfSale", "point-of-sale", 6, Rule::Text),
        field("ticketNumber", "ticket-number", 10, Rule::Text),
        field("grossDebit", "gross-debit", 12, Rule::Digits),
        field("grossCredit", "gross-credit", 12, Rule::Digits),
        field("commissionRate", "commission-rate", 4, Rule::Digits),
        field("commissionDebit", "commission-debit", 11, Rule::Digits),
        field("commissionCredit", "commission-credit", 11, Rule::Digits),
        field("vatIndicator", "vat-indicator", 1, OPTIONAL_VAT),
        field("reserve", "reserve", 10, Rule::Free),
    ];

    fn index(field: G4Field) -> usize {
        field as usize
    }
}

/* ------------------------------ DETAIL G5 ------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum G5Field {
    Identifier,
    RuCompiling,
    RuReceiving,
    StatementPeriod,
    StatementType,
    Currency,
    BccPeriod,
    RuIssuing,
    ServiceType,
    TransactionType,
    JourneyType,
    TicketNumber,
    IssueDate,
    PointOfSale,
    OriginStation,
    DestinationStation,
    RouteCode,
    TariffCode,
    TravelClass,
    PassengerCategory,
    Passengers,
    ValidityStart,
    Distance,
    GrossDebit,
    GrossCredit,
    CommissionRate,
    CommissionDebit,
    CommissionCredit,
    VatIndicator,
    Reserve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G5Layout;

impl Layout for G5Layout {
    type Field = G5Field;
    const ELEMENT: &'static str = "detail-g5";
    const LABEL: &'static str = "G5 detail";
    const IDENTIFIERS: &'static [Identifier] = DETAIL_G5_IDS;
    const FIELDS: &'static [FieldSpec] = &[
        field("identifier", "identifier", 9, Rule::Digits),
        field("ruCompiling", "ru-compiling", 4, Rule::Digits),
        field("ruReceiving", "ru-receiving", 4, Rule::Digits),
        field("statementPeriod", "statement-period", 6, Rule::Period),
        field("statementType", "statement-type", 1, Rule::Code(&STATEMENT_TYPE)),
        field("currency", "currency", 3, Rule::Letters),
        field("bccPeriod", "bcc-period", 2, Rule::Digits),
        field("ruIssuing", "ru-issuing", 4, Rule::Digits),
        field("serviceType", "service-type", 2, Rule::Code(&SERVICE_TYPE)),
        field("transactionType", "transaction-type", 1, Rule::Code(&TRANSACTION_TYPE)),
        field("journeyType", "journey-type", 1, Rule::Code(&JOURNEY_TYPE)),
        field("ticketNumber", "ticket-number", 10, Rule::Text),
        field("issueDate", "issue-date", 6, Rule::Date),
        field("pointOfSale", "point-of-sale", 6, Rule::Text),
        field("originStation", "origin-station", 5, Rule::Digits),
        field("destinationStation", "destination-station", 5, Rule::Digits),
        field("routeCode", "route-code", 5, OPTIONAL_TEXT),
        field("tariffCode", "tariff-code", 5, OPTIONAL_TEXT),
        field("travelClass", "class", 1, Rule::Code(&TRAVEL_CLASS)),
        field("passengerCategory", "passenger-category", 2, Rule::Code(&PASSENGER_CATEGORY)),
        field("passengers", "passengers", 3, Rule::Digits),
        field("validityStart", "validity-start", 6, OPTIONAL_DATE),
        field("distance", "distance", 5, Rule::Digits),
        field("grossDebit", "gross-debit", 12, Rule::Digits),
        field("grossCredit", "gross-credit", 12, Rule::Digits),
        field("commissionRate", "commission-rate", 4, Rule::Digits),
        field("commissionDebit", "commission-debit", 11, Rule::Digits),
        field("commissionCredit", "commission-credit", 11, Rule::Digits),
        field("vatIndicator", "vat-indicator", 1, OPTIONAL_VAT),
        field("reserve", "reserve", 8, Rule::Free),
    ];

    fn index(field: G5Field) -> usize {
        field as usize
    }
}
