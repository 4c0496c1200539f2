use crate::{
    codes::RecordKind,
    error::{Result, Uic301Error},
};
use std::fmt;

/// Record-order state machine over a whole file.
///
/// `INIT → HEADER → DETAIL → (DETAIL | TOTAL)`, `TOTAL → (TOTAL | HEADER)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Init,
    Header,
    Detail,
    Total,
}

impl ParserState {
    pub fn allowed(self) -> &'static [ParserState] {
        match self {
            ParserState::Init => &[ParserState::Header],
            ParserState::Header => &[ParserState::Detail],
            ParserState::Detail => &[ParserState::Detail, ParserState::Total],
            ParserState::Total => &[ParserState::Total, ParserState::Header],
        }
    }

    /// Moves to `next`, or fails with a structural error citing `line`.
    pub fn transition(self, next: ParserState, line: usize, trace: &str) -> Result<ParserState> {
        if self.allowed().contains(&next) {
            return Ok(next);
        }
        Err(Uic301Error::Structure {
            line,
            message: format!(
                "illegal record order, expected {}, actual {next}",
                format_states(self.allowed())
            ),
            trace: trace.to_string(),
        })
    }

    /// A file may end before any header or after a total.
    pub fn finish(self, line: usize) -> Result<()> {
        match self {
            ParserState::Init | ParserState::Total => Ok(()),
            ParserState::Header | ParserState::Detail => Err(Uic301Error::Structure {
                line,
                message: format!(
                    "unexpected end of file, expected {}",
                    format_states(self.allowed())
                ),
                trace: String::new(),
            }),
        }
    }
}

impl From<RecordKind> for ParserState {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Header => ParserState::Header,
            RecordKind::DetailG4 | RecordKind::DetailG5 => ParserState::Detail,
            RecordKind::Total => ParserState::Total,
        }
    }
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParserState::Init => "INIT",
            ParserState::Header => "HEADER",
            ParserState::Detail => "DETAIL",
            ParserState::Total => "TOTAL",
        })
    }
}

/// `{DETAIL, TOTAL}`
fn format_states(states: &[ParserState]) -> String {
    let names: Vec<String> = states.iter().map(ToString::to_string).collect();
    format!("{{{}}}", names.join(", "))
}
