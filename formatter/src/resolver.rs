use msgfmt::construct::case_table::{FEW, ONE, OTHER, TWO};
use msgfmt::{CaseTable, ConstructKind};

use crate::error::FormatError;
use crate::value::Value;

/// The outcome of picking a case for a construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A case message, still to be expanded.
    Message(String),
    /// Final text that is not expanded further.
    Literal(String),
}

/// Pick the case of a construct for the given argument value.
///
/// `argument` is the construct's argument name, used for error reporting.
/// For `plural` and `selectordinal` every `#` in the chosen message is
/// already replaced with the number.
pub fn resolve(
    kind: ConstructKind,
    argument: &str,
    value: Option<&Value>,
    cases: &CaseTable,
) -> Result<Selection, FormatError> {
    match kind {
        ConstructKind::Select => Ok(select(value, cases)),
        ConstructKind::Plural => {
            let n = integer_argument(kind, argument, value)?;
            Ok(plural(n, cases))
        }
        ConstructKind::SelectOrdinal => {
            let n = integer_argument(kind, argument, value)?;
            Ok(ordinal(n, cases))
        }
    }
}

fn integer_argument(
    kind: ConstructKind,
    argument: &str,
    value: Option<&Value>,
) -> Result<i64, FormatError> {
    let value = value.ok_or_else(|| FormatError::MissingArgument {
        argument: argument.to_string(),
        kind,
    })?;
    value.to_integer().ok_or_else(|| FormatError::NotAnInteger {
        argument: argument.to_string(),
        value: value.to_string(),
        kind,
    })
}

fn select(value: Option<&Value>, cases: &CaseTable) -> Selection {
    let chosen = value
        .and_then(|v| cases.get(&v.to_string()))
        .or_else(|| cases.get(OTHER));
    Selection::Message(chosen.unwrap_or_default().to_string())
}

fn plural(n: i64, cases: &CaseTable) -> Selection {
    let chosen = cases
        .get(&format!("={}", n))
        .or_else(|| if n == 1 { cases.get(ONE) } else { None })
        .or_else(|| cases.get(OTHER));
    numbered(n, chosen)
}

fn ordinal(n: i64, cases: &CaseTable) -> Selection {
    let category = match n {
        1 => Some(ONE),
        2 => Some(TWO),
        3 => Some(FEW),
        _ => None,
    };
    let chosen = category
        .and_then(|label| cases.get(label))
        .or_else(|| cases.get(OTHER));
    numbered(n, chosen)
}

fn numbered(n: i64, chosen: Option<&str>) -> Selection {
    let number = n.to_string();
    match chosen {
        Some(message) => Selection::Message(message.replace('#', &number)),
        None => Selection::Literal(number),
    }
}
