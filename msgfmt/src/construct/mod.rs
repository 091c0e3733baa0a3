pub mod case_table;

use std::fmt;
use std::ops::Range;

/// The three construct types the formatter knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    /// `{var, select, ...}`: picks a case by the argument's string form.
    Select,
    /// `{var, plural, ...}`: picks a case by exact count, then `one`/`other`.
    Plural,
    /// `{var, selectordinal, ...}`: picks `one`/`two`/`few`/`other` by position.
    SelectOrdinal,
}

impl ConstructKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "select" => Some(ConstructKind::Select),
            "plural" => Some(ConstructKind::Plural),
            "selectordinal" => Some(ConstructKind::SelectOrdinal),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ConstructKind::Select => "select",
            ConstructKind::Plural => "plural",
            ConstructKind::SelectOrdinal => "selectordinal",
        }
    }

    /// Whether `#` in a selected case stands for the argument's number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ConstructKind::Plural | ConstructKind::SelectOrdinal)
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The type keyword found in a construct header.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword<'a> {
    Known(ConstructKind),
    /// Any other identifier, e.g. `number` in `{n, number}`.
    Unknown(&'a str),
}

impl<'a> Keyword<'a> {
    pub fn parse(keyword: &'a str) -> Self {
        match ConstructKind::from_keyword(keyword) {
            Some(kind) => Keyword::Known(kind),
            None => Keyword::Unknown(keyword),
        }
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            Keyword::Known(kind) => kind.keyword(),
            Keyword::Unknown(word) => word,
        }
    }
}

/// A `{name, keyword, body}` block located inside a message.
///
/// Spans are byte offsets into the message the construct was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct Construct<'a> {
    /// The argument name.
    pub name: &'a str,
    pub keyword: Keyword<'a>,
    /// Everything between the comma after the keyword and the balancing `}`.
    /// Empty for the keyword-only form `{name, keyword}`.
    pub body: &'a str,
    /// From the opening `{` through the balancing `}` inclusive.
    pub span: Range<usize>,
    pub body_span: Range<usize>,
}

impl Construct<'_> {
    /// The construct kind, if the keyword is one the formatter resolves.
    pub fn kind(&self) -> Option<ConstructKind> {
        match self.keyword {
            Keyword::Known(kind) => Some(kind),
            Keyword::Unknown(_) => None,
        }
    }
}
