pub mod construct;
pub mod parser;

pub use construct::case_table::{Case, CaseTable};
pub use construct::{Construct, ConstructKind, Keyword};
pub use parser::{Checker, ParseError, construct_at, constructs, find_construct, parse_options};
