pub mod check;
pub mod error;
mod options;
mod scanner;

pub use check::Checker;
pub use error::ParseError;
pub use options::parse_options;
pub use scanner::{Constructs, construct_at, constructs, find_construct, matching_brace};
