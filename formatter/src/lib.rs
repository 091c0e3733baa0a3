pub mod error;
pub mod expander;
pub mod resolver;
pub mod value;

pub use error::FormatError;
pub use expander::{expand, format, substitute};
pub use value::{Params, Value};

/// A message template, ready to be formatted with different arguments.
///
/// Holds no state besides the template; each call re-parses it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageFormat {
    template: String,
}

impl MessageFormat {
    pub fn new(template: impl Into<String>) -> Self {
        MessageFormat {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn format(&self, params: &Params) -> Result<String, FormatError> {
        expander::format(&self.template, params)
    }
}
