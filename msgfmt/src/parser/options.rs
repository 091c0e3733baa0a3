use crate::construct::case_table::{Case, CaseTable};
use crate::parser::scanner::{matching_brace, skip_while};

/// Parse a construct body of the form `key1 {message1} key2 {message2} ...`.
///
/// Messages may contain nested braces; a message ends only where its own
/// opening brace balances. A label with no `{` after it stops parsing and
/// the cases read so far are returned. A message whose brace never balances
/// runs to the end of the body.
pub fn parse_options(body: &str) -> CaseTable {
    let mut table = CaseTable::new();
    let mut pos = 0;

    loop {
        pos = skip_while(body, pos, char::is_whitespace);
        if pos >= body.len() {
            break;
        }

        let label_start = pos;
        pos = skip_while(body, pos, |c| !c.is_whitespace() && c != '{');
        let label_span = label_start..pos;

        pos = skip_while(body, pos, char::is_whitespace);
        if !body[pos..].starts_with('{') {
            table.mark_truncated(label_span);
            break;
        }

        let open = pos;
        let (raw_end, next) = match matching_brace(body, open) {
            Some(close) => (close, close + 1),
            None => (body.len(), body.len()),
        };
        let raw = &body[open + 1..raw_end];
        let message = raw.trim();
        let message_start = open + 1 + (raw.len() - raw.trim_start().len());

        table.insert(Case {
            label: body[label_span.clone()].to_string(),
            message: message.to_string(),
            label_span,
            message_span: message_start..message_start + message.len(),
        });
        pos = next;
    }

    table
}
