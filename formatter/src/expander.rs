use msgfmt::{Construct, Keyword, construct_at, constructs, parse_options};

use crate::error::FormatError;
use crate::resolver::{Selection, resolve};
use crate::value::{Params, Value};

/// Format `template` with `params`.
///
/// Constructs are expanded until the text stops changing, then every
/// `{name}` with a supplied argument is replaced by its value.
pub fn format(template: &str, params: &Params) -> Result<String, FormatError> {
    let expanded = expand(template, params)?;
    Ok(substitute(&expanded, params))
}

/// Expand every `select`, `plural` and `selectordinal` construct in
/// `message`. Plain placeholders and constructs of other types stay in place.
pub fn expand(message: &str, params: &Params) -> Result<String, FormatError> {
    let mut current = message.to_string();
    loop {
        let next = expand_pass(&current, params)?;
        if next == current {
            return Ok(current);
        }
        current = next;
    }
}

fn expand_pass(message: &str, params: &Params) -> Result<String, FormatError> {
    let mut out = String::with_capacity(message.len());
    let mut last = 0;
    for construct in constructs(message) {
        out.push_str(&message[last..construct.span.start]);
        match expand_construct(&construct, params)? {
            Some(text) => out.push_str(&text),
            None => out.push_str(&message[construct.span.clone()]),
        }
        last = construct.span.end;
    }
    out.push_str(&message[last..]);
    Ok(out)
}

/// Expansion of one construct, or `None` to keep its text as is.
fn expand_construct(
    construct: &Construct<'_>,
    params: &Params,
) -> Result<Option<String>, FormatError> {
    let Some(kind) = construct.kind() else {
        return Ok(None);
    };

    let cases = parse_options(construct.body);
    match resolve(kind, construct.name, params.get(construct.name), &cases)? {
        Selection::Message(message) => expand(&message, params).map(Some),
        Selection::Literal(text) => Ok(Some(text)),
    }
}

/// Replace each `{key}` whose key is a supplied argument with the value's
/// string form. A construct with an unrecognised type, such as
/// `{n, number}`, is replaced the same way. Inserted values are not scanned
/// again.
pub fn substitute(message: &str, params: &Params) -> String {
    let mut out = String::with_capacity(message.len());
    let mut pos = 0;
    while let Some(rel) = message[pos..].find('{') {
        let open = pos + rel;
        out.push_str(&message[pos..open]);
        match placeholder_at(message, open, params) {
            Some((end, value)) => {
                out.push_str(&value.to_string());
                pos = end;
            }
            None => {
                out.push('{');
                pos = open + 1;
            }
        }
    }
    out.push_str(&message[pos..]);
    out
}

/// The argument referenced by the placeholder opening at `open`, and the
/// offset just past the placeholder.
fn placeholder_at<'p>(message: &str, open: usize, params: &'p Params) -> Option<(usize, &'p Value)> {
    let after = &message[open + 1..];
    let plain = after
        .find('}')
        .and_then(|close| params.get(&after[..close]).map(|value| (open + close + 2, value)));
    if plain.is_some() {
        return plain;
    }

    let construct = construct_at(message, open)?;
    match construct.keyword {
        Keyword::Unknown(_) => params
            .get(construct.name)
            .map(|value| (construct.span.end, value)),
        Keyword::Known(_) => None,
    }
}
