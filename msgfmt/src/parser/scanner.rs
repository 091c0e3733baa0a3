use crate::construct::{Construct, Keyword};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Find the first construct whose opening brace is at or after byte offset
/// `from`.
///
/// A `{` that does not start a well-formed header, or whose brace never
/// balances, is skipped and scanning continues at the next character.
pub fn find_construct(message: &str, from: usize) -> Option<Construct<'_>> {
    let mut search = from;
    while let Some(rel) = message.get(search..)?.find('{') {
        let open = search + rel;
        if let Some(construct) = construct_at(message, open) {
            return Some(construct);
        }
        search = open + 1;
    }
    None
}

/// Iterate over all non-overlapping top-level constructs, left to right.
pub fn constructs(message: &str) -> Constructs<'_> {
    Constructs { message, pos: 0 }
}

pub struct Constructs<'a> {
    message: &'a str,
    pos: usize,
}

impl<'a> Iterator for Constructs<'a> {
    type Item = Construct<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let construct = find_construct(self.message, self.pos)?;
        self.pos = construct.span.end;
        Some(construct)
    }
}

/// Byte offset of the `}` that balances the `{` at `open`.
pub fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Header recognition
// ---------------------------------------------------------------------------

/// The `{name, keyword,` prefix of a construct, before the body.
#[derive(Debug, Clone)]
pub(crate) struct Header<'a> {
    pub name: &'a str,
    pub keyword: &'a str,
    pub keyword_start: usize,
    /// Offset where the body begins (just past the comma, or at the `}`
    /// for the keyword-only form).
    pub body_start: usize,
    /// False for the keyword-only form `{name, keyword}`.
    pub has_body: bool,
}

/// Recognise `{ name , keyword ,` or `{ name , keyword }` at `open`.
pub(crate) fn header_at(message: &str, open: usize) -> Option<Header<'_>> {
    if !message.get(open..)?.starts_with('{') {
        return None;
    }
    let mut pos = skip_while(message, open + 1, char::is_whitespace);
    let (name, after_name) = identifier(message, pos)?;
    pos = skip_while(message, after_name, char::is_whitespace);
    pos = eat(message, pos, ',')?;
    pos = skip_while(message, pos, char::is_whitespace);
    let keyword_start = pos;
    let (keyword, after_keyword) = identifier(message, pos)?;
    pos = skip_while(message, after_keyword, char::is_whitespace);
    let (body_start, has_body) = match message[pos..].chars().next()? {
        ',' => (pos + 1, true),
        '}' => (pos, false),
        _ => return None,
    };
    Some(Header {
        name,
        keyword,
        keyword_start,
        body_start,
        has_body,
    })
}

/// The construct whose opening brace is exactly at `open`, if any.
///
/// `select`, `plural` and `selectordinal` need a body; `{n, plural}` is
/// plain text. Other keywords may stand alone, as in `{n, number}`.
pub fn construct_at(message: &str, open: usize) -> Option<Construct<'_>> {
    let header = header_at(message, open)?;
    let keyword = Keyword::parse(header.keyword);
    if !header.has_body && matches!(keyword, Keyword::Known(_)) {
        return None;
    }
    let close = matching_brace(message, open)?;
    Some(Construct {
        name: header.name,
        keyword,
        body: &message[header.body_start..close],
        span: open..close + 1,
        body_span: header.body_start..close,
    })
}

// ---------------------------------------------------------------------------
// Character helpers
// ---------------------------------------------------------------------------

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Offset of the first char at or after `from` that fails `pred`.
pub(crate) fn skip_while(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| from + i)
}

fn identifier(text: &str, from: usize) -> Option<(&str, usize)> {
    let end = skip_while(text, from, is_identifier_char);
    if end == from {
        None
    } else {
        Some((&text[from..end], end))
    }
}

fn eat(text: &str, pos: usize, expected: char) -> Option<usize> {
    text[pos..]
        .starts_with(expected)
        .then(|| pos + expected.len_utf8())
}
