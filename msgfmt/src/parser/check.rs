use std::ops::Range;

use crate::construct::case_table::{CaseTable, FEW, ONE, OTHER, TWO};
use crate::construct::{ConstructKind, Keyword};
use crate::parser::error::ParseError;
use crate::parser::options::parse_options;
use crate::parser::scanner::{Header, header_at, is_identifier_char, matching_brace};

/// Strict linter for templates.
///
/// The formatter itself never rejects a template; this reports the places
/// where it would silently fall back, plus outright syntax errors.
pub struct Checker {
    source: String,
    file_id: usize,
}

impl Checker {
    pub fn new(source: String, file_id: usize) -> Self {
        Checker { source, file_id }
    }

    /// Check the whole template.
    ///
    /// Returns the warnings on success, or every diagnostic (errors and
    /// warnings, in source order) when at least one error was found.
    pub fn check(&self) -> Result<Vec<ParseError>, Vec<ParseError>> {
        let mut state = CheckState {
            file_id: self.file_id,
            diagnostics: Vec::new(),
        };
        state.check_message(&self.source, 0);
        state.finalize()
    }
}

struct CheckState {
    file_id: usize,
    diagnostics: Vec<ParseError>,
}

impl CheckState {
    fn finalize(mut self) -> Result<Vec<ParseError>, Vec<ParseError>> {
        self.diagnostics.sort_by_key(|d| d.span.start);
        if self.diagnostics.iter().any(ParseError::is_error) {
            Err(self.diagnostics)
        } else {
            Ok(self.diagnostics)
        }
    }

    fn error(&self, message: impl Into<String>, span: Range<usize>) -> ParseError {
        ParseError::error(message, span, self.file_id)
    }

    fn warning(&self, message: impl Into<String>, span: Range<usize>) -> ParseError {
        ParseError::warning(message, span, self.file_id)
    }

    fn push(&mut self, diagnostic: ParseError) {
        self.diagnostics.push(diagnostic);
    }

    /// Check `text`, which starts at byte `offset` of the original template.
    fn check_message(&mut self, text: &str, offset: usize) {
        let mut pos = 0;
        while let Some(rel) = text[pos..].find(['{', '}']) {
            let at = pos + rel;
            if text[at..].starts_with('}') {
                self.push(self.error("unmatched closing brace", offset + at..offset + at + 1));
                pos = at + 1;
                continue;
            }

            let header = header_at(text, at);
            let Some(close) = matching_brace(text, at) else {
                match header {
                    Some(h) => {
                        let span = offset + at..offset + h.body_start;
                        self.push(
                            self.error(format!("unterminated `{}` construct", h.keyword), span)
                                .with_note("the construct is printed literally"),
                        );
                    }
                    None => {
                        self.push(self.error("unclosed brace", offset + at..offset + at + 1));
                    }
                }
                return;
            };

            match header {
                Some(h) => self.check_construct(text, offset, at, close, &h),
                None => self.check_placeholder(text, offset, at, close),
            }
            pos = close + 1;
        }
    }

    fn check_placeholder(&mut self, text: &str, offset: usize, open: usize, close: usize) {
        let inner = &text[open + 1..close];
        let name = inner.trim();
        if name.is_empty() {
            self.push(self.warning("empty placeholder", offset + open..offset + close + 1));
        } else if name.chars().all(is_identifier_char) {
            if name.len() != inner.len() {
                self.push(
                    self.warning(
                        format!("placeholder `{{{}}}` contains surrounding whitespace", name),
                        offset + open..offset + close + 1,
                    )
                    .with_note(format!("only `{{{}}}` is substituted", name)),
                );
            }
        } else {
            // Not an argument reference; any constructs inside still count.
            self.check_message(inner, offset + open + 1);
        }
    }

    fn check_construct(
        &mut self,
        text: &str,
        offset: usize,
        open: usize,
        close: usize,
        header: &Header<'_>,
    ) {
        let keyword_span =
            offset + header.keyword_start..offset + header.keyword_start + header.keyword.len();

        let kind = match Keyword::parse(header.keyword) {
            Keyword::Known(kind) => kind,
            Keyword::Unknown(word) => {
                self.push(
                    self.warning(format!("unrecognised construct type `{}`", word), keyword_span)
                        .with_note(format!(
                            "the construct is replaced by the plain value of `{}`",
                            header.name
                        )),
                );
                return;
            }
        };

        if !header.has_body {
            self.push(
                self.warning(
                    format!("`{}` construct for `{}` has no cases", kind, header.name),
                    offset + open..offset + close + 1,
                )
                .with_note(format!(
                    "add `, other {{...}}` after `{}`; as written it is printed literally",
                    kind
                )),
            );
            return;
        }

        let body = &text[header.body_start..close];
        let body_offset = offset + header.body_start;
        let table = parse_options(body);

        if let Some(span) = table.truncated_at() {
            let label = &body[span.clone()];
            self.push(
                self.error(
                    format!("expected `{{` after case label `{}`", label),
                    body_offset + span.start..body_offset + span.end,
                )
                .with_note("cases after this point are ignored"),
            );
        }

        for shadowed in table.shadowed() {
            let winner = table
                .iter()
                .find(|c| c.label == shadowed.label)
                .map(|c| c.label_span.clone());
            let mut warning = self.warning(
                format!("duplicate case label `{}`", shadowed.label),
                body_offset + shadowed.label_span.start..body_offset + shadowed.label_span.end,
            );
            if let Some(winner) = winner {
                warning = warning.with_related(
                    body_offset + winner.start..body_offset + winner.end,
                    "this later case is used instead",
                );
            }
            self.push(warning);
        }

        self.check_labels(kind, &table, body_offset);

        if !table.contains(OTHER) {
            let fallback = match kind {
                ConstructKind::Select => "an unmatched value renders as an empty string",
                ConstructKind::Plural | ConstructKind::SelectOrdinal => {
                    "an unmatched value renders as the bare number"
                }
            };
            self.push(
                self.warning(
                    format!("`{}` construct for `{}` has no `other` case", kind, header.name),
                    offset + open..offset + close + 1,
                )
                .with_note(fallback),
            );
        }

        for case in table.iter() {
            let message = &body[case.message_span.clone()];
            self.check_message(message, body_offset + case.message_span.start);
        }
    }

    fn check_labels(&mut self, kind: ConstructKind, table: &CaseTable, body_offset: usize) {
        for case in table.iter() {
            let span = body_offset + case.label_span.start..body_offset + case.label_span.end;
            let label = case.label.as_str();
            match kind {
                ConstructKind::Select => {}
                ConstructKind::Plural => {
                    if let Some(exact) = label.strip_prefix('=') {
                        if exact.parse::<i64>().is_err() {
                            self.push(
                                self.error(format!("invalid exact-match label `{}`", label), span)
                                    .with_note("exact-match labels are `=` followed by an integer"),
                            );
                        }
                    } else if label != ONE && label != OTHER {
                        self.unreachable_label(kind, label, span, "`=n`, `one` and `other`");
                    }
                }
                ConstructKind::SelectOrdinal => {
                    if ![ONE, TWO, FEW, OTHER].contains(&label) {
                        self.unreachable_label(
                            kind,
                            label,
                            span,
                            "`one`, `two`, `few` and `other`",
                        );
                    }
                }
            }
        }
    }

    fn unreachable_label(
        &mut self,
        kind: ConstructKind,
        label: &str,
        span: Range<usize>,
        accepted: &str,
    ) {
        self.push(
            self.warning(format!("case `{}` is never selected by `{}`", label, kind), span)
                .with_note(format!("`{}` only selects {}", kind, accepted)),
        );
    }
}
