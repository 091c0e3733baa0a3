use std::ops::Range;

pub const OTHER: &str = "other";
pub const ONE: &str = "one";
pub const TWO: &str = "two";
pub const FEW: &str = "few";

/// A single `label {message}` pair from a construct body.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub label: String,
    /// The trimmed message text between the case braces.
    pub message: String,
    /// Byte span of the label, relative to the parsed body.
    pub label_span: Range<usize>,
    /// Byte span of the trimmed message, relative to the parsed body.
    pub message_span: Range<usize>,
}

/// The cases of one construct, looked up by exact label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseTable {
    cases: Vec<Case>,
    /// Earlier cases replaced by a later case with the same label.
    shadowed: Vec<Case>,
    /// Span of a label that had no `{message}` after it. Parsing stopped there.
    truncated_at: Option<Range<usize>>,
}

impl CaseTable {
    pub fn new() -> Self {
        CaseTable::default()
    }

    /// Add a case. A repeated label keeps its original position but takes
    /// the new message.
    pub fn insert(&mut self, case: Case) {
        match self.cases.iter_mut().find(|c| c.label == case.label) {
            Some(existing) => {
                let old = std::mem::replace(existing, case);
                self.shadowed.push(old);
            }
            None => self.cases.push(case),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.cases
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.message.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Case> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn shadowed(&self) -> &[Case] {
        &self.shadowed
    }

    pub fn truncated_at(&self) -> Option<&Range<usize>> {
        self.truncated_at.as_ref()
    }

    pub(crate) fn mark_truncated(&mut self, label_span: Range<usize>) {
        self.truncated_at = Some(label_span);
    }
}
