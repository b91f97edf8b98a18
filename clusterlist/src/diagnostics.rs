use alloc::collections::VecDeque;
use alloc::string::String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    Enter,
    Exit,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub at_ms: u64,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Append-only message stream that keeps the most recent `capacity` entries.
///
/// The engine only ever writes here; status panels read it.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

impl Diagnostics {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, at_ms: u64, kind: DiagnosticKind, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Diagnostic {
            at_ms,
            kind,
            message: message.into(),
        });
    }

    pub(crate) fn info(&mut self, at_ms: u64, message: impl Into<String>) {
        self.push(at_ms, DiagnosticKind::Info, message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Diagnostic> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Diagnostic> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
