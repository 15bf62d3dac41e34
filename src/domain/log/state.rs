//! Log tail: newest line first, bounded.

use super::LogLine;
use crate::shared::BoundedSeries;
use crate::ws::DomainEvent;

#[derive(Debug, Clone)]
pub struct LogTail {
    lines: BoundedSeries<LogLine>,
}

impl LogTail {
    pub const DEFAULT_CAP: usize = 100;

    pub fn new(cap: usize) -> Self {
        Self {
            lines: BoundedSeries::new(cap),
        }
    }

    /// Every event becomes a line.
    pub fn apply(&mut self, event: &DomainEvent) {
        self.push(LogLine::from_event(event));
    }

    pub fn push(&mut self, line: LogLine) {
        self.lines.push_front(line);
    }

    /// Lines, newest first.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &LogLine> + ExactSizeIterator {
        self.lines.iter()
    }

    /// Lines whose kind or text contains `needle`, case-insensitively.
    pub fn filter<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a LogLine> + 'a {
        self.lines.iter().filter(move |line| line.matches(needle))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for LogTail {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}
