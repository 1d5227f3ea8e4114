//! Attribute runs over the document text.
//!
//! A `RunList` partitions `0..len` into contiguous, non-empty runs, each with
//! one attribute map. Every mutation ends with a merge pass so that no two
//! adjacent runs carry equal maps. This is the interval form of a tree whose
//! sibling text nodes merge automatically when their attributes match.

use crate::attributes::{AttributeValue, Attributes};
use crate::types::Range;

/// A maximal stretch of text sharing one attribute map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub range: Range,
    pub attrs: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunList {
    runs: Vec<TextRun>,
}

impl RunList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single run of `len` chars with `attrs` (or nothing if `len` is 0).
    pub fn uniform(len: usize, attrs: Attributes) -> Self {
        let mut list = Self::new();
        list.insert(0, len, attrs);
        list
    }

    /// Total length covered, in chars.
    pub fn len(&self) -> usize {
        self.runs.last().map(|r| r.range.end).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Index of the run holding the char at `offset`.
    pub fn index_at(&self, offset: usize) -> Option<usize> {
        let idx = self.runs.partition_point(|r| r.range.end <= offset);
        (idx < self.runs.len()).then_some(idx)
    }

    /// Attributes of the char at `offset`.
    pub fn attributes_at(&self, offset: usize) -> Option<&Attributes> {
        self.index_at(offset).map(|idx| &self.runs[idx].attrs)
    }

    /// Runs overlapping `range`, clipped to it.
    pub fn clipped(&self, range: Range) -> impl Iterator<Item = (Range, &Attributes)> + '_ {
        let first = self.runs.partition_point(|r| r.range.end <= range.start);
        self.runs[first..]
            .iter()
            .take_while(move |r| r.range.start < range.end)
            .filter_map(move |r| r.range.intersection(&range).map(|clip| (clip, &r.attrs)))
    }

    /// Insert `len` chars carrying `attrs` at `offset`, shifting later runs.
    pub fn insert(&mut self, offset: usize, len: usize, attrs: Attributes) {
        if len == 0 {
            return;
        }
        let idx = self.split_at(offset);
        for run in &mut self.runs[idx..] {
            run.range.start += len;
            run.range.end += len;
        }
        self.runs.insert(
            idx,
            TextRun {
                range: Range::new(offset, offset + len),
                attrs,
            },
        );
        self.merge();
    }

    /// Remove the chars in `range`, shifting later runs back.
    pub fn delete(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);
        let len = range.len();
        for run in &mut self.runs[first..] {
            run.range.start -= len;
            run.range.end -= len;
        }
        self.merge();
    }

    /// Set `key` to `value` on every char in `range`.
    pub fn set_attribute(&mut self, range: Range, key: &str, value: &AttributeValue) {
        self.update(range, |attrs| {
            attrs.insert(key, value.clone());
        });
    }

    /// Clear `key` from every char in `range`.
    pub fn remove_attribute(&mut self, range: Range, key: &str) {
        self.update(range, |attrs| {
            attrs.remove(key);
        });
    }

    fn update(&mut self, range: Range, f: impl Fn(&mut Attributes)) {
        let range = Range::new(range.start, range.end.min(self.len()));
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            f(&mut run.attrs);
        }
        self.merge();
    }

    /// Split the run straddling `offset`; returns the index of the run that
    /// now starts at `offset` (or `len()` of the vec when at the end).
    fn split_at(&mut self, offset: usize) -> usize {
        let idx = self.runs.partition_point(|r| r.range.end <= offset);
        let Some(run) = self.runs.get_mut(idx) else {
            return idx;
        };
        if run.range.start >= offset {
            return idx;
        }
        let tail = TextRun {
            range: Range::new(offset, run.range.end),
            attrs: run.attrs.clone(),
        };
        run.range.end = offset;
        self.runs.insert(idx + 1, tail);
        idx + 1
    }

    /// Merge adjacent runs with equal attributes and drop empty ones.
    fn merge(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.range.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.attrs == run.attrs && prev.range.end == run.range.start => {
                    prev.range.end = run.range.end;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
