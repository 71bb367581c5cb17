//! Page-range grammar used by the split job.
//!
//! ```text
//! spec   := token { sep token }
//! sep    := ',' | ';' | whitespace
//! token  := N            single page, kept only if 1 <= N <= total
//!         | A '-' B      inclusive range, clamped to [1, total]
//! ```
//!
//! Parsing never fails: malformed or out-of-bounds tokens are dropped, so an
//! empty [`PageSpec`] is a valid result. Ranges are emitted in the order they
//! appear in the text and are neither merged nor deduplicated, because each
//! accepted token becomes its own output file downstream.

use serde::Serialize;
use std::fmt;

/// An inclusive, 1-indexed page interval within a document.
///
/// Only [`parse`] constructs these, so `1 <= start <= end <= total_pages`
/// always holds for the document it was parsed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRange {
    start: usize,
    end: usize,
}

impl PageRange {
    /// First page of the range (1-indexed).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last page of the range (1-indexed, inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of pages covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a range covers at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Page numbers in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Ordered collection of validated page ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    ranges: Vec<PageRange>,
}

impl PageSpec {
    pub fn ranges(&self) -> &[PageRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PageRange> {
        self.ranges.get(index).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRange> {
        self.ranges.iter()
    }
}

impl<'a> IntoIterator for &'a PageSpec {
    type Item = &'a PageRange;
    type IntoIter = std::slice::Iter<'a, PageRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

/// Parse `text` into the ranges it names within a document of `total_pages`.
pub fn parse(text: &str, total_pages: usize) -> PageSpec {
    let ranges = text
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| parse_token(token, total_pages))
        .collect();
    PageSpec { ranges }
}

/// Page numbers are 32-bit; anything that does not fit drops the token.
fn parse_number(text: &str) -> Option<i64> {
    text.parse::<i32>().ok().map(i64::from)
}

fn parse_token(token: &str, total_pages: usize) -> Option<PageRange> {
    let total = total_pages as i64;

    if let Some((left, right)) = token.split_once('-') {
        if left.is_empty() || right.is_empty() {
            return None;
        }
        // "1-2-3" leaves "2-3" on the right, which fails the integer parse.
        let a = parse_number(left)?;
        let b = parse_number(right)?;
        let start = a.max(1);
        let end = b.min(total);
        return (start <= end).then(|| PageRange {
            start: start as usize,
            end: end as usize,
        });
    }

    let page = parse_number(token)?;
    (1..=total).contains(&page).then(|| PageRange {
        start: page as usize,
        end: page as usize,
    })
}
