//! Brace-driven fragment splitter for the bulk listing body.
//!
//! The listing is one huge object whose values are per-package records.
//! Rather than parse the whole document, the splitter walks the buffered
//! bytes from `{` to `}` and accepts the first slice that decodes as a
//! standalone JSON object. The first `}` after a record's opening brace
//! usually closes an inner `time` or `dist` object, so a slice that does not
//! decode yet simply keeps extending to the next `}`.

use serde_json::{Map, Value};

/// One decoded `{...}` fragment of the bulk listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry(Map<String, Value>);

impl ListingEntry {
    /// Package name, when the fragment carries a string `name`
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Whether `time.modified` is present, i.e. the package was published at least once
    pub fn is_published(&self) -> bool {
        self.0
            .get("time")
            .and_then(Value::as_object)
            .is_some_and(|time| time.contains_key("modified"))
    }

    /// Consume the entry, yielding its name only if it passes the publish filter
    pub fn into_published_name(mut self) -> Option<String> {
        if !self.is_published() {
            return None;
        }
        match self.0.remove("name") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        }
    }
}

/// Result of one splitter pass
#[derive(Debug)]
pub struct Split<'a> {
    /// Fragments that decoded cleanly, in input order
    pub entries: Vec<ListingEntry>,
    /// Bytes past the high-water mark, to be carried into the next pass
    pub remainder: &'a [u8],
}

/// Lexical position while walking a candidate fragment.
///
/// Braces inside string literals do not count. A slice can only decode as a
/// standalone object once its opening brace is matched, so decoding is
/// attempted at those `}` positions only; at any other `}` it would fail.
#[derive(Debug, Default)]
struct BraceDepth {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl BraceDepth {
    fn feed(&mut self, byte: u8) {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.in_string = false;
            }
            return;
        }

        match byte {
            b'"' => self.in_string = true,
            b'{' => self.depth += 1,
            b'}' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.in_string
    }
}

/// Outcome of walking one candidate fragment
enum Candidate {
    /// Decoded cleanly; `end` is the offset just past its closing brace
    Accepted { entry: ListingEntry, end: usize },
    /// Balanced but undecodable; no extension of this slice can ever decode
    Rejected { end: usize },
    /// The buffer ends before the fragment closes
    Incomplete,
}

/// Split as many complete fragments as possible out of `buffer`.
///
/// Never fails: slices that do not decode are dropped. The remainder starts
/// at the high-water mark, so splitting it again without new bytes yields no
/// further fragments.
pub fn split_fragments(buffer: &[u8]) -> Split<'_> {
    let mut entries = Vec::new();
    let mut high_water = 0;
    let mut cursor = 0;

    while let Some(start) = find_byte(buffer, cursor, b'{') {
        match walk_candidate(buffer, start) {
            Candidate::Accepted { entry, end } => {
                entries.push(entry);
                high_water = end;
                cursor = end;
            }
            Candidate::Rejected { end } => cursor = end,
            Candidate::Incomplete => break,
        }
    }

    Split {
        entries,
        remainder: &buffer[high_water..],
    }
}

fn walk_candidate(buffer: &[u8], start: usize) -> Candidate {
    let mut depth = BraceDepth::default();

    for (offset, &byte) in buffer[start..].iter().enumerate() {
        depth.feed(byte);
        if byte != b'}' || !depth.is_balanced() {
            continue;
        }

        let end = start + offset + 1;
        return match serde_json::from_slice::<Map<String, Value>>(&buffer[start..end]) {
            Ok(map) => Candidate::Accepted {
                entry: ListingEntry(map),
                end,
            },
            Err(_) => Candidate::Rejected { end },
        };
    }

    Candidate::Incomplete
}

fn find_byte(buffer: &[u8], from: usize, needle: u8) -> Option<usize> {
    buffer
        .get(from..)?
        .iter()
        .position(|&byte| byte == needle)
        .map(|position| from + position)
}
