//! Character sets (spec §3.1 `bitset`, §6.5 mold form).
//!
//! Represented as a sorted, non-overlapping run list rather than a literal
//! bit-per-codepoint table — rlang character sets must cover the full
//! Unicode scalar range (`string` is "a sequence of Unicode scalars"), so a
//! dense bitmap over all codepoints would be wasteful. Runs keep membership
//! tests at O(log n) and make range-compressed molding (spec §6.5: "range
//! compression for runs of ≥ 3") a direct readback of the internal
//! representation rather than a separate compression pass.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitset {
    /// Sorted, non-overlapping, non-adjacent `(start, end)` inclusive runs.
    runs: Vec<(char, char)>,
}

impl Bitset {
    pub fn new() -> Self {
        Bitset::default()
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = Bitset::new();
        for c in chars {
            set.insert(c);
        }
        set
    }

    pub fn from_range(start: char, end: char) -> Self {
        let mut set = Bitset::new();
        set.insert_range(start, end);
        set
    }

    pub fn insert(&mut self, c: char) {
        self.insert_range(c, c);
    }

    pub fn insert_range(&mut self, start: char, end: char) {
        if start > end {
            return;
        }
        let mut runs = std::mem::take(&mut self.runs);
        runs.push((start, end));
        runs.sort_by_key(|&(s, _)| s);
        let mut merged: Vec<(char, char)> = Vec::with_capacity(runs.len());
        for (s, e) in runs {
            if let Some(last) = merged.last_mut() {
                if is_adjacent_or_overlapping(*last, (s, e)) {
                    last.1 = char_max(last.1, e);
                    continue;
                }
            }
            merged.push((s, e));
        }
        self.runs = merged;
    }

    pub fn contains(&self, c: char) -> bool {
        self.runs
            .binary_search_by(|&(s, e)| {
                if c < s {
                    std::cmp::Ordering::Greater
                } else if c > e {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn runs(&self) -> &[(char, char)] {
        &self.runs
    }

    /// Re-readable `charset [...]` form (spec §6.5), compressing any run of
    /// three or more consecutive characters into `[a - z]`.
    pub fn mold(&self) -> String {
        let mut parts = Vec::new();
        for &(s, e) in &self.runs {
            let span = (e as u32).saturating_sub(s as u32) + 1;
            if span >= 3 {
                parts.push(format!("[{} - {}]", mold_char(s), mold_char(e)));
            } else {
                let mut c = s as u32;
                while c <= e as u32 {
                    if let Some(ch) = char::from_u32(c) {
                        parts.push(mold_char(ch));
                    }
                    c += 1;
                }
            }
        }
        format!("charset [{}]", parts.join(" "))
    }
}

fn mold_char(c: char) -> String {
    format!("#{:?}", c.to_string())
}

fn is_adjacent_or_overlapping(a: (char, char), b: (char, char)) -> bool {
    let a_end = a.1 as u32;
    let b_start = b.0 as u32;
    b_start <= a_end.saturating_add(1)
}

fn char_max(a: char, b: char) -> char {
    if a >= b { a } else { b }
}

impl fmt::Display for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mold())
    }
}
