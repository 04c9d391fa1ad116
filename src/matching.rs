// Brute-force longest-match search, shared by both parsers.
//
// LZ4FH offsets are absolute and the whole input is at most one 8 KiB
// page, so an exhaustive scan is affordable off-device and keeps the
// encoder trivially correct. No hash tables, no chaining: candidates
// are tried in increasing offset order and the first strictly-longest
// one wins, which also gives the smallest offset among equals.

use crate::format::{MAX_MATCH, MIN_MATCH, Match};

/// Find the longest previous occurrence of the bytes starting at `pos`.
///
/// Candidate sources may run past `pos`: the decoder copies forward one
/// byte at a time, so a self-overlapping match replays bytes it has just
/// produced. Length is capped by the distance to the buffer end (the
/// decoder must never copy past it) and by the format's 255 limit.
///
/// Returns `Match::NONE` when `pos` is 0 or the cap leaves no room for a
/// usable match; callers treat anything below `MIN_MATCH` as "no match".
pub fn find_longest_match(buf: &[u8], pos: usize) -> Match {
    let cap = (buf.len() - pos).min(MAX_MATCH);
    if cap < MIN_MATCH {
        // too close to the end of the buffer, nothing to gain
        return Match::NONE;
    }

    let mut best = Match::NONE;
    for start in 0..pos {
        let length = match_len(buf, start, pos, cap);
        if length > best.length {
            best = Match {
                offset: start,
                length,
            };
        }
        if length == cap {
            // any later candidate is the same length or shorter
            break;
        }
    }
    best
}

/// Count equal bytes at `a` and `b`, up to `cap`.
fn match_len(buf: &[u8], a: usize, b: usize, cap: usize) -> usize {
    (0..cap)
        .take_while(|&i| buf[a + i] == buf[b + i])
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
