// Optimal parser: backward cost propagation, forward emission.
//
// Parsing is a shortest-path problem over positions 0..=n: from each
// position you either step one byte forward as a literal or jump ahead
// by the longest match found there. Because a literal's framing cost
// depends only on the run state recorded at the *next* position, one
// linear backward sweep solves the whole recurrence; no priority queue.
//
// The result is optimal only over that binary choice. Alternative
// (shorter or different-offset) matches are never considered, which
// keeps the table linear and reproduces the reference encoder's sizes.

use crate::format::{ChunkWriter, MAX_LITERALS, MIN_MATCH, Match, NIBBLE_LIMIT};
use crate::matching;

/// Per-position record in the cost table. One flat entry per input
/// position plus a zero-cost sentinel at n; built once per encode and
/// discarded after emission.
#[derive(Debug, Clone, Copy, Default)]
struct OptNode {
    /// Cheapest encoded size from this position to the end.
    total_cost: u32,
    /// Chosen match length; 0 means the literal branch won.
    match_len: u16,
    /// Offset for the chosen match.
    match_offset: u16,
    /// Literal-run length accumulated at this position (literal branch).
    run_len: u16,
}

/// Compress `input` with optimal parsing, returning the LZ4FH stream.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let nodes = plan(input);
    emit(input, &nodes)
}

/// Backward pass: fill the cost table from the last position down.
fn plan(input: &[u8]) -> Vec<OptNode> {
    let n = input.len();
    let mut nodes = vec![OptNode::default(); n + 1];

    for i in (0..n).rev() {
        let m = matching::find_longest_match(input, i);

        let cost_match = if m.is_usable() {
            let mut cost = nodes[i + m.length].total_cost + 3;
            if m.length - MIN_MATCH >= NIBBLE_LIMIT {
                cost += 1; // length-extension byte
            }
            cost
        } else {
            u32::MAX
        };

        let (run_len, cost_literal) = if i == n - 1 {
            // last byte: a fresh run, framing byte + the literal itself
            (1u16, 2)
        } else {
            let next = nodes[i + 1];
            let (run, step) = if next.match_len != 0 {
                // next starts a match; its framing byte carries our length
                (1, 1)
            } else if next.run_len as usize == MAX_LITERALS {
                // next run is full: framing byte + literal + no-match token
                (1, 3)
            } else {
                let run = next.run_len + 1;
                // one more literal; +1 when the run first needs extension
                (run, if run as usize == NIBBLE_LIMIT { 2 } else { 1 })
            };
            (run, step + next.total_cost)
        };

        nodes[i] = if cost_match <= cost_literal {
            OptNode {
                total_cost: cost_match,
                match_len: m.length as u16,
                match_offset: m.offset as u16,
                run_len: 0,
            }
        } else {
            OptNode {
                total_cost: cost_literal,
                match_len: 0,
                match_offset: 0,
                run_len,
            }
        };
    }

    nodes
}

/// Forward pass: replay the recorded decisions through the chunk writer.
///
/// Literal runs are carried as (start, len) into the following match
/// chunk. Two adjacent runs can occur because the table was built
/// backward (e.g. 32 literals followed by a full 255-run); the first is
/// flushed with the no-match token.
fn emit(input: &[u8], nodes: &[OptNode]) -> Vec<u8> {
    let mut writer = ChunkWriter::new();
    let mut pending: Option<(usize, usize)> = None;
    let mut i = 0;

    while i < input.len() {
        let node = nodes[i];
        if node.match_len == 0 {
            if let Some((start, len)) = pending.take() {
                writer.literal_chunk(&input[start..start + len]);
            }
            pending = Some((i, node.run_len as usize));
            i += node.run_len as usize;
        } else {
            let literals = match pending.take() {
                Some((start, len)) => &input[start..start + len],
                None => &[],
            };
            writer.match_chunk(
                literals,
                Match {
                    offset: node.match_offset as usize,
                    length: node.match_len as usize,
                },
            );
            i += node.match_len as usize;
        }
    }

    match pending {
        Some((start, len)) => writer.finish(&input[start..start + len]),
        None => writer.finish(&[]),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
