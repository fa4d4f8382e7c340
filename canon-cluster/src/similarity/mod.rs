//! Ratcliff/Obershelp string similarity.
//!
//! `2 * M / T`, where `M` is the total length of the recursively longest
//! matching blocks and `T` the combined length of both strings. Char-level,
//! matching `difflib.SequenceMatcher.ratio()` without junk heuristics.

use canon_core::types::collections::FxHashMap;

/// Fallback grouping threshold used when no pattern rule matches.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Similarity ratio in `[0.0, 1.0]`. Two empty strings compare as 1.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_len(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total length of all matching blocks: the longest common substring, then
/// recursively the pieces to its left and right.
fn matching_len(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, len) = longest_match(a, b, alo, ahi, blo, bhi);
        if len == 0 {
            continue;
        }
        total += len;
        pending.push((alo, i, blo, j));
        pending.push((i + len, ahi, j + len, bhi));
    }

    total
}

/// Longest matching block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, len)` with the earliest block winning ties, like
/// difflib's `find_longest_match`. Row-by-row DP keyed on `j` keeps the
/// working set at O(min window) instead of a full matrix.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    let mut j2len: FxHashMap<usize, usize> = FxHashMap::default();

    for i in alo..ahi {
        let mut row: FxHashMap<usize, usize> = FxHashMap::default();
        for j in blo..bhi {
            if a[i] == b[j] {
                let len = if j > blo {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                row.insert(j, len);
                if len > best_len {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_len = len;
                }
            }
        }
        j2len = row;
    }

    (best_i, best_j, best_len)
}
