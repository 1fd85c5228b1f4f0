//! Ratcliff/Obershelp string similarity.
//!
//! The ratio is `2 * M / (len(a) + len(b))`, where `M` is the number of
//! characters in the matching blocks found by taking the longest common
//! substring and recursing on the pieces to its left and right. It is the same
//! measure as Python's `difflib.SequenceMatcher.ratio()` without junk
//! heuristics. Comparison is by Unicode scalar value and case-sensitive.

/// Similarity of two strings in `[0, 1]`; two empty strings score 1.0
#[must_use]
#[allow(clippy::cast_precision_loss)] // Title lengths are tiny
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_characters(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Among equally long blocks the one starting earliest in `a` wins, then the
/// one starting earliest in `b`. Returns `(start_a, start_b, size)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // run[j - blo] = length of the common suffix ending at a[i], b[j]
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            if a[i] == b[j] {
                cur[k] = prev[k - 1] + 1;
                if cur[k] > best_size {
                    best_size = cur[k];
                    best_i = i + 1 - best_size;
                    best_j = j + 1 - best_size;
                }
            } else {
                cur[k] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_size)
}
