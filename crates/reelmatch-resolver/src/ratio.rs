use reelmatch_core::traits::TitleSimilarity;

/// Ratcliff/Obershelp similarity: `2 * M / (len(a) + len(b))`, where `M` is the
/// number of characters in the matching blocks found by repeatedly taking the
/// longest common substring and recursing on both sides of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl TitleSimilarity for SequenceRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 { ratio(a, b) }
}

pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 { return 1.0; }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 { continue; }
        matched += k;
        if alo < i && blo < j { pending.push((alo, i, blo, j)); }
        if i + k < ahi && j + k < bhi { pending.push((i + k, ahi, j + k, bhi)); }
    }
    matched
}

/// Longest common run in `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`;
/// among equally long runs the one starting earliest in `a`, then in `b`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        let mut cur = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                cur[j - blo + 1] = k;
                if k > best.2 { best = (i + 1 - k, j + 1 - k, k); }
            }
        }
        prev = cur;
    }
    best
}
