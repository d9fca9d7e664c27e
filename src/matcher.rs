//! Fuzzy title matching.
//!
//! Decides whether two free-text names (track or album titles) denote the same
//! item, tolerating case, spacing and small spelling differences.
//!
//! The relation is reflexive and symmetric but NOT transitive: "A" may match
//! "B" and "B" match "C" while "A" and "C" do not. Callers only ever ask
//! "does X match any of Y" against explicit lists; nothing builds equivalence
//! classes out of it.

/// Default similarity threshold
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Similarity ratio (0.0-1.0) between two strings.
///
/// Both inputs are lowercased and whitespace-collapsed, then compared with
/// `2 * LCS / (len(a) + len(b))` over characters, where LCS is the longest
/// common subsequence. Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// True when the similarity ratio of `a` and `b` is strictly above `threshold`.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity_ratio(a, b) > threshold
}

/// A matcher bound to one threshold.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    threshold: f64,
}

impl Matcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        is_similar(a, b, self.threshold)
    }

    /// Pairwise scan: is `candidate` similar to any of `names`?
    pub fn matches_any<'a, I>(&self, candidate: &str, names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().any(|name| self.is_similar(candidate, name))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length of the longest common subsequence, one DP row at a time.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
