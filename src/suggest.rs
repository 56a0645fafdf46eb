//! "Did you mean" hints for unresolved names.

/// Edit distance used by the analyzer when no threshold is configured.
pub const DEFAULT_SUGGESTION_THRESHOLD: usize = 2;

/// Picks the closest declared name for a misspelled reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggester {
    threshold: usize,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(DEFAULT_SUGGESTION_THRESHOLD)
    }
}

impl Suggester {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Closest candidate within the threshold. Ties go to the candidate listed
    /// first, so callers must pass candidates in declaration order.
    pub fn closest<'c>(&self, name: &str, candidates: &[&'c str]) -> Option<&'c str> {
        let mut best: Option<(usize, &'c str)> = None;
        for &candidate in candidates {
            let distance = levenshtein(name, candidate);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, candidate));
            }
        }
        best.filter(|(distance, _)| *distance <= self.threshold)
            .map(|(_, candidate)| candidate)
    }

    /// Rendered hint, e.g. `Did you mean 'counter'?`.
    pub fn suggest(&self, name: &str, candidates: &[&str]) -> Option<String> {
        self.closest(name, candidates)
            .map(|candidate| format!("Did you mean '{}'?", candidate))
    }
}

/// Case-sensitive Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
