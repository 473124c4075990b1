//! Knuth-Morris-Pratt automaton over the symbol alphabet.

use signa_types::Symbol;

/// For every prefix length `k + 1`, the length of the longest proper prefix
/// of `pattern[..=k]` that is also a suffix of it.
pub fn failure_function(pattern: &[Symbol]) -> Vec<usize> {
    let mut failure = vec![0; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = failure[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        failure[i] = k;
    }
    failure
}

/// Streaming exact matcher for one pattern.
///
/// `state` is the length of the longest pattern prefix that is a suffix of
/// everything stepped so far. After a full match the state falls back through
/// the failure table, so overlapping occurrences are still reported.
#[derive(Clone, Debug)]
pub struct KmpAutomaton {
    pattern: Vec<Symbol>,
    failure: Vec<usize>,
    state: usize,
}

impl KmpAutomaton {
    pub fn new(pattern: Vec<Symbol>) -> Self {
        let failure = failure_function(&pattern);
        Self {
            pattern,
            failure,
            state: 0,
        }
    }

    /// Consume one symbol; true when it completes an occurrence.
    ///
    /// An empty pattern never matches.
    pub fn step(&mut self, symbol: Symbol) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        while self.state > 0 && self.pattern[self.state] != symbol {
            self.state = self.failure[self.state - 1];
        }
        if self.pattern[self.state] == symbol {
            self.state += 1;
        }
        if self.state == self.pattern.len() {
            self.state = self.failure[self.state - 1];
            return true;
        }
        false
    }

    /// Offsets (0-based, into `haystack`) at which occurrences end, in order.
    ///
    /// Runs on a fresh state and leaves `self` untouched.
    pub fn find_all<I>(&self, haystack: I) -> Vec<usize>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut scanner = Self {
            pattern: self.pattern.clone(),
            failure: self.failure.clone(),
            state: 0,
        };
        haystack
            .into_iter()
            .enumerate()
            .filter_map(|(i, s)| scanner.step(s).then_some(i))
            .collect()
    }

    /// Length of the pattern prefix matched so far.
    pub fn state(&self) -> usize {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0;
    }

    pub fn pattern(&self) -> &[Symbol] {
        &self.pattern
    }

    pub fn failure(&self) -> &[usize] {
        &self.failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_types::Symbol::{A, B, C, D};

    fn seq(literal: &str) -> Vec<Symbol> {
        Symbol::parse_sequence(literal).unwrap()
    }

    #[test]
    fn failure_tables() {
        assert_eq!(failure_function(&seq("ABC")), vec![0, 0, 0]);
        assert_eq!(failure_function(&seq("AAAAA")), vec![0, 1, 2, 3, 4]);
        assert_eq!(failure_function(&seq("ACACAC")), vec![0, 0, 1, 2, 3, 4]);
        assert_eq!(failure_function(&seq("AABAAA")), vec![0, 1, 0, 1, 2, 2]);
        assert!(failure_function(&[]).is_empty());
    }

    #[test]
    fn step_reports_each_completion() {
        let mut kmp = KmpAutomaton::new(seq("ABC"));
        let hits: Vec<bool> = [A, B, C, A, B, C].into_iter().map(|s| kmp.step(s)).collect();
        assert_eq!(hits, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn overlapping_occurrences_are_found() {
        let kmp = KmpAutomaton::new(seq("AAAAA"));
        assert_eq!(kmp.find_all(seq("AAAAAA")), vec![4, 5]);

        let kmp = KmpAutomaton::new(seq("ACAC"));
        assert_eq!(kmp.find_all(seq("ACACAC")), vec![3, 5]);
    }

    #[test]
    fn mismatch_falls_back_without_losing_progress() {
        // "AAB" inside "AAAB": the third A must not discard the AA prefix.
        let kmp = KmpAutomaton::new(seq("AAB"));
        assert_eq!(kmp.find_all(seq("AAAB")), vec![3]);
    }

    #[test]
    fn state_tracks_partial_progress_and_resets() {
        let mut kmp = KmpAutomaton::new(seq("DDDDD"));
        for _ in 0..3 {
            kmp.step(D);
        }
        assert_eq!(kmp.state(), 3);
        kmp.reset();
        assert_eq!(kmp.state(), 0);
    }

    #[test]
    fn find_all_leaves_state_alone() {
        let mut kmp = KmpAutomaton::new(seq("AB"));
        kmp.step(A);
        assert_eq!(kmp.find_all(seq("ABAB")), vec![1, 3]);
        assert_eq!(kmp.state(), 1);
    }

    #[test]
    fn empty_pattern_never_matches() {
        let mut kmp = KmpAutomaton::new(vec![]);
        assert!(!kmp.step(A));
        assert!(kmp.find_all(seq("ABCD")).is_empty());
    }

    #[test]
    fn agrees_with_naive_search() {
        let hay = seq("ACACABACACACDACAC");
        let needle = seq("ACAC");
        let naive: Vec<usize> = (needle.len() - 1..hay.len())
            .filter(|&end| hay[end + 1 - needle.len()..=end] == needle[..])
            .collect();
        assert_eq!(KmpAutomaton::new(needle).find_all(hay), naive);
    }
}
