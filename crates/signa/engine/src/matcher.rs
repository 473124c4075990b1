use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signa_registry::PatternRegistry;
use signa_types::{PatternDefinition, PatternEvent, Symbol};
use tracing::debug;

use crate::buffer::SequenceBuffer;
use crate::kmp::KmpAutomaton;
use crate::rescan::RescanMatcher;

/// How the pipeline looks for patterns in the evidence stream.
pub trait MatchStrategy: Send {
    /// Called once per confirmed symbol, after it was appended to `buffer`
    /// at global `index`. Returns events in registration order.
    fn advance(
        &mut self,
        buffer: &SequenceBuffer,
        symbol: Symbol,
        index: u64,
        at: DateTime<Utc>,
    ) -> Vec<PatternEvent>;

    /// Discard all progress and move every non-overlap gate to `index`.
    fn reset(&mut self, index: u64);

    fn snapshot(&self) -> Vec<MatcherSnapshot>;

    fn kind(&self) -> MatchStrategyKind;
}

/// Selectable matching strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategyKind {
    /// One KMP automaton per pattern, advanced incrementally.
    #[default]
    Incremental,
    /// Full rescan of the retained window on every symbol.
    Rescan,
}

impl MatchStrategyKind {
    pub fn build(self, registry: &PatternRegistry) -> Box<dyn MatchStrategy> {
        match self {
            Self::Incremental => Box::new(MultiPatternMatcher::new(registry)),
            Self::Rescan => Box::new(RescanMatcher::new(registry)),
        }
    }
}

impl std::fmt::Display for MatchStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incremental => write!(f, "incremental"),
            Self::Rescan => write!(f, "rescan"),
        }
    }
}

/// Per-pattern view for status displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatcherSnapshot {
    pub pattern_name: String,
    pub pattern_literal: String,
    /// Symbols of the pattern currently matched; `None` when the strategy keeps no running state.
    pub progress: Option<usize>,
    pub last_match_end: Option<u64>,
    pub fired: u64,
}

/// Streaming matcher for a single pattern with its non-overlap gate.
#[derive(Clone, Debug)]
pub struct PatternMatcher {
    definition: Arc<PatternDefinition>,
    automaton: KmpAutomaton,
    last_match_end: Option<u64>,
    fired: u64,
}

impl PatternMatcher {
    pub fn new(definition: Arc<PatternDefinition>) -> Self {
        let automaton = KmpAutomaton::new(definition.pattern.clone());
        Self {
            definition,
            automaton,
            last_match_end: None,
            fired: 0,
        }
    }

    /// Step the automaton with the symbol stored at global `index`.
    ///
    /// Returns an event only when an occurrence completes and starts after
    /// the previous reported occurrence of this same pattern ended.
    pub fn advance(&mut self, symbol: Symbol, index: u64, at: DateTime<Utc>) -> Option<PatternEvent> {
        if !self.automaton.step(symbol) {
            return None;
        }

        let len = self.definition.len() as u64;
        let start = (index + 1).saturating_sub(len);
        if !gate_allows(self.last_match_end, start) {
            debug!(
                pattern = %self.definition.name,
                start,
                end = index,
                "overlapping occurrence suppressed"
            );
            return None;
        }

        self.last_match_end = Some(index);
        self.fired += 1;
        Some(PatternEvent::from_definition(&self.definition, start, index, at))
    }

    pub fn reset(&mut self, index: u64) {
        self.automaton.reset();
        self.last_match_end = Some(self.last_match_end.map_or(index, |end| end.max(index)));
    }

    pub fn definition(&self) -> &PatternDefinition {
        &self.definition
    }

    pub fn last_match_end(&self) -> Option<u64> {
        self.last_match_end
    }

    pub fn progress(&self) -> usize {
        self.automaton.state()
    }

    pub fn snapshot(&self) -> MatcherSnapshot {
        MatcherSnapshot {
            pattern_name: self.definition.name.clone(),
            pattern_literal: self.definition.literal(),
            progress: Some(self.automaton.state()),
            last_match_end: self.last_match_end,
            fired: self.fired,
        }
    }
}

/// True when an occurrence starting at `start` does not overlap the last reported one.
pub(crate) fn gate_allows(last_match_end: Option<u64>, start: u64) -> bool {
    last_match_end.map_or(true, |end| start > end)
}

/// One [`PatternMatcher`] per registered pattern, in registration order.
///
/// Work per confirmed symbol is amortized O(1) per pattern, so a session of
/// any length costs time linear in the number of confirmed symbols.
#[derive(Clone, Debug)]
pub struct MultiPatternMatcher {
    matchers: Vec<PatternMatcher>,
}

impl MultiPatternMatcher {
    pub fn new(registry: &PatternRegistry) -> Self {
        Self {
            matchers: registry
                .definitions()
                .iter()
                .cloned()
                .map(PatternMatcher::new)
                .collect(),
        }
    }

    /// Feed one confirmed symbol to every pattern.
    pub fn feed(&mut self, symbol: Symbol, index: u64, at: DateTime<Utc>) -> Vec<PatternEvent> {
        self.matchers
            .iter_mut()
            .filter_map(|m| m.advance(symbol, index, at))
            .collect()
    }

    pub fn matchers(&self) -> &[PatternMatcher] {
        &self.matchers
    }
}

impl MatchStrategy for MultiPatternMatcher {
    fn advance(
        &mut self,
        _buffer: &SequenceBuffer,
        symbol: Symbol,
        index: u64,
        at: DateTime<Utc>,
    ) -> Vec<PatternEvent> {
        self.feed(symbol, index, at)
    }

    fn reset(&mut self, index: u64) {
        for m in &mut self.matchers {
            m.reset(index);
        }
    }

    fn snapshot(&self) -> Vec<MatcherSnapshot> {
        self.matchers.iter().map(PatternMatcher::snapshot).collect()
    }

    fn kind(&self) -> MatchStrategyKind {
        MatchStrategyKind::Incremental
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_types::Severity;

    fn registry(patterns: &[(&str, &str)]) -> PatternRegistry {
        patterns
            .iter()
            .fold(PatternRegistry::builder(), |b, (name, lit)| {
                b.pattern(*name, lit, Severity::Critical, "alert", "")
            })
            .build()
            .unwrap()
    }

    fn run(matcher: &mut MultiPatternMatcher, literal: &str) -> Vec<(String, u64, u64)> {
        let now = Utc::now();
        Symbol::parse_sequence(literal)
            .unwrap()
            .into_iter()
            .enumerate()
            .flat_map(|(i, s)| matcher.feed(s, i as u64, now))
            .map(|e| (e.pattern_name, e.start_index, e.end_index))
            .collect()
    }

    #[test]
    fn single_occurrence() {
        let mut m = MultiPatternMatcher::new(&registry(&[("abc", "ABC")]));
        assert_eq!(run(&mut m, "ABC"), vec![("abc".into(), 0, 2)]);
    }

    #[test]
    fn overlapping_run_fires_once() {
        let mut m = MultiPatternMatcher::new(&registry(&[("aaaaa", "AAAAA")]));
        assert_eq!(run(&mut m, "AAAAAA"), vec![("aaaaa".into(), 0, 4)]);
        assert_eq!(m.matchers()[0].last_match_end(), Some(4));
    }

    #[test]
    fn non_overlapping_repeat_fires_again() {
        let mut m = MultiPatternMatcher::new(&registry(&[("aa", "AA")]));
        assert_eq!(
            run(&mut m, "AAAA"),
            vec![("aa".into(), 0, 1), ("aa".into(), 2, 3)]
        );
    }

    #[test]
    fn distinct_patterns_report_in_registration_order() {
        let mut m = MultiPatternMatcher::new(&registry(&[("second", "BC"), ("first", "ABC")]));
        assert_eq!(
            run(&mut m, "ABC"),
            vec![("second".into(), 1, 2), ("first".into(), 0, 2)]
        );
    }

    #[test]
    fn reset_discards_progress_and_moves_gates() {
        let mut m = MultiPatternMatcher::new(&registry(&[("abc", "ABC")]));
        let now = Utc::now();
        m.feed(Symbol::A, 0, now);
        m.feed(Symbol::B, 1, now);
        assert_eq!(m.matchers()[0].progress(), 2);

        MatchStrategy::reset(&mut m, 1);
        assert_eq!(m.matchers()[0].progress(), 0);
        assert_eq!(m.matchers()[0].last_match_end(), Some(1));
        assert!(m.feed(Symbol::C, 2, now).is_empty());
    }

    #[test]
    fn reset_never_moves_a_gate_backwards() {
        let mut m = MultiPatternMatcher::new(&registry(&[("aa", "AA")]));
        run(&mut m, "AA");
        MatchStrategy::reset(&mut m, 0);
        assert_eq!(m.matchers()[0].last_match_end(), Some(1));
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut m = MultiPatternMatcher::new(&registry(&[("acac", "ACAC")]));
        run(&mut m, "ACA");
        let snap = MatchStrategy::snapshot(&m);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].progress, Some(3));
        assert_eq!(snap[0].pattern_literal, "ACAC");
        assert_eq!(snap[0].fired, 0);
    }

    #[test]
    fn strategy_kind_serde_and_build() {
        let kind: MatchStrategyKind = serde_json::from_str("\"rescan\"").unwrap();
        assert_eq!(kind, MatchStrategyKind::Rescan);
        assert_eq!(MatchStrategyKind::default(), MatchStrategyKind::Incremental);

        let reg = registry(&[("abc", "ABC")]);
        assert_eq!(MatchStrategyKind::Rescan.build(&reg).kind(), MatchStrategyKind::Rescan);
        assert_eq!(
            MatchStrategyKind::Incremental.build(&reg).kind(),
            MatchStrategyKind::Incremental
        );
    }
}
