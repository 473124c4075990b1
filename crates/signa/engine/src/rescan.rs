use std::sync::Arc;

use chrono::{DateTime, Utc};
use signa_registry::PatternRegistry;
use signa_types::{PatternDefinition, PatternEvent, Symbol};

use crate::buffer::SequenceBuffer;
use crate::kmp::KmpAutomaton;
use crate::matcher::{gate_allows, MatchStrategy, MatchStrategyKind, MatcherSnapshot};

#[derive(Clone, Debug)]
struct RescanEntry {
    definition: Arc<PatternDefinition>,
    automaton: KmpAutomaton,
    last_match_end: Option<u64>,
    fired: u64,
}

/// Non-incremental strategy: every confirmed symbol triggers a full KMP
/// scan of the retained window, reporting the first occurrence per pattern
/// that starts after that pattern's last reported match.
///
/// Produces the same events as [`MultiPatternMatcher`](crate::MultiPatternMatcher)
/// as long as the window is at least as long as the longest pattern, at
/// O(window) cost per symbol instead of amortized O(1).
#[derive(Clone, Debug)]
pub struct RescanMatcher {
    entries: Vec<RescanEntry>,
}

impl RescanMatcher {
    pub fn new(registry: &PatternRegistry) -> Self {
        Self {
            entries: registry
                .definitions()
                .iter()
                .map(|def| RescanEntry {
                    definition: Arc::clone(def),
                    automaton: KmpAutomaton::new(def.pattern.clone()),
                    last_match_end: None,
                    fired: 0,
                })
                .collect(),
        }
    }
}

impl MatchStrategy for RescanMatcher {
    fn advance(
        &mut self,
        buffer: &SequenceBuffer,
        _symbol: Symbol,
        _index: u64,
        at: DateTime<Utc>,
    ) -> Vec<PatternEvent> {
        let first = buffer.first_index();
        let mut events = Vec::new();

        for entry in &mut self.entries {
            let len = entry.definition.len() as u64;
            let hit = entry
                .automaton
                .find_all(buffer.iter())
                .into_iter()
                .map(|offset| {
                    let end = first + offset as u64;
                    (end + 1 - len, end)
                })
                .find(|&(start, _)| gate_allows(entry.last_match_end, start));

            if let Some((start, end)) = hit {
                entry.last_match_end = Some(end);
                entry.fired += 1;
                events.push(PatternEvent::from_definition(&entry.definition, start, end, at));
            }
        }
        events
    }

    fn reset(&mut self, index: u64) {
        for entry in &mut self.entries {
            entry.last_match_end = Some(entry.last_match_end.map_or(index, |end| end.max(index)));
        }
    }

    fn snapshot(&self) -> Vec<MatcherSnapshot> {
        self.entries
            .iter()
            .map(|e| MatcherSnapshot {
                pattern_name: e.definition.name.clone(),
                pattern_literal: e.definition.literal(),
                progress: None,
                last_match_end: e.last_match_end,
                fired: e.fired,
            })
            .collect()
    }

    fn kind(&self) -> MatchStrategyKind {
        MatchStrategyKind::Rescan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_types::Severity;

    fn feed(m: &mut RescanMatcher, buf: &mut SequenceBuffer, literal: &str) -> Vec<(String, u64, u64)> {
        let now = Utc::now();
        let mut out = Vec::new();
        for s in Symbol::parse_sequence(literal).unwrap() {
            let idx = buf.append(s);
            out.extend(
                m.advance(buf, s, idx, now)
                    .into_iter()
                    .map(|e| (e.pattern_name, e.start_index, e.end_index)),
            );
        }
        out
    }

    #[test]
    fn gated_rescan_reports_each_occurrence_once() {
        let reg = PatternRegistry::builder()
            .pattern("aaaaa", "AAAAA", Severity::Critical, "x", "")
            .build()
            .unwrap();
        let mut m = RescanMatcher::new(&reg);
        let mut buf = SequenceBuffer::new(50);
        assert_eq!(feed(&mut m, &mut buf, "AAAAAA"), vec![("aaaaa".into(), 0, 4)]);
    }

    #[test]
    fn scans_only_the_live_window_after_clear() {
        let reg = PatternRegistry::builder()
            .pattern("abc", "ABC", Severity::Critical, "x", "")
            .build()
            .unwrap();
        let mut m = RescanMatcher::new(&reg);
        let mut buf = SequenceBuffer::new(50);
        feed(&mut m, &mut buf, "AB");
        buf.clear();
        m.reset(1);
        assert!(feed(&mut m, &mut buf, "C").is_empty());
        assert_eq!(feed(&mut m, &mut buf, "ABC"), vec![("abc".into(), 3, 5)]);
    }

    #[test]
    fn snapshot_has_no_running_progress() {
        let m = RescanMatcher::new(&PatternRegistry::builtin());
        let snap = m.snapshot();
        assert_eq!(snap.len(), 5);
        assert!(snap.iter().all(|s| s.progress.is_none() && s.last_match_end.is_none()));
    }
}
