//! Property tests: debouncing, matching strategies, non-overlap gating and window truncation.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use signa_engine::{DebounceConfig, Debouncer, MatchStrategy, MatchStrategyKind, SequenceBuffer};
use signa_registry::PatternRegistry;
use signa_types::{PatternDefinition, PatternEvent, Severity, Symbol};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(0, 0).unwrap()
}

fn arb_symbol() -> impl Strategy<Value = Symbol> {
    prop::sample::select(Symbol::ALL.to_vec())
}

/// Streams drawn from a two-letter sub-alphabet hit short patterns often.
fn arb_dense_symbol() -> impl Strategy<Value = Symbol> {
    prop::sample::select(vec![Symbol::A, Symbol::C])
}

fn arb_stream() -> impl Strategy<Value = Vec<Symbol>> {
    prop_oneof![
        prop::collection::vec(arb_symbol(), 0..200),
        prop::collection::vec(arb_dense_symbol(), 0..200),
    ]
}

fn arb_registry() -> impl Strategy<Value = PatternRegistry> {
    prop::collection::vec(
        prop_oneof![
            prop::collection::vec(arb_symbol(), 1..7),
            prop::collection::vec(arb_dense_symbol(), 1..7),
        ],
        1..5,
    )
    .prop_map(|patterns| {
        let defs = patterns
            .into_iter()
            .enumerate()
            .map(|(i, p)| PatternDefinition::new(format!("p{i}"), p, Severity::High, "alert", ""))
            .collect();
        PatternRegistry::new(defs).unwrap()
    })
}

/// Raw frames with the gap to the previous frame, in milliseconds.
fn arb_raw_frames() -> impl Strategy<Value = Vec<(Option<Symbol>, u64)>> {
    prop::collection::vec(
        (
            prop_oneof![
                6 => prop::sample::select(vec![Symbol::A, Symbol::B]).prop_map(Some),
                1 => Just(None),
            ],
            0u64..200,
        ),
        0..400,
    )
}

/// Drive a strategy over a confirmed-symbol stream the way the pipeline does.
fn drive(
    kind: MatchStrategyKind,
    registry: &PatternRegistry,
    stream: &[Symbol],
    capacity: usize,
    clear_on_alert: bool,
) -> Vec<PatternEvent> {
    let mut strategy = kind.build(registry);
    let mut buffer = SequenceBuffer::new(capacity);
    let mut events = Vec::new();

    for &symbol in stream {
        let index = buffer.append(symbol);
        let fired = strategy.advance(&buffer, symbol, index, epoch());
        if clear_on_alert && !fired.is_empty() {
            buffer.clear();
            strategy.reset(index);
        }
        events.extend(fired);
    }
    events
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Incremental and full-rescan matching report identical ordered events.
    #[test]
    fn strategies_agree(
        registry in arb_registry(),
        stream in arb_stream(),
        slack in 0usize..20,
        clear_on_alert in any::<bool>(),
    ) {
        let capacity = registry.max_pattern_len() + slack;
        let incremental = drive(MatchStrategyKind::Incremental, &registry, &stream, capacity, clear_on_alert);
        let rescan = drive(MatchStrategyKind::Rescan, &registry, &stream, capacity, clear_on_alert);
        prop_assert_eq!(incremental, rescan);
    }

    /// Successive matches of one pattern never overlap.
    #[test]
    fn matches_of_a_pattern_never_overlap(
        registry in arb_registry(),
        stream in arb_stream(),
        clear_on_alert in any::<bool>(),
    ) {
        let events = drive(MatchStrategyKind::Incremental, &registry, &stream, 500, clear_on_alert);
        for name in registry.names() {
            let spans: Vec<(u64, u64)> = events
                .iter()
                .filter(|e| e.pattern_name == name)
                .map(|e| (e.start_index, e.end_index))
                .collect();
            for pair in spans.windows(2) {
                prop_assert!(pair[1].0 > pair[0].1, "{} overlaps: {:?}", name, pair);
            }
        }
    }

    /// A window as short as the longest pattern loses no detections.
    #[test]
    fn truncation_does_not_change_matches(
        registry in arb_registry(),
        stream in arb_stream(),
        clear_on_alert in any::<bool>(),
    ) {
        let tight = drive(
            MatchStrategyKind::Rescan,
            &registry,
            &stream,
            registry.max_pattern_len(),
            clear_on_alert,
        );
        let roomy = drive(MatchStrategyKind::Incremental, &registry, &stream, 10_000, clear_on_alert);
        prop_assert_eq!(tight, roomy);
    }

    /// Every reported span really holds the pattern.
    #[test]
    fn reported_spans_hold_the_pattern(
        registry in arb_registry(),
        stream in arb_stream(),
    ) {
        let events = drive(MatchStrategyKind::Incremental, &registry, &stream, 500, false);
        for e in &events {
            let span = &stream[e.start_index as usize..=e.end_index as usize];
            let literal: String = span.iter().map(|s| s.as_char()).collect();
            prop_assert_eq!(&literal, &e.pattern_literal);
        }
    }

    /// Held symbols confirm at most once per interval, never before enough identical frames.
    #[test]
    fn debouncer_respects_frames_and_interval(
        frames in arb_raw_frames(),
        confirm_frames in 1u32..10,
        repeat_interval_ms in 0u64..1500,
    ) {
        let config = DebounceConfig { confirm_frames, repeat_interval_ms };
        let mut debouncer = Debouncer::new(config);
        let base = Instant::now();
        let mut at = Duration::ZERO;
        let mut streak: Option<(Symbol, u32)> = None;
        let mut last_confirmed: Option<(Symbol, Duration)> = None;

        for (raw, gap) in frames {
            at += Duration::from_millis(gap);
            streak = match (raw, streak) {
                (Some(s), Some((prev, n))) if s == prev => Some((s, n + 1)),
                (Some(s), _) => Some((s, 1)),
                (None, _) => None,
            };

            if let Some(symbol) = debouncer.feed(raw, base + at) {
                prop_assert_eq!(raw, Some(symbol));
                let (_, run) = streak.unwrap();
                prop_assert!(run >= confirm_frames);
                if let Some((prev, when)) = last_confirmed {
                    if prev == symbol {
                        prop_assert!(at - when >= Duration::from_millis(repeat_interval_ms));
                    }
                }
                last_confirmed = Some((symbol, at));
            }
        }
    }
}
