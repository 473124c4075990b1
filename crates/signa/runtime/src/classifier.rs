//! Raw symbol sources.
//!
//! The pipeline only depends on [`Classifier`]; camera-backed detectors live
//! outside this workspace and plug in through the same trait.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use signa_types::{Symbol, SymbolError};

/// Per-tick source of raw classifications
pub trait Classifier: Send {
    /// Classify the next frame. `None` means nothing recognisable was seen.
    fn next_symbol(&mut self) -> Option<Symbol>;

    /// True once the source has no more frames to offer
    fn is_exhausted(&self) -> bool {
        false
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn next_symbol(&mut self) -> Option<Symbol> {
        (**self).next_symbol()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

/// Parse a raw frame script: one character per frame.
///
/// `A`-`D` (any case) are symbols, `.`, `-` and `_` are empty frames,
/// whitespace is ignored.
pub fn parse_frames(script: &str) -> Result<Vec<Option<Symbol>>, SymbolError> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '.' | '-' | '_' => Ok(None),
            other => Symbol::from_char(other)
                .map(Some)
                .ok_or(SymbolError::Unknown(other)),
        })
        .collect()
}

/// Expand a gesture literal into raw frames: each symbol held for
/// `hold_frames`, followed by `gap_frames` empty frames.
pub fn held_frames(gestures: &[Symbol], hold_frames: usize, gap_frames: usize) -> Vec<Option<Symbol>> {
    gestures
        .iter()
        .flat_map(|&symbol| {
            std::iter::repeat(Some(symbol))
                .take(hold_frames)
                .chain(std::iter::repeat(None).take(gap_frames))
        })
        .collect()
}

/// Replays a fixed list of raw frames, then reports exhaustion
#[derive(Debug, Clone, Default)]
pub struct ScriptedClassifier {
    frames: VecDeque<Option<Symbol>>,
}

impl ScriptedClassifier {
    pub fn new(frames: impl IntoIterator<Item = Option<Symbol>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Build from a frame script, see [`parse_frames`].
    pub fn parse(script: &str) -> Result<Self, SymbolError> {
        parse_frames(script).map(Self::new)
    }

    /// Hold every gesture of `literal` for `hold_frames` frames.
    pub fn held(literal: &str, hold_frames: usize, gap_frames: usize) -> Result<Self, SymbolError> {
        let gestures = Symbol::parse_sequence(literal)?;
        Ok(Self::new(held_frames(&gestures, hold_frames, gap_frames)))
    }

    /// Frames not yet consumed
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Classifier for ScriptedClassifier {
    fn next_symbol(&mut self) -> Option<Symbol> {
        self.frames.pop_front().flatten()
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Endless stand-in for a camera: cycles through a gesture script, holding
/// each gesture and pausing between them, with optional random jitter.
#[derive(Debug)]
pub struct SimulatedClassifier {
    frames: Vec<Option<Symbol>>,
    cursor: usize,
    noise: f64,
    rng: StdRng,
}

impl SimulatedClassifier {
    /// `noise` is the probability that a frame is replaced by a random
    /// symbol or an empty frame; it is clamped to `[0, 1]`.
    pub fn new(gestures: &[Symbol], hold_frames: usize, gap_frames: usize, noise: f64) -> Self {
        Self::with_rng(gestures, hold_frames, gap_frames, noise, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) with a reproducible jitter sequence.
    pub fn seeded(gestures: &[Symbol], hold_frames: usize, gap_frames: usize, noise: f64, seed: u64) -> Self {
        Self::with_rng(gestures, hold_frames, gap_frames, noise, StdRng::seed_from_u64(seed))
    }

    fn with_rng(gestures: &[Symbol], hold_frames: usize, gap_frames: usize, noise: f64, rng: StdRng) -> Self {
        Self {
            frames: held_frames(gestures, hold_frames, gap_frames),
            cursor: 0,
            noise: if noise.is_nan() { 0.0 } else { noise.clamp(0.0, 1.0) },
            rng,
        }
    }

    /// Frames in one full cycle of the script
    pub fn cycle_len(&self) -> usize {
        self.frames.len()
    }
}

impl Classifier for SimulatedClassifier {
    fn next_symbol(&mut self) -> Option<Symbol> {
        if self.frames.is_empty() {
            return None;
        }
        let frame = self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();

        if self.noise > 0.0 && self.rng.gen_bool(self.noise) {
            let pick = self.rng.gen_range(0..=Symbol::ALL.len());
            return Symbol::ALL.get(pick).copied();
        }
        frame
    }

    /// An empty script has nothing to cycle through.
    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_types::Symbol::{A, B, C};

    #[test]
    fn parses_frame_scripts() {
        let frames = parse_frames("AA.b -_ C").unwrap();
        assert_eq!(frames, vec![Some(A), Some(A), None, Some(B), None, None, Some(C)]);
        assert!(matches!(parse_frames("AX"), Err(SymbolError::Unknown('X'))));
    }

    #[test]
    fn scripted_replays_then_exhausts() {
        let mut classifier = ScriptedClassifier::parse("A.B").unwrap();
        assert_eq!(classifier.remaining(), 3);
        assert_eq!(classifier.next_symbol(), Some(A));
        assert_eq!(classifier.next_symbol(), None);
        assert!(!classifier.is_exhausted());
        assert_eq!(classifier.next_symbol(), Some(B));
        assert!(classifier.is_exhausted());
        assert_eq!(classifier.next_symbol(), None);
    }

    #[test]
    fn held_expands_with_gaps() {
        let classifier = ScriptedClassifier::held("AB", 3, 2).unwrap();
        let frames: Vec<_> = classifier.frames.iter().copied().collect();
        assert_eq!(
            frames,
            vec![Some(A), Some(A), Some(A), None, None, Some(B), Some(B), Some(B), None, None]
        );
    }

    #[test]
    fn simulated_cycles_without_noise() {
        let mut classifier = SimulatedClassifier::seeded(&[A, C], 2, 1, 0.0, 7);
        assert_eq!(classifier.cycle_len(), 6);
        let frames: Vec<_> = (0..12).map(|_| classifier.next_symbol()).collect();
        let cycle = vec![Some(A), Some(A), None, Some(C), Some(C), None];
        assert_eq!(frames[..6], cycle[..]);
        assert_eq!(frames[6..], cycle[..]);
        assert!(!classifier.is_exhausted());
    }

    #[test]
    fn simulated_without_frames_is_exhausted() {
        let mut classifier = SimulatedClassifier::seeded(&[A, B], 0, 0, 0.0, 7);
        assert_eq!(classifier.cycle_len(), 0);
        assert!(classifier.is_exhausted());
        assert_eq!(classifier.next_symbol(), None);
    }

    #[test]
    fn simulated_noise_is_reproducible() {
        let run = |seed| {
            let mut classifier = SimulatedClassifier::seeded(&[A], 10, 0, 0.5, seed);
            (0..50).map(|_| classifier.next_symbol()).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
        assert!(run(42).iter().any(|f| *f != Some(A)));
    }

    #[test]
    fn boxed_classifier_delegates() {
        let mut boxed: Box<dyn Classifier> = Box::new(ScriptedClassifier::parse("C").unwrap());
        assert_eq!(boxed.next_symbol(), Some(C));
        assert!(boxed.is_exhausted());
    }
}
