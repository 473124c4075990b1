#![deny(unsafe_code)]
//! # signa-engine
//!
//! The sequential automatons at the heart of a detection session:
//!
//! - [`Debouncer`]: turns a jittery per-tick raw symbol into confirmed symbols
//! - [`SequenceBuffer`]: bounded evidence window over a global, never-reused index space
//! - [`MultiPatternMatcher`]: one KMP automaton per registered pattern, advanced
//!   once per confirmed symbol in amortized constant time
//! - [`RescanMatcher`]: full rescan of the live window; same events, linear cost per symbol
//!
//! Nothing here is thread-safe by itself; a session owns these values from a
//! single task.

pub mod buffer;
pub mod debounce;
pub mod kmp;
pub mod matcher;
pub mod rescan;

pub use buffer::{BufferSnapshot, SequenceBuffer};
pub use debounce::{DebounceConfig, DebounceSnapshot, Debouncer};
pub use kmp::{failure_function, KmpAutomaton};
pub use matcher::{
    MatchStrategy, MatchStrategyKind, MatcherSnapshot, MultiPatternMatcher, PatternMatcher,
};
pub use rescan::RescanMatcher;
