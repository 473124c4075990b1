//! Descriptive metadata for the gesture alphabet.
//!
//! Purely informational: status displays and the CLI legend read it, the
//! detection path never does.

use serde::Serialize;
use signa_types::Symbol;

/// How a symbol is physically signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GestureInfo {
    pub symbol: Symbol,
    pub name: &'static str,
    pub extended_fingers: u8,
    pub description: &'static str,
    pub usage: &'static str,
}

/// Read-only table of [`GestureInfo`], one entry per symbol.
#[derive(Clone, Debug)]
pub struct GestureCatalog {
    gestures: Vec<GestureInfo>,
}

impl GestureCatalog {
    pub fn builtin() -> Self {
        Self {
            gestures: vec![
                GestureInfo {
                    symbol: Symbol::A,
                    name: "Open Hand",
                    extended_fingers: 5,
                    description: "Hand fully open, all five fingers extended",
                    usage: "Basic distress signal",
                },
                GestureInfo {
                    symbol: Symbol::B,
                    name: "Three Fingers",
                    extended_fingers: 3,
                    description: "Index, middle and ring fingers extended",
                    usage: "Discreet help request in public",
                },
                GestureInfo {
                    symbol: Symbol::C,
                    name: "Closed Fist",
                    extended_fingers: 0,
                    description: "Hand fully closed, no fingers extended",
                    usage: "Part of distress sequences",
                },
                GestureInfo {
                    symbol: Symbol::D,
                    name: "Thumb Only",
                    extended_fingers: 1,
                    description: "Only the thumb extended",
                    usage: "Medical help when unable to speak",
                },
            ],
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&GestureInfo> {
        self.gestures.iter().find(|g| g.symbol == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureInfo> {
        self.gestures.iter()
    }
}

impl Default for GestureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
