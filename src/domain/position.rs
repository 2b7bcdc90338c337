//! Held position derived from a signal sequence.

use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    Short,
    #[default]
    Flat,
    Long,
}

impl Position {
    pub fn value(self) -> i8 {
        match self {
            Position::Short => -1,
            Position::Flat => 0,
            Position::Long => 1,
        }
    }

    /// Multiplier applied to the market return while this position is held.
    pub fn exposure(self) -> f64 {
        self.value() as f64
    }

    pub fn is_long(self) -> bool {
        self == Position::Long
    }

    pub fn is_short(self) -> bool {
        self == Position::Short
    }

    /// The position after observing `signal` while holding `self`.
    pub fn apply(self, signal: Signal) -> Position {
        match signal {
            Signal::Buy => Position::Long,
            Signal::Sell => Position::Short,
            Signal::Hold => self,
        }
    }
}

/// Carries the last non-hold signal forward, starting flat.
pub fn derive_positions(signals: &[Signal]) -> Vec<Position> {
    signals
        .iter()
        .scan(Position::Flat, |held, &signal| {
            *held = held.apply(signal);
            Some(*held)
        })
        .collect()
}
