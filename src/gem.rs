//! Gem definitions and colors
//!
//! Four base colors plus a wildcard "bonus" token that extends runs of any
//! single color.

use ratatui::style::Color;

/// The five gem kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemKind {
    Energy,  // Cyan - energy core
    Data,    // Pink - data shard
    Circuit, // Green - circuit chip
    Quantum, // Purple - quantum node
    Bonus,   // Yellow - wildcard token
}

impl GemKind {
    /// Get the color for this gem
    pub fn color(&self) -> Color {
        match self {
            GemKind::Energy => Color::Cyan,
            GemKind::Data => Color::Rgb(255, 105, 180), // Pink
            GemKind::Circuit => Color::Green,
            GemKind::Quantum => Color::Magenta,
            GemKind::Bonus => Color::Yellow,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GemKind::Energy => "Energy Core",
            GemKind::Data => "Data Shard",
            GemKind::Circuit => "Circuit Chip",
            GemKind::Quantum => "Quantum Node",
            GemKind::Bonus => "Bonus Token",
        }
    }

    /// The four base kinds the spawner draws from (never includes the wildcard)
    pub fn base() -> [GemKind; 4] {
        [
            GemKind::Energy,
            GemKind::Data,
            GemKind::Circuit,
            GemKind::Quantum,
        ]
    }

    /// Whether this gem matches any base color in a run
    pub fn is_wild(&self) -> bool {
        matches!(self, GemKind::Bonus)
    }
}

/// A gem resting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gem {
    pub kind: GemKind,
    /// Unique per game, assigned at lock time. Stable across gravity moves so
    /// a renderer can correlate cells between frames; never used by the rules.
    pub id: u32,
    /// Transient flag set while the gem flashes in the clearing phase
    pub clearing: bool,
}

impl Gem {
    pub fn new(kind: GemKind, id: u32) -> Self {
        Self {
            kind,
            id,
            clearing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_kinds_exclude_wildcard() {
        assert!(!GemKind::base().iter().any(|k| k.is_wild()));
        assert_eq!(GemKind::base().len(), 4);
    }

    #[test]
    fn test_only_bonus_is_wild() {
        assert!(GemKind::Bonus.is_wild());
        assert!(!GemKind::Energy.is_wild());
        assert!(!GemKind::Quantum.is_wild());
    }
}
