//! Garbage module - attack labels and the pending garbage queue
//!
//! Outgoing attacks are tagged with an [`AttackLabel`] and a blank column.
//! Incoming attacks wait in a [`GarbageQueue`] until the next spawn, then turn
//! into garbage rows pushed up from the bottom of the board.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::BOARD_WIDTH;

/// Named attack, serialized as its wire tag (`triple`, `tspind`, `combo4`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackLabel {
    Triple,
    Tetris,
    TSpinSingle,
    TSpinDouble,
    TSpinTriple,
    /// Combo chain of this length (3 or more)
    Combo(u32),
}

impl AttackLabel {
    /// Parse a wire tag; unknown tags yield `None`
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "triple" => Some(AttackLabel::Triple),
            "tetris" => Some(AttackLabel::Tetris),
            "tspins" => Some(AttackLabel::TSpinSingle),
            "tspind" => Some(AttackLabel::TSpinDouble),
            "tspint" => Some(AttackLabel::TSpinTriple),
            _ => tag
                .strip_prefix("combo")
                .and_then(|n| n.parse().ok())
                .map(AttackLabel::Combo),
        }
    }

    /// Garbage rows this attack inserts on the receiving board
    pub fn garbage_rows(self) -> usize {
        match self {
            AttackLabel::Triple | AttackLabel::TSpinSingle => 2,
            AttackLabel::Tetris | AttackLabel::TSpinDouble => 3,
            AttackLabel::TSpinTriple => 4,
            AttackLabel::Combo(3..=6) => 2,
            AttackLabel::Combo(7..=15) => 3,
            AttackLabel::Combo(_) => 0,
        }
    }
}

impl fmt::Display for AttackLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackLabel::Triple => f.write_str("triple"),
            AttackLabel::Tetris => f.write_str("tetris"),
            AttackLabel::TSpinSingle => f.write_str("tspins"),
            AttackLabel::TSpinDouble => f.write_str("tspind"),
            AttackLabel::TSpinTriple => f.write_str("tspint"),
            AttackLabel::Combo(n) => write!(f, "combo{}", n),
        }
    }
}

impl Serialize for AttackLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AttackLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        AttackLabel::parse(&tag)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown attack tag: {}", tag)))
    }
}

/// An attack and the column its garbage rows leave open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub label: AttackLabel,
    pub blank_column: u8,
}

impl Attack {
    pub fn new(label: AttackLabel, blank_column: u8) -> Self {
        Self {
            label,
            blank_column: blank_column.min(BOARD_WIDTH - 1),
        }
    }

    pub fn garbage_rows(&self) -> usize {
        self.label.garbage_rows()
    }
}

/// Attacks received but not yet applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GarbageQueue {
    pending: VecDeque<Attack>,
}

impl GarbageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attack: Attack) {
        self.pending.push_back(attack);
    }

    /// Rows that would be inserted if everything pending were applied now
    pub fn total_pending(&self) -> usize {
        self.pending.iter().map(Attack::garbage_rows).sum()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending attack, oldest first
    pub fn drain_all(&mut self) -> Vec<Attack> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_rows() {
        assert_eq!(AttackLabel::Triple.garbage_rows(), 2);
        assert_eq!(AttackLabel::TSpinSingle.garbage_rows(), 2);
        assert_eq!(AttackLabel::Tetris.garbage_rows(), 3);
        assert_eq!(AttackLabel::TSpinDouble.garbage_rows(), 3);
        assert_eq!(AttackLabel::TSpinTriple.garbage_rows(), 4);
        assert_eq!(AttackLabel::Combo(3).garbage_rows(), 2);
        assert_eq!(AttackLabel::Combo(6).garbage_rows(), 2);
        assert_eq!(AttackLabel::Combo(7).garbage_rows(), 3);
        assert_eq!(AttackLabel::Combo(15).garbage_rows(), 3);
        assert_eq!(AttackLabel::Combo(16).garbage_rows(), 0);
        assert_eq!(AttackLabel::Combo(2).garbage_rows(), 0);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(AttackLabel::parse("tspind"), Some(AttackLabel::TSpinDouble));
        assert_eq!(AttackLabel::parse("combo12"), Some(AttackLabel::Combo(12)));
        assert_eq!(AttackLabel::parse("combo"), None);
        assert_eq!(AttackLabel::parse("btbtetris"), None);
        assert_eq!(AttackLabel::Combo(4).to_string(), "combo4");
    }

    #[test]
    fn test_attack_serializes_tag_as_string() {
        let attack = Attack::new(AttackLabel::Combo(5), 7);
        let json = serde_json::to_string(&attack).unwrap();
        assert_eq!(json, r#"{"label":"combo5","blank_column":7}"#);
        let back: Attack = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attack);
        assert!(serde_json::from_str::<Attack>(r#"{"label":"oops","blank_column":1}"#).is_err());
    }

    #[test]
    fn test_queue_drains_in_arrival_order() {
        let mut queue = GarbageQueue::new();
        queue.push(Attack::new(AttackLabel::Triple, 1));
        queue.push(Attack::new(AttackLabel::TSpinTriple, 2));
        assert_eq!(queue.total_pending(), 6);
        let drained = queue.drain_all();
        assert_eq!(drained[0].label, AttackLabel::Triple);
        assert_eq!(drained[1].blank_column, 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_blank_column_clamped() {
        assert_eq!(Attack::new(AttackLabel::Tetris, 42).blank_column, 9);
    }
}
