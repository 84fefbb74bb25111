use itertools::Itertools;

use crate::helpers::MaskName;
use crate::model::ScoreRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn symbol(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankLabel {
    Medal(Medal),
    Number(usize),
}

impl std::fmt::Display for RankLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankLabel::Medal(Medal::Gold) => f.write_str("1st"),
            RankLabel::Medal(Medal::Silver) => f.write_str("2nd"),
            RankLabel::Medal(Medal::Bronze) => f.write_str("3rd"),
            RankLabel::Number(position) => write!(f, "{}", position),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// 1-based.
    pub position: usize,
    pub label: RankLabel,
    pub record: ScoreRecord,
}

impl RankedEntry {
    pub fn is_podium(&self) -> bool {
        matches!(self.label, RankLabel::Medal(_))
    }

    pub fn masked_player_name(&self) -> String {
        self.record.player_name.masked()
    }
}

fn label_for(position: usize) -> RankLabel {
    match position {
        1 => RankLabel::Medal(Medal::Gold),
        2 => RankLabel::Medal(Medal::Silver),
        3 => RankLabel::Medal(Medal::Bronze),
        n => RankLabel::Number(n),
    }
}

/// Highest score first; equal scores go to the faster time; anything still
/// tied keeps its input order.
pub fn rank(records: &[ScoreRecord]) -> Vec<RankedEntry> {
    records
        .iter()
        .sorted_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.time_taken_seconds.cmp(&b.time_taken_seconds))
        })
        .enumerate()
        .map(|(offset, record)| RankedEntry {
            position: offset + 1,
            label: label_for(offset + 1),
            record: record.clone(),
        })
        .collect()
}

pub fn records_of(entries: &[RankedEntry]) -> Vec<ScoreRecord> {
    entries.iter().map(|entry| entry.record.clone()).collect()
}
