use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub pair_count: usize,
    pub grid_columns: usize,
    pub multiplier: f64,
}

impl DifficultyConfig {
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }

    pub fn grid_rows(&self) -> usize {
        self.card_count() / self.grid_columns
    }
}

const EASY: DifficultyConfig = DifficultyConfig {
    pair_count: 6,
    grid_columns: 4,
    multiplier: 1.0,
};

const NORMAL: DifficultyConfig = DifficultyConfig {
    pair_count: 10,
    grid_columns: 5,
    multiplier: 1.5,
};

const HARD: DifficultyConfig = DifficultyConfig {
    pair_count: 15,
    grid_columns: 6,
    multiplier: 2.0,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
    }

    pub fn config(&self) -> &'static DifficultyConfig {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.config().pair_count
    }

    pub fn card_count(&self) -> usize {
        self.config().card_count()
    }

    pub fn grid_columns(&self) -> usize {
        self.config().grid_columns
    }

    pub fn multiplier(&self) -> f64 {
        self.config().multiplier
    }

    /// Lowercase name used on the scoreboard wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_count_fills_grid() {
        for difficulty in Difficulty::all() {
            let config = difficulty.config();
            assert_eq!(config.card_count() % config.grid_columns, 0);
            assert_eq!(config.grid_rows() * config.grid_columns, config.card_count());
        }
    }

    #[test]
    fn test_layouts() {
        assert_eq!(Difficulty::Easy.card_count(), 12);
        assert_eq!(Difficulty::Easy.config().grid_rows(), 3);
        assert_eq!(Difficulty::Normal.card_count(), 20);
        assert_eq!(Difficulty::Normal.config().grid_rows(), 4);
        assert_eq!(Difficulty::Hard.card_count(), 30);
        assert_eq!(Difficulty::Hard.config().grid_rows(), 5);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }
}
