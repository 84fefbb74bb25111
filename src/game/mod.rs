pub mod asset_resolver;
pub mod countdown;
pub mod deck_builder;
pub mod game_engine;
pub mod leaderboard;
pub mod scheduler;
pub mod scoreboard;
pub mod scorer;
pub mod session;
pub mod settings;

pub use asset_resolver::{AssetError, AssetResolver, DirectoryAssetResolver, ResolvedAsset};
pub use deck_builder::DeckError;
pub use game_engine::{GameEngine, GameError};
pub use leaderboard::{rank, RankLabel, RankedEntry};
pub use scoreboard::{InMemoryScoreboard, ScoreboardApi, ScoreboardError};
pub use session::{FlipRejection, Session};
pub use settings::Settings;
