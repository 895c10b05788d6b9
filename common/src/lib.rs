mod score;

pub mod api;

pub use api::*;
pub use score::ScoreEntry;
