use serde::{Deserialize, Serialize};

/// One row of the leaderboard: a single submitted score and its owner.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub user_id: i64,
    pub username: String,
    pub score: i64,
}
