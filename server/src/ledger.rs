use scored_common::{ScoreEntry, MAX_TOP_SCORES};

use crate::database::{Database, ScoreRecord};
use crate::errors::ApiError;

/// Appends a score. The user id is not looked up first; the foreign key on
/// `score.user_id` decides, and its violation comes back as a validation
/// error.
pub async fn add_score(db: &Database, user_id: i64, score: i64) -> Result<(), ApiError> {
    match db.insert_score(user_id, score).await {
        Ok(score_id) => {
            tracing::info!(user_id, score, score_id, "LEDGER: score recorded");
            Ok(())
        }
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            tracing::info!(user_id, "LEDGER: score for unknown user");
            Err(ApiError::Validation("unknown user".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Highest scores first, at most `limit` of them (clamped to 1..=100).
pub async fn top_scores(db: &Database, limit: i64) -> Result<Vec<ScoreEntry>, ApiError> {
    let limit = limit.clamp(1, MAX_TOP_SCORES);
    let records = db.top_scores(limit).await?;
    Ok(records.into_iter().map(ScoreRecord::into_entry).collect())
}

impl ScoreRecord {
    fn into_entry(self) -> ScoreEntry {
        ScoreEntry {
            user_id: self.user_id,
            username: self.username,
            score: self.score,
        }
    }
}
