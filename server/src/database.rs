use sqlx::{SqlitePool, FromRow};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, FromRow)]
pub struct ScoreRecord {
    pub user_id: i64,
    pub username: String,
    pub score: i64,
}

impl Database {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Database { pool }
    }

    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        if let Some(file_path) = database_url.strip_prefix("sqlite://") {
            if !std::path::Path::new(file_path).exists() {
                std::fs::File::create(file_path)
                    .map_err(sqlx::Error::Io)?;
            }
        }

        let pool = SqlitePool::connect(database_url).await?;
        Ok(Database { pool })
    }

    pub async fn initialize(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
    }

    /// Fails with a unique violation when the username is already stored.
    pub async fn insert_user(&self, username: &str, password_hash: &str) -> Result<i64, sqlx::Error> {
        tracing::debug!(username, "DB: inserting user");

        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash FROM users WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fails with a foreign key violation when `user_id` has no user row.
    pub async fn insert_score(&self, user_id: i64, score: i64) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO score (user_id, score) VALUES (?, ?)")
            .bind(user_id)
            .bind(score)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    // Equal scores keep submission order.
    pub async fn top_scores(&self, limit: i64) -> Result<Vec<ScoreRecord>, sqlx::Error> {
        sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT users.id AS user_id, users.username, score.score
            FROM score
            JOIN users ON score.user_id = users.id
            ORDER BY score.score DESC, score.id ASC
            LIMIT ?
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
pub(crate) async fn create_test_db() -> Database {
    // One connection: every in-memory connection is a separate database.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let db = Database::from_pool(pool);
    db.initialize().await.unwrap();
    db
}
