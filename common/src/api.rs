use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_SCORES: i64 = 10;
pub const MAX_TOP_SCORES: i64 = 100;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScoreRequest {
    pub user_id: i64,
    pub score: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScoreResponse {
    pub message: String,
    pub user_id: i64,
    pub score: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
