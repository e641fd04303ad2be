use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("BSON decode error: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid book id: {0}")]
    InvalidBookId(#[from] bson::oid::Error),

    #[error("Invalid sort order: {0:?} (expected \"asc\" or \"desc\")")]
    InvalidSortOrder(String),

    #[error("Config error: {0}")]
    Config(String),
}
