use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// A catalog entry. Documents are created and destroyed outside this tool;
/// only `price` is ever mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
}

/// Projected view of a book: title, author and price only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Engine-native sort direction: 1 ascending, -1 descending.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// Validated pagination options. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_PAGE_SIZE }
    }
}

impl Page {
    /// Builds a `Page` from raw arguments, clamping `page < 1` and
    /// `limit <= 0` to the defaults so a negative offset or limit never
    /// reaches the engine.
    #[must_use]
    pub fn clamped(page: i64, limit: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { u32::try_from(page).unwrap_or(u32::MAX) };
        let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
        Self { page, limit }
    }

    /// Number of documents to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page).saturating_sub(1).saturating_mul(self.limit as u64)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: u64,
}

/// One row of the average-price-by-genre pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreAverage {
    #[serde(rename = "_id")]
    pub genre: String,
    #[serde(rename = "averagePrice")]
    pub average_price: f64,
}

/// The single row of the author-with-most-books pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    #[serde(rename = "_id")]
    pub author: String,
    #[serde(rename = "bookCount")]
    pub book_count: i64,
}

/// One row of the publication-decade pipeline. `decade` is the year prefix,
/// e.g. 199 for the 1990s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecadeCount {
    #[serde(rename = "_id")]
    pub decade: i32,
    #[serde(rename = "bookCount")]
    pub book_count: i64,
}
