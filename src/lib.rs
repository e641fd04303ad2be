pub mod catalog;
pub mod cli;
pub mod errors;
pub mod logger;

use mongodb::{Client, Collection, Database};

use crate::catalog::{
    AuthorCount, Book, BookSummary, DecadeCount, DeleteReport, GenreAverage, Page, SortOrder,
    UpdateReport,
};
use crate::errors::CatalogError;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "plp_bookstore";
pub const DEFAULT_COLLECTION: &str = "books";

/// Connection target for the catalog. Every field can be overridden via
/// config file, environment, or CLI flag; the defaults point at a local
/// server.
#[derive(Debug, Clone)]
pub struct Settings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// Handle to the catalog collection. Explicitly constructed and explicitly
/// closed; there is no process-wide client singleton.
pub struct Bookstore {
    client: Client,
    db: Database,
    books: Collection<Book>,
}

impl Bookstore {
    /// Connects to the server and resolves the catalog collection handle.
    ///
    /// # Errors
    /// Returns an error if the connection string is invalid or the client
    /// cannot be constructed.
    pub async fn connect(settings: &Settings) -> Result<Self, CatalogError> {
        let client = Client::with_uri_str(&settings.uri).await?;
        let db = client.database(&settings.database);
        let books = db.collection::<Book>(&settings.collection);
        log::info!(
            "connected to {} ({}/{})",
            settings.uri,
            settings.database,
            settings.collection
        );
        Ok(Self { client, db, books })
    }

    /// The typed collection handle the façade operates on.
    pub fn books(&self) -> &Collection<Book> {
        &self.books
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Shuts the client down, releasing its connections.
    pub async fn close(self) {
        self.client.shutdown().await;
    }

    // --- Catalog API (façade over catalog module) ---

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn all_books(&self) -> Result<Vec<Book>, CatalogError> {
        catalog::all_books(&self.books).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn books_by_author(&self, author: &str) -> Result<Vec<Book>, CatalogError> {
        catalog::books_by_author(&self.books, author).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn books_by_genre(&self, genre: &str) -> Result<Vec<Book>, CatalogError> {
        catalog::books_by_genre(&self.books, genre).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn published_after(&self, year: i32) -> Result<Vec<Book>, CatalogError> {
        catalog::published_after(&self.books, year).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn in_stock_published_after(&self, year: i32) -> Result<Vec<Book>, CatalogError> {
        catalog::in_stock_published_after(&self.books, year).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn book_summaries(&self) -> Result<Vec<BookSummary>, CatalogError> {
        catalog::book_summaries(&self.books).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn books_sorted_by_price(&self, order: SortOrder) -> Result<Vec<Book>, CatalogError> {
        catalog::books_sorted_by_price(&self.books, order).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn books_page(&self, page: Page) -> Result<Vec<Book>, CatalogError> {
        catalog::books_page(&self.books, page).await
    }

    /// # Errors
    /// Propagates driver failures and malformed ids.
    pub async fn update_price(&self, id: &str, new_price: f64) -> Result<UpdateReport, CatalogError> {
        catalog::update_price(&self.books, id, new_price).await
    }

    /// # Errors
    /// Propagates driver failures and malformed ids.
    pub async fn delete_by_id(&self, id: &str) -> Result<DeleteReport, CatalogError> {
        catalog::delete_by_id(&self.books, id).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn average_price_by_genre(&self) -> Result<Vec<GenreAverage>, CatalogError> {
        catalog::average_price_by_genre(&self.books).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn author_with_most_books(&self) -> Result<Option<AuthorCount>, CatalogError> {
        catalog::author_with_most_books(&self.books).await
    }

    /// # Errors
    /// Propagates driver and decode failures.
    pub async fn books_by_decade(&self) -> Result<Vec<DecadeCount>, CatalogError> {
        catalog::books_by_decade(&self.books).await
    }

    /// # Errors
    /// Propagates driver failures.
    pub async fn create_title_index(&self) -> Result<String, CatalogError> {
        catalog::create_title_index(&self.books).await
    }

    /// # Errors
    /// Propagates driver failures.
    pub async fn create_author_year_index(&self) -> Result<String, CatalogError> {
        catalog::create_author_year_index(&self.books).await
    }

    /// # Errors
    /// Propagates driver failures.
    pub async fn explain_title_query(&self) -> Result<bson::Document, CatalogError> {
        catalog::explain_title_query(&self.db, self.books.name()).await
    }

    /// # Errors
    /// Propagates driver failures.
    pub async fn explain_author_year_query(&self) -> Result<bson::Document, CatalogError> {
        catalog::explain_author_year_query(&self.db, self.books.name()).await
    }
}
