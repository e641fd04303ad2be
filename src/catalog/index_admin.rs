use bson::{Document, doc};
use mongodb::{Collection, Database, IndexModel};

use crate::errors::CatalogError;

use super::types::Book;

/// Sample filters used by the explain diagnostics; they match the indexed
/// fields so the plans show whether the indexes are picked up.
pub const SAMPLE_TITLE: &str = "Some Book Title";
pub const SAMPLE_AUTHOR: &str = "George Orwell";
pub const SAMPLE_YEAR: i32 = 1949;

#[must_use]
pub fn title_index_keys() -> Document {
    doc! { "title": 1 }
}

#[must_use]
pub fn author_year_index_keys() -> Document {
    doc! { "author": 1, "published_year": 1 }
}

#[must_use]
pub fn explain_command(collection: &str, filter: Document) -> Document {
    doc! {
        "explain": { "find": collection, "filter": filter },
        "verbosity": "executionStats",
    }
}

/// Ensures the single-field index on `title` exists. Creating an index that
/// already exists is a no-op on the server, so this is idempotent.
///
/// # Errors
/// Returns an error if the index build fails.
pub async fn create_title_index(books: &Collection<Book>) -> Result<String, CatalogError> {
    let model = IndexModel::builder().keys(title_index_keys()).build();
    let created = books.create_index(model).await?;
    log::info!("ensured title index: {}", created.index_name);
    Ok(created.index_name)
}

/// Ensures the compound index on (`author`, `published_year`) exists.
/// Idempotent, same as [`create_title_index`].
///
/// # Errors
/// Returns an error if the index build fails.
pub async fn create_author_year_index(books: &Collection<Book>) -> Result<String, CatalogError> {
    let model = IndexModel::builder().keys(author_year_index_keys()).build();
    let created = books.create_index(model).await?;
    log::info!("ensured author+published_year index: {}", created.index_name);
    Ok(created.index_name)
}

/// Execution-plan diagnostic for the title sample query.
///
/// # Errors
/// Returns an error if the explain command fails.
pub async fn explain_title_query(
    db: &Database,
    collection: &str,
) -> Result<Document, CatalogError> {
    let cmd = explain_command(collection, doc! { "title": SAMPLE_TITLE });
    let plan = db.run_command(cmd).await?;
    log::info!("explained title query on {collection}");
    Ok(plan)
}

/// Execution-plan diagnostic for the author + publication-year sample query,
/// the shape the compound index serves.
///
/// # Errors
/// Returns an error if the explain command fails.
pub async fn explain_author_year_query(
    db: &Database,
    collection: &str,
) -> Result<Document, CatalogError> {
    let cmd = explain_command(
        collection,
        doc! { "author": SAMPLE_AUTHOR, "published_year": SAMPLE_YEAR },
    );
    let plan = db.run_command(cmd).await?;
    log::info!("explained author+year query on {collection}");
    Ok(plan)
}
