use bson::{Document, doc};
use futures::stream::TryStreamExt;
use mongodb::Collection;

use crate::errors::CatalogError;

use super::types::{
    AuthorCount, Book, BookSummary, DecadeCount, DeleteReport, GenreAverage, Page, SortOrder,
    UpdateReport,
};

// Filter/pipeline construction is split out from the driver calls so the
// query contract stays checkable without a live server.

#[must_use]
pub fn author_filter(author: &str) -> Document {
    doc! { "author": author }
}

#[must_use]
pub fn genre_filter(genre: &str) -> Document {
    doc! { "genre": genre }
}

/// Strictly-greater filter: a book published exactly in `year` is excluded.
#[must_use]
pub fn published_after_filter(year: i32) -> Document {
    doc! { "published_year": { "$gt": year } }
}

#[must_use]
pub fn in_stock_after_filter(year: i32) -> Document {
    doc! { "in_stock": true, "published_year": { "$gt": year } }
}

#[must_use]
pub fn summary_projection() -> Document {
    doc! { "title": 1, "author": 1, "price": 1 }
}

#[must_use]
pub fn price_sort(order: SortOrder) -> Document {
    doc! { "price": order.as_i32() }
}

/// # Errors
/// Returns an error if `id` is not a valid ObjectId hex string.
pub fn id_filter(id: &str) -> Result<Document, CatalogError> {
    let oid = bson::oid::ObjectId::parse_str(id)?;
    Ok(doc! { "_id": oid })
}

#[must_use]
pub fn price_update(new_price: f64) -> Document {
    doc! { "$set": { "price": new_price } }
}

#[must_use]
pub fn average_price_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$genre", "averagePrice": { "$avg": "$price" } } },
        doc! { "$sort": { "averagePrice": 1 } },
    ]
}

#[must_use]
pub fn most_books_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$author", "bookCount": { "$sum": 1 } } },
        doc! { "$sort": { "bookCount": -1 } },
        doc! { "$limit": 1 },
    ]
}

/// Groups on the year prefix (`$floor(published_year / 10)`); `$toInt` keeps
/// the group key an integer instead of the double `$floor` produces.
#[must_use]
pub fn decade_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": { "$toInt": { "$floor": { "$divide": ["$published_year", 10] } } },
            "bookCount": { "$sum": 1 },
        } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn all_books(books: &Collection<Book>) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> = books.find(doc! {}).await?.try_collect().await?;
    log::info!("retrieved all books: {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn books_by_author(
    books: &Collection<Book>,
    author: &str,
) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> = books.find(author_filter(author)).await?.try_collect().await?;
    log::info!("retrieved books by author {author:?}: {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn books_by_genre(
    books: &Collection<Book>,
    genre: &str,
) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> = books.find(genre_filter(genre)).await?.try_collect().await?;
    log::info!("retrieved books in genre {genre:?}: {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn published_after(
    books: &Collection<Book>,
    year: i32,
) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> = books.find(published_after_filter(year)).await?.try_collect().await?;
    log::info!("retrieved books published after {year}: {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn in_stock_published_after(
    books: &Collection<Book>,
    year: i32,
) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> = books.find(in_stock_after_filter(year)).await?.try_collect().await?;
    log::info!("retrieved in-stock books published after {year}: {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn book_summaries(books: &Collection<Book>) -> Result<Vec<BookSummary>, CatalogError> {
    let summaries = books.clone_with_type::<BookSummary>();
    let result: Vec<BookSummary> =
        summaries.find(doc! {}).projection(summary_projection()).await?.try_collect().await?;
    log::info!("retrieved book summaries: {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn books_sorted_by_price(
    books: &Collection<Book>,
    order: SortOrder,
) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> =
        books.find(doc! {}).sort(price_sort(order)).await?.try_collect().await?;
    log::info!("retrieved books sorted by price ({order:?}): {}", result.len());
    Ok(result)
}

/// # Errors
/// Returns an error if the query fails or a document cannot be decoded.
pub async fn books_page(books: &Collection<Book>, page: Page) -> Result<Vec<Book>, CatalogError> {
    let result: Vec<Book> =
        books.find(doc! {}).skip(page.offset()).limit(page.limit).await?.try_collect().await?;
    log::info!("retrieved page {} (limit {}): {}", page.page, page.limit, result.len());
    Ok(result)
}

/// Sets a new price on the book with the given id. A missing id is not an
/// error: the report carries zero matched/modified counts.
///
/// # Errors
/// Returns an error if `id` is malformed or the update fails.
pub async fn update_price(
    books: &Collection<Book>,
    id: &str,
    new_price: f64,
) -> Result<UpdateReport, CatalogError> {
    let result = books.update_one(id_filter(id)?, price_update(new_price)).await?;
    log::info!(
        "updated price for {id}: matched={} modified={}",
        result.matched_count,
        result.modified_count
    );
    Ok(UpdateReport { matched: result.matched_count, modified: result.modified_count })
}

/// Deletes the book with the given id. A missing id is not an error: the
/// report carries a zero deleted count.
///
/// # Errors
/// Returns an error if `id` is malformed or the delete fails.
pub async fn delete_by_id(books: &Collection<Book>, id: &str) -> Result<DeleteReport, CatalogError> {
    let result = books.delete_one(id_filter(id)?).await?;
    log::info!("deleted {id}: deleted={}", result.deleted_count);
    Ok(DeleteReport { deleted: result.deleted_count })
}

/// # Errors
/// Returns an error if the pipeline fails or a row cannot be decoded.
pub async fn average_price_by_genre(
    books: &Collection<Book>,
) -> Result<Vec<GenreAverage>, CatalogError> {
    let rows: Vec<Document> =
        books.aggregate(average_price_pipeline()).await?.try_collect().await?;
    let result = rows
        .into_iter()
        .map(|row| Ok(bson::from_document(row)?))
        .collect::<Result<Vec<GenreAverage>, CatalogError>>()?;
    log::info!("computed average price for {} genres", result.len());
    Ok(result)
}

/// Returns `None` when the collection is empty.
///
/// # Errors
/// Returns an error if the pipeline fails or the row cannot be decoded.
pub async fn author_with_most_books(
    books: &Collection<Book>,
) -> Result<Option<AuthorCount>, CatalogError> {
    let rows: Vec<Document> = books.aggregate(most_books_pipeline()).await?.try_collect().await?;
    let result = match rows.into_iter().next() {
        Some(row) => Some(bson::from_document::<AuthorCount>(row)?),
        None => None,
    };
    log::info!("author with most books: {:?}", result.as_ref().map(|r| r.author.as_str()));
    Ok(result)
}

/// # Errors
/// Returns an error if the pipeline fails or a row cannot be decoded.
pub async fn books_by_decade(books: &Collection<Book>) -> Result<Vec<DecadeCount>, CatalogError> {
    let rows: Vec<Document> = books.aggregate(decade_pipeline()).await?.try_collect().await?;
    let result = rows
        .into_iter()
        .map(|row| Ok(bson::from_document(row)?))
        .collect::<Result<Vec<DecadeCount>, CatalogError>>()?;
    log::info!("counted books across {} decades", result.len());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn published_after_is_strictly_greater() {
        let f = published_after_filter(2010);
        let clause = f.get_document("published_year").unwrap();
        assert_eq!(clause.get_i32("$gt").unwrap(), 2010);
        assert!(clause.get("$gte").is_none());
    }

    #[test]
    fn in_stock_filter_has_both_conditions() {
        let f = in_stock_after_filter(2010);
        assert_eq!(f.get_bool("in_stock").unwrap(), true);
        assert_eq!(f.get_document("published_year").unwrap().get_i32("$gt").unwrap(), 2010);
    }

    #[test]
    fn summary_projection_names_three_fields() {
        let p = summary_projection();
        let keys: Vec<&str> = p.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "author", "price"]);
    }

    #[test]
    fn price_sort_direction() {
        assert_eq!(price_sort(SortOrder::Asc).get_i32("price").unwrap(), 1);
        assert_eq!(price_sort(SortOrder::Desc).get_i32("price").unwrap(), -1);
    }

    #[test]
    fn id_filter_rejects_malformed_ids() {
        assert!(id_filter("not-an-oid").is_err());
        assert!(id_filter("").is_err());
    }

    #[test]
    fn id_filter_roundtrips_valid_ids() {
        let oid = bson::oid::ObjectId::new();
        let f = id_filter(&oid.to_hex()).unwrap();
        assert_eq!(f.get_object_id("_id").unwrap(), oid);
    }

    #[test]
    fn price_update_sets_only_price() {
        let u = price_update(17.99);
        let set = u.get_document("$set").unwrap();
        assert_eq!(set.get_f64("price").unwrap(), 17.99);
        assert_eq!(set.len(), 1);
        assert_eq!(u.len(), 1);
    }

    #[test]
    fn average_price_pipeline_groups_then_sorts_ascending() {
        let p = average_price_pipeline();
        assert_eq!(p.len(), 2);
        let group = p[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$genre");
        let avg = group.get_document("averagePrice").unwrap();
        assert_eq!(avg.get_str("$avg").unwrap(), "$price");
        let sort = p[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("averagePrice").unwrap(), 1);
    }

    #[test]
    fn most_books_pipeline_sorts_descending_and_limits_to_one() {
        let p = most_books_pipeline();
        assert_eq!(p.len(), 3);
        let group = p[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$author");
        let sort = p[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("bookCount").unwrap(), -1);
        assert_eq!(p[2].get_i32("$limit").unwrap(), 1);
    }

    #[test]
    fn decade_pipeline_floors_and_sorts_ascending() {
        let p = decade_pipeline();
        assert_eq!(p.len(), 2);
        let group = p[0].get_document("$group").unwrap();
        let key = group.get_document("_id").unwrap();
        let floor = key.get_document("$toInt").unwrap().get_document("$floor").unwrap();
        let divide = floor.get_array("$divide").unwrap();
        assert_eq!(divide[0], Bson::String("$published_year".into()));
        assert_eq!(divide[1], Bson::Int32(10));
        let sort = p[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("_id").unwrap(), 1);
    }
}
