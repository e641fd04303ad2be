// Submodules for separation of concerns
mod index_admin;
mod ops;
mod types;

// Public API re-exports
pub use index_admin::{
    SAMPLE_AUTHOR, SAMPLE_TITLE, SAMPLE_YEAR, author_year_index_keys, create_author_year_index,
    create_title_index, explain_author_year_query, explain_command, explain_title_query,
    title_index_keys,
};
pub use ops::{
    all_books, author_filter, author_with_most_books, average_price_by_genre,
    average_price_pipeline, book_summaries, books_by_author, books_by_decade, books_by_genre,
    books_page, books_sorted_by_price, decade_pipeline, delete_by_id, genre_filter, id_filter,
    in_stock_after_filter, in_stock_published_after, most_books_pipeline, price_sort, price_update,
    published_after, published_after_filter, summary_projection, update_price,
};
pub use types::{
    AuthorCount, Book, BookSummary, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DecadeCount, DeleteReport,
    GenreAverage, Page, SortOrder, UpdateReport,
};
