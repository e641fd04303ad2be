use crate::catalog::{Page, SortOrder};

/// Closed set of catalog operations. The binary's clap surface converts its
/// parsed arguments into one of these variants; the runner dispatches on it.
pub enum Command {
    // Reads
    Get,
    Author {
        author: String,
    },
    Genre {
        genre: String,
    },
    Year {
        year: i32,
    },
    InStock {
        year: i32,
    },
    Projection,
    Sort {
        order: SortOrder,
    },
    Paginate {
        page: Page,
    },
    // Mutations
    Update {
        id: String,
        new_price: f64,
    },
    Delete {
        id: String,
    },
    // Aggregations
    AveragePrice,
    AuthorMostBooks,
    Decade,
    // Index administration & diagnostics
    CreateIndexTitle,
    CreateCompoundIndex,
    ExplainPerformance,
}
