use serde::Serialize;

use crate::Bookstore;
use crate::catalog::{DeleteReport, UpdateReport};
use crate::errors::CatalogError;

use super::command::Command;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
    Json,
}

/// Runs a command with [`OutputMode::Human`] output.
///
/// # Errors
/// Propagates any failure from the underlying catalog operation.
pub async fn run(store: &Bookstore, cmd: Command) -> Result<(), CatalogError> {
    run_with_format(store, cmd, OutputMode::Human).await
}

/// Dispatches one command against the store and prints the result.
///
/// # Errors
/// Propagates any failure from the underlying catalog operation; nothing is
/// swallowed here, the caller decides how to surface it.
pub async fn run_with_format(
    store: &Bookstore,
    cmd: Command,
    mode: OutputMode,
) -> Result<(), CatalogError> {
    match cmd {
        Command::Get => print_records(&store.all_books().await?, mode),
        Command::Author { author } => print_records(&store.books_by_author(&author).await?, mode),
        Command::Genre { genre } => print_records(&store.books_by_genre(&genre).await?, mode),
        Command::Year { year } => print_records(&store.published_after(year).await?, mode),
        Command::InStock { year } => {
            print_records(&store.in_stock_published_after(year).await?, mode)
        }
        Command::Projection => print_records(&store.book_summaries().await?, mode),
        Command::Sort { order } => print_records(&store.books_sorted_by_price(order).await?, mode),
        Command::Paginate { page } => print_records(&store.books_page(page).await?, mode),
        Command::Update { id, new_price } => {
            let r = store.update_price(&id, new_price).await?;
            print_update_ack(&r, mode)
        }
        Command::Delete { id } => {
            let r = store.delete_by_id(&id).await?;
            print_delete_ack(&r, mode)
        }
        Command::AveragePrice => print_records(&store.average_price_by_genre().await?, mode),
        Command::AuthorMostBooks => {
            let top = store.author_with_most_books().await?;
            match mode {
                OutputMode::Json => println!("{}", serde_json::to_string_pretty(&top)?),
                _ => {
                    if let Some(row) = top {
                        println!("{}", serde_json::to_string(&row)?);
                    }
                }
            }
            Ok(())
        }
        Command::Decade => print_records(&store.books_by_decade().await?, mode),
        Command::CreateIndexTitle => {
            let name = store.create_title_index().await?;
            print_index_ack(&name, mode)
        }
        Command::CreateCompoundIndex => {
            let name = store.create_author_year_index().await?;
            print_index_ack(&name, mode)
        }
        Command::ExplainPerformance => {
            let title_plan = store.explain_title_query().await?;
            let author_year_plan = store.explain_author_year_query().await?;
            match mode {
                OutputMode::Json => {
                    let report = serde_json::json!({
                        "title_query": title_plan,
                        "author_year_query": author_year_plan,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                _ => {
                    println!("# find by title");
                    println!("{}", serde_json::to_string_pretty(&title_plan)?);
                    println!("# find by author and published_year");
                    println!("{}", serde_json::to_string_pretty(&author_year_plan)?);
                }
            }
            Ok(())
        }
    }
}

/// Record lists print as NDJSON (one object per line); Json mode prints one
/// pretty array instead.
fn print_records<T: Serialize>(records: &[T], mode: OutputMode) -> Result<(), CatalogError> {
    match mode {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(records)?),
        _ => {
            for record in records {
                println!("{}", serde_json::to_string(record)?);
            }
        }
    }
    Ok(())
}

fn print_update_ack(r: &UpdateReport, mode: OutputMode) -> Result<(), CatalogError> {
    match mode {
        OutputMode::Json => {
            let json = serde_json::json!({"matched": r.matched, "modified": r.modified});
            println!("{json}");
        }
        _ => println!("{{\"matched\":{},\"modified\":{}}}", r.matched, r.modified),
    }
    Ok(())
}

fn print_delete_ack(r: &DeleteReport, mode: OutputMode) -> Result<(), CatalogError> {
    match mode {
        OutputMode::Json => {
            let json = serde_json::json!({"deleted": r.deleted});
            println!("{json}");
        }
        _ => println!("{{\"deleted\":{}}}", r.deleted),
    }
    Ok(())
}

fn print_index_ack(name: &str, mode: OutputMode) -> Result<(), CatalogError> {
    match mode {
        OutputMode::Json => {
            let json = serde_json::json!({"action": "index_created", "name": name});
            println!("{json}");
        }
        _ => println!("index created: {name}"),
    }
    Ok(())
}
