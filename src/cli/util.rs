use crate::catalog::SortOrder;
use crate::errors::CatalogError;

/// Parses a sort order argument. Only an exact (case-insensitive) "asc" or
/// "desc" is accepted; anything else is rejected rather than silently
/// treated as descending.
///
/// # Errors
/// Returns [`CatalogError::InvalidSortOrder`] for any other input.
pub fn parse_order(s: &str) -> Result<SortOrder, CatalogError> {
    match s.to_ascii_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(CatalogError::InvalidSortOrder(other.to_string())),
    }
}
