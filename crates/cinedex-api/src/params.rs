//! Query parameters shared by the list and search endpoints.

use cinedex_core::store::Page;
use serde::Deserialize;

use crate::error::ApiError;

/// Largest `limit` a single request may ask for.
pub const MAX_LIMIT: u32 = 100;

/// `?q=...&limit=...&offset=...`. A present `q` turns a listing into a
/// prefix search.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:      Option<String>,
  pub limit:  Option<u32>,
  pub offset: Option<u32>,
}

impl ListParams {
  pub fn page(&self) -> Result<Page, ApiError> {
    let default = Page::default();
    let limit = self.limit.unwrap_or(default.limit);
    if limit == 0 || limit > MAX_LIMIT {
      return Err(ApiError::BadRequest(format!(
        "limit must be between 1 and {MAX_LIMIT}, got {limit}"
      )));
    }
    Ok(Page::new(limit, self.offset.unwrap_or(default.offset)))
  }

  /// The search text, if any. An empty `q` counts as absent.
  pub fn query(&self) -> Option<String> {
    self.q.clone().filter(|q| !q.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_to_first_page_of_ten() {
    assert_eq!(ListParams::default().page().unwrap(), Page::new(10, 0));
  }

  #[test]
  fn rejects_out_of_range_limits() {
    let zero = ListParams { limit: Some(0), ..Default::default() };
    assert!(matches!(zero.page(), Err(ApiError::BadRequest(_))));
    let huge = ListParams { limit: Some(MAX_LIMIT + 1), ..Default::default() };
    assert!(huge.page().is_err());
  }

  #[test]
  fn empty_query_is_a_listing() {
    let p = ListParams { q: Some(String::new()), ..Default::default() };
    assert_eq!(p.query(), None);
  }
}
