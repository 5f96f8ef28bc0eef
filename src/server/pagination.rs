use serde::Deserialize;

use super::deserializers::{deserialize_page, first_page};
use super::error::ApiError;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// The `?page=N` query parameter, 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: first_page() }
    }
}

impl PageQuery {
    /// The requested page of `items`. An empty page is not found.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> Result<&'a [T], ApiError> {
        let current = paginate(items, self.page);
        if current.is_empty() {
            return Err(ApiError::NotFound);
        }
        Ok(current)
    }
}

/// Items `[(page - 1) * 10, page * 10)`; empty for pages below 1 or past the end.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    let Some(index) = page.checked_sub(1).and_then(|i| usize::try_from(i).ok()) else {
        return &[];
    };
    let Some(start) = index.checked_mul(QUESTIONS_PER_PAGE) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = (start + QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
