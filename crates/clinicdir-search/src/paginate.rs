use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// One page of results plus the numbers needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// `ceil(count / size)`; zero items means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Returns page `page` (1-based) of `items`.
///
/// Pages past the end are empty rather than an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Page<T>, SearchError> {
    if page_size == 0 {
        return Err(SearchError::InvalidPageSize);
    }
    if page == 0 {
        return Err(SearchError::InvalidPage);
    }

    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total: items.len(),
        total_pages: total_pages(items.len(), page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn pages_concatenate_to_the_sequence() {
        let items: Vec<u32> = (0..23).collect();
        let size = 10;
        let pages = total_pages(items.len(), size);
        let mut rebuilt = Vec::new();
        for p in 1..=pages {
            let page = paginate(&items, p, size).unwrap();
            assert_eq!(page.total, 23);
            assert_eq!(page.total_pages, 3);
            rebuilt.extend(page.items);
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn last_page_is_partial_and_past_end_is_empty() {
        let items: Vec<u32> = (0..23).collect();
        assert_eq!(paginate(&items, 3, 10).unwrap().items, vec![20, 21, 22]);
        assert!(paginate(&items, 4, 10).unwrap().items.is_empty());
    }

    #[test]
    fn rejects_zero_page_and_size() {
        let items = [1, 2, 3];
        assert_eq!(paginate(&items, 0, 10), Err(SearchError::InvalidPage));
        assert_eq!(paginate(&items, 1, 0), Err(SearchError::InvalidPageSize));
    }
}
