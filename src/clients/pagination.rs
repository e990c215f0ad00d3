use crate::error::{FilipError, Result};

/// Largest page the Context Broker hands out in one response.
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

/// Splits a list request into `(offset, limit)` windows.
///
/// Without a limit and without a known total the iterator does not end;
/// the caller stops at the first short page. Once the broker reports
/// `Fiware-Total-Count`, pass it to [`Pagination::set_total`].
#[derive(Debug, Clone)]
pub struct Pagination {
    page_size: usize,
    limit: Option<usize>,
    total: Option<usize>,
    start: usize,
    fetched: usize,
}

impl Pagination {
    pub fn new(limit: Option<usize>, page_size: usize) -> Result<Self> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(FilipError::Validation(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        Ok(Pagination {
            page_size,
            limit,
            total: None,
            start: 0,
            fetched: 0,
        })
    }

    pub fn starting_at(mut self, offset: usize) -> Self {
        self.start = offset;
        self
    }

    pub fn bounded(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = Some(total);
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }
}

impl Iterator for Pagination {
    type Item = Page;

    fn next(&mut self) -> Option<Page> {
        let offset = self.start.checked_add(self.fetched)?;
        // a window never reaches past the largest addressable offset
        let mut size = self.page_size.min(usize::MAX - offset);
        if let Some(limit) = self.limit {
            size = size.min(limit.saturating_sub(self.fetched));
        }
        if let Some(total) = self.total {
            size = size.min(total.saturating_sub(offset));
        }
        if size == 0 {
            return None;
        }
        self.fetched += size;
        Some(Page { offset, limit: size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_splits_into_pages() {
        let pages: Vec<Page> = Pagination::new(Some(2500), MAX_PAGE_SIZE).unwrap().collect();
        assert_eq!(
            pages,
            vec![
                Page { offset: 0, limit: 1000 },
                Page { offset: 1000, limit: 1000 },
                Page { offset: 2000, limit: 500 },
            ]
        );
    }

    #[test]
    fn total_caps_pages() {
        let pages: Vec<Page> = Pagination::new(None, 100).unwrap().bounded(250).collect();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2], Page { offset: 200, limit: 50 });

        let pages: Vec<Page> = Pagination::new(Some(1000), 100)
            .unwrap()
            .starting_at(40)
            .bounded(100)
            .collect();
        assert_eq!(pages, vec![Page { offset: 40, limit: 60 }]);
    }

    #[test]
    fn total_learned_after_first_page() {
        let mut pagination = Pagination::new(None, 10).unwrap();
        assert_eq!(pagination.next(), Some(Page { offset: 0, limit: 10 }));
        pagination.set_total(15);
        assert_eq!(pagination.next(), Some(Page { offset: 10, limit: 5 }));
        assert_eq!(pagination.next(), None);
        assert_eq!(pagination.fetched(), 15);
    }

    #[test]
    fn unbounded_keeps_going() {
        let pages: Vec<Page> = Pagination::new(None, 5).unwrap().take(4).collect();
        assert_eq!(pages[3], Page { offset: 15, limit: 5 });
    }

    #[test]
    fn offset_near_usize_max_ends() {
        let mut pagination = Pagination::new(None, 10).unwrap().starting_at(usize::MAX);
        assert_eq!(pagination.next(), None);
        assert_eq!(pagination.next(), None);

        let pages: Vec<Page> = Pagination::new(None, 10)
            .unwrap()
            .starting_at(usize::MAX - 15)
            .collect();
        assert_eq!(
            pages,
            vec![
                Page { offset: usize::MAX - 15, limit: 10 },
                Page { offset: usize::MAX - 5, limit: 5 },
            ]
        );
    }

    #[test]
    fn page_size_limits() {
        assert!(Pagination::new(None, 0).is_err());
        assert!(Pagination::new(None, MAX_PAGE_SIZE + 1).is_err());
        assert_eq!(Pagination::new(Some(0), 10).unwrap().next(), None);
    }
}
