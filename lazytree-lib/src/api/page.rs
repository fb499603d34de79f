//! Paging parameters for root and children queries

/// A window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Number of rows to skip.
    pub offset: usize,
    /// Maximum number of rows, or `None` for everything.
    pub limit: Option<usize>,
}

impl PageRequest {
    /// Creates a page request.
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// Returns `true` if `fetched` rows fill the requested page.
    pub fn is_full(&self, fetched: usize) -> bool {
        self.limit.is_some_and(|limit| fetched == limit)
    }

    /// Applies the window to an in-memory list.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(items.len()),
            None => items.len(),
        };
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(PageRequest::new(0, Some(2)).slice(&items), &[1, 2]);
        assert_eq!(PageRequest::new(4, Some(2)).slice(&items), &[5]);
        assert_eq!(PageRequest::new(9, Some(2)).slice(&items), &[] as &[i32]);
        assert_eq!(PageRequest::new(1, None).slice(&items), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_is_full() {
        assert!(PageRequest::new(0, Some(2)).is_full(2));
        assert!(!PageRequest::new(0, Some(2)).is_full(1));
        assert!(!PageRequest::new(0, None).is_full(100));
    }
}
