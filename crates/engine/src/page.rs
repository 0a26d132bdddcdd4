/// One page of a listing together with the numbers needed to build
/// pagination metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageList<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl<T> PageList<T> {
    pub fn new(items: Vec<T>, total_count: usize, current_page: usize, page_size: usize) -> Self {
        Self {
            items,
            total_count,
            current_page,
            page_size,
        }
    }

    /// Number of pages needed to hold `total_count` items.
    ///
    /// A zero page size yields zero pages.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn map<U, F>(self, f: F) -> PageList<U>
    where
        F: FnMut(T) -> U,
    {
        PageList {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = PageList::new(vec![1, 2], 5, 1, 2);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn last_page_has_no_next() {
        let page = PageList::new(vec![5], 5, 3, 2);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn empty_listing_has_no_pages() {
        let page: PageList<u8> = PageList::new(Vec::new(), 0, 1, 10);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn map_keeps_counts() {
        let page = PageList::new(vec![1, 2], 4, 2, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_count, 4);
        assert_eq!(page.current_page, 2);
    }
}
