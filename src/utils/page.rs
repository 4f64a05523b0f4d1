/// Client-side pagination over an already fetched collection
pub struct Page<T> {
    items: Vec<T>,
    per_page: usize,
    current_page: usize,
}

impl<T> Page<T> {
    /// `per_page` of zero is treated as one
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Page {
            items,
            per_page: per_page.max(1),
            current_page: 0,
        }
    }

    /// Jump to a 1-based page number
    pub fn go_to(&mut self, page: usize) -> Result<(), String> {
        if page == 0 || page > self.total_pages() {
            return Err(format!(
                "Invalid page number. There are {} page(s)",
                self.total_pages()
            ));
        }
        self.current_page = page - 1;
        Ok(())
    }

    /// Items on the current page
    pub fn current(&self) -> &[T] {
        let start = self.current_page * self.per_page;
        let end = (start + self.per_page).min(self.items.len());
        &self.items[start.min(end)..end]
    }

    /// Get total number of pages, at least one even when empty
    pub fn total_pages(&self) -> usize {
        ((self.items.len() + self.per_page - 1) / self.per_page).max(1)
    }

    /// 1-based page number
    pub fn page_number(&self) -> usize {
        self.current_page + 1
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn is_last(&self) -> bool {
        self.current_page + 1 >= self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_pages() {
        let mut page = Page::new((1..=25).collect::<Vec<_>>(), 10);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.current(), &(1..=10).collect::<Vec<_>>()[..]);

        assert!(!page.is_last());

        page.go_to(3).unwrap();
        assert_eq!(page.current(), &[21, 22, 23, 24, 25]);
        assert!(page.is_last());

        page.go_to(2).unwrap();
        assert_eq!(page.page_number(), 2);
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut page = Page::new(vec!['a', 'b', 'c'], 2);
        assert!(page.go_to(0).is_err());
        assert!(page.go_to(3).is_err());
        page.go_to(2).unwrap();
        assert_eq!(page.current(), &['c']);
    }

    #[test]
    fn test_empty_collection_has_one_empty_page() {
        let page: Page<u8> = Page::new(Vec::new(), 10);
        assert_eq!(page.total_pages(), 1);
        assert!(page.current().is_empty());
        assert_eq!(page.page_number(), 1);
        assert!(page.is_last());
    }
}
