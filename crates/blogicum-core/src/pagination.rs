//! Page-number pagination.

use crate::error::RepoError;

/// Posts per page on the home feed.
pub const FEED_PAGE_SIZE: u64 = 10;
/// Posts per page on a profile.
pub const PROFILE_PAGE_SIZE: u64 = 10;
/// Posts per page on a category page.
pub const CATEGORY_PAGE_SIZE: u64 = 10;

/// A requested page number. Numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(u64),
    Last,
}

impl PageNumber {
    /// Parse the `page` query parameter. A missing parameter is the first page.
    pub fn parse(raw: Option<&str>) -> Result<Self, RepoError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Number(1)),
            Some("last") => Ok(Self::Last),
            Some(s) => s
                .parse::<u64>()
                .map(Self::Number)
                .map_err(|_| RepoError::InvalidPage("page number is not an integer".to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: PageNumber,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: PageNumber, per_page: u64) -> Self {
        Self { number, per_page }
    }

    /// Locate the requested page within `total_items`.
    ///
    /// An empty listing has a single empty page; any other page outside
    /// `1..=total_pages` is rejected.
    pub fn resolve(&self, total_items: u64) -> Result<PageWindow, RepoError> {
        let per_page = self.per_page.max(1);
        let total_pages = total_items.div_ceil(per_page).max(1);

        let number = match self.number {
            PageNumber::Last => total_pages,
            PageNumber::Number(0) => {
                return Err(RepoError::InvalidPage(
                    "page number is less than 1".to_string(),
                ));
            }
            PageNumber::Number(n) if n > total_pages => {
                return Err(RepoError::InvalidPage(
                    "that page contains no results".to_string(),
                ));
            }
            PageNumber::Number(n) => n,
        };

        Ok(PageWindow {
            number,
            per_page,
            total_items,
            total_pages,
        })
    }
}

/// A resolved page: where it starts and how many pages exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_number() {
        assert_eq!(PageNumber::parse(None).unwrap(), PageNumber::Number(1));
        assert_eq!(PageNumber::parse(Some("3")).unwrap(), PageNumber::Number(3));
        assert_eq!(PageNumber::parse(Some("last")).unwrap(), PageNumber::Last);
        assert!(matches!(
            PageNumber::parse(Some("abc")),
            Err(RepoError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let window = PageRequest::new(PageNumber::Number(1), 10).resolve(0).unwrap();
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_out_of_range_pages_are_rejected() {
        let request = |n| PageRequest::new(PageNumber::Number(n), 10);
        assert!(request(0).resolve(25).is_err());
        assert!(request(4).resolve(25).is_err());
        assert!(request(3).resolve(25).is_ok());
    }

    #[test]
    fn test_last_page() {
        let window = PageRequest::new(PageNumber::Last, 10).resolve(25).unwrap();
        assert_eq!(window.number, 3);
        assert_eq!(window.offset(), 20);

        let page = window.into_page(vec![1, 2, 3, 4, 5]);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }
}
