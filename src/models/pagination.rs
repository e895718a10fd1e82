use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQueryDto {
    pub page: Option<String>,
}

/// One page of an ordered listing. Pages are 1-indexed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: i64, total_pages: i64) -> Self {
        Page {
            items,
            number,
            total_pages,
            has_previous: number > 1,
            has_next: number < total_pages,
        }
    }
}

/// Number of pages for `total` items; an empty listing still has one page.
pub fn total_pages(total: i64) -> i64 {
    ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

/// Resolve the raw `?page=` value to a page that exists. A value that is not
/// a number falls back to the first page; a number out of range falls back to
/// the last page. Requesting a bad page is never an error.
pub fn resolve_page(requested: Option<&str>, total_pages: i64) -> i64 {
    match requested {
        None => 1,
        Some(raw) => match raw.trim().parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n < 1 => total_pages,
            Ok(n) if n > total_pages => total_pages,
            Ok(n) => n,
        },
    }
}

pub fn page_offset(number: i64) -> i64 {
    (number - 1) * PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn missing_or_garbage_page_falls_back_to_first() {
        assert_eq!(resolve_page(None, 5), 1);
        assert_eq!(resolve_page(Some("abc"), 5), 1);
        assert_eq!(resolve_page(Some(""), 5), 1);
    }

    #[test]
    fn out_of_range_page_falls_back_to_last() {
        assert_eq!(resolve_page(Some("99"), 5), 5);
        assert_eq!(resolve_page(Some("0"), 5), 5);
        assert_eq!(resolve_page(Some("-3"), 5), 5);
    }

    #[test]
    fn valid_page_is_kept() {
        assert_eq!(resolve_page(Some("3"), 5), 3);
        assert_eq!(resolve_page(Some(" 2 "), 5), 2);
    }

    #[test]
    fn page_flags() {
        let first: Page<i32> = Page::new(vec![1, 2, 3], 1, 3);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let middle: Page<i32> = Page::new(vec![4], 2, 3);
        assert!(middle.has_previous);
        assert!(middle.has_next);

        let last: Page<i32> = Page::new(vec![5], 3, 3);
        assert!(last.has_previous);
        assert!(!last.has_next);

        let only: Page<i32> = Page::new(vec![], 1, 1);
        assert!(!only.has_previous);
        assert!(!only.has_next);
    }

    #[test]
    fn offsets() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 10);
        assert_eq!(page_offset(4), 30);
    }
}
