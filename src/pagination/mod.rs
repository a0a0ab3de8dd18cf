use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 1000;

/// `?page=&size=` query; missing values fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip before this page; `None` when the page is too large to address.
    pub fn offset(&self) -> Option<i64> {
        (self.page() - 1).checked_mul(self.size())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
}

impl PaginationLinks {
    /// Links relative to `path`. `next`/`last` appear before the last page, `prev`/`first` after the first.
    pub fn build(path: &str, page: i64, size: i64, total: i64) -> Self {
        let page_count = (total + size - 1) / size;
        let at_page = |p: i64| format!("{}?page={}&size={}", path, p, size);

        let mut links = Self {
            self_link: at_page(page),
            ..Self::default()
        };

        if page < page_count {
            links.next = Some(at_page(page + 1));
            links.last = Some(at_page(page_count));
        }

        if page != 1 {
            links.prev = Some(at_page(page - 1));
            links.first = Some(format!("{}?size={}", path, size));
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.size(), 12);

        let params = PageParams { page: Some(0), size: Some(0) };
        assert_eq!(params.page(), 1);
        assert_eq!(params.size(), 1);
    }

    #[test]
    fn offset_overflow_is_none() {
        assert_eq!(PageParams { page: Some(3), size: Some(12) }.offset(), Some(24));
        assert_eq!(PageParams { page: Some(i64::MAX), size: Some(12) }.offset(), None);
    }

    #[test]
    fn first_page_links_forward_only() {
        let links = PaginationLinks::build("/api/players", 1, 12, 30);

        assert_eq!(links.self_link, "/api/players?page=1&size=12");
        assert_eq!(links.next.as_deref(), Some("/api/players?page=2&size=12"));
        assert_eq!(links.last.as_deref(), Some("/api/players?page=3&size=12"));
        assert!(links.prev.is_none());
        assert!(links.first.is_none());
    }

    #[test]
    fn last_page_links_backward_only() {
        let links = PaginationLinks::build("/api/players", 3, 12, 30);

        assert!(links.next.is_none());
        assert_eq!(links.prev.as_deref(), Some("/api/players?page=2&size=12"));
        assert_eq!(links.first.as_deref(), Some("/api/players?size=12"));
    }

    #[test]
    fn self_link_serializes_as_self() {
        let json = serde_json::to_value(PaginationLinks::build("/p", 1, 5, 0)).unwrap();
        assert_eq!(json["self"], "/p?page=1&size=5");
        assert!(json.get("next").is_none());
    }
}
