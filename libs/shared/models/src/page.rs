use serde::{Deserialize, Serialize};

/// The gateway's Spring Data page envelope, deserialized as-is. All paging
/// decisions in the portal read these fields rather than recomputing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Wraps an unpaginated result set as a single page, for endpoints that
    /// return a plain array (medication search).
    pub fn single(content: Vec<T>) -> Self {
        let total = content.len();
        Self {
            total_elements: total as u64,
            total_pages: 1,
            size: total.max(1) as u32,
            number: 0,
            first: true,
            last: true,
            content,
        }
    }
}

/// What a list screen asks the gateway for: a zero-based page index and a
/// page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn first(size: u32) -> Self {
        Self { number: 0, size }
    }

    /// The `page=..&size=..` query pairs every collection endpoint takes.
    pub fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.number.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_the_gateway_envelope() {
        let raw = r#"{
            "content": [1, 2, 3],
            "totalElements": 25,
            "totalPages": 3,
            "size": 10,
            "number": 2,
            "first": false,
            "last": true
        }"#;
        let page: Page<i32> = serde_json::from_str(raw).unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 2);
        assert!(page.last);
    }

    #[test]
    fn single_page_wraps_plain_arrays() {
        let page = Page::single(vec!["a", "b"]);
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 1);
        assert!(page.first && page.last);
    }

    #[test]
    fn page_request_renders_query_pairs() {
        let req = PageRequest { number: 2, size: 25 };
        assert_eq!(
            req.to_query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "25".to_string())
            ]
        );
    }
}
