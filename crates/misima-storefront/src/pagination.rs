//! Cursor pagination for collection product connections.
//!
//! Moving forward sends `first` with `endCursor` (GraphQL `after`);
//! moving backward sends `last` with `startCursor` (GraphQL `before`).
//! Without a cursor the request is the first page.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::WirePageInfo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    #[default]
    Next,
    Previous,
}

impl PageDirection {
    /// `"previous"`/`"prev"` go backward; anything else goes forward.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("previous" | "prev") => Self::Previous,
            _ => Self::Next,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: u32,
    pub cursor: Option<String>,
    pub direction: PageDirection,
}

impl PageRequest {
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size,
            cursor: None,
            direction: PageDirection::Next,
        }
    }

    /// GraphQL variables for `COLLECTION_QUERY`, minus `handle`.
    #[must_use]
    pub fn variables(&self) -> Value {
        let cursor = self.cursor.as_deref().filter(|c| !c.is_empty());
        match (self.direction, cursor) {
            (PageDirection::Previous, Some(cursor)) => json!({
                "last": self.page_size,
                "startCursor": cursor,
            }),
            (PageDirection::Next, Some(cursor)) => json!({
                "first": self.page_size,
                "endCursor": cursor,
            }),
            (_, None) => json!({ "first": self.page_size }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// The request that loads the following page, if there is one.
    #[must_use]
    pub fn next(&self, page_size: u32) -> Option<PageRequest> {
        if !self.has_next_page {
            return None;
        }
        Some(PageRequest {
            page_size,
            cursor: Some(self.end_cursor.clone()?),
            direction: PageDirection::Next,
        })
    }
}

impl From<WirePageInfo> for PageInfo {
    fn from(p: WirePageInfo) -> Self {
        Self {
            has_previous_page: p.has_previous_page,
            has_next_page: p.has_next_page,
            start_cursor: p.start_cursor,
            end_cursor: p.end_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_cursor() {
        assert_eq!(PageRequest::first(100).variables(), json!({"first": 100}));
    }

    #[test]
    fn next_page_uses_end_cursor() {
        let req = PageRequest {
            page_size: 100,
            cursor: Some("abc".into()),
            direction: PageDirection::Next,
        };
        assert_eq!(req.variables(), json!({"first": 100, "endCursor": "abc"}));
    }

    #[test]
    fn previous_page_uses_last_and_start_cursor() {
        let req = PageRequest {
            page_size: 100,
            cursor: Some("abc".into()),
            direction: PageDirection::Previous,
        };
        assert_eq!(req.variables(), json!({"last": 100, "startCursor": "abc"}));
    }

    #[test]
    fn empty_cursor_is_first_page() {
        let req = PageRequest {
            page_size: 10,
            cursor: Some(String::new()),
            direction: PageDirection::Previous,
        };
        assert_eq!(req.variables(), json!({"first": 10}));
    }

    #[test]
    fn direction_parse_defaults_to_next() {
        assert_eq!(PageDirection::parse(None), PageDirection::Next);
        assert_eq!(PageDirection::parse(Some("PREV")), PageDirection::Previous);
        assert_eq!(PageDirection::parse(Some("sideways")), PageDirection::Next);
    }

    #[test]
    fn next_request_requires_has_next_and_cursor() {
        let mut info = PageInfo {
            has_next_page: true,
            end_cursor: Some("z".into()),
            ..PageInfo::default()
        };
        assert_eq!(info.next(5).unwrap().cursor.as_deref(), Some("z"));
        info.end_cursor = None;
        assert!(info.next(5).is_none());
        info.has_next_page = false;
        assert!(info.next(5).is_none());
    }
}
