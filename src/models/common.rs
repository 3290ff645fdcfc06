use serde::{Deserialize, Serialize};

/// Standard list envelope returned by every `/admin/...` list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_parses_camel_case_envelope() {
        let json = r#"{"items": [1, 2, 3], "total": 40, "page": 2, "perPage": 3}"#;
        let page: Page<i64> = serde_json::from_str(json).expect("envelope");
        assert_eq!(page.len(), 3);
        assert_eq!(page.total, 40);
        assert_eq!(page.per_page, 3);
    }
}
