use serde::Serialize;

use crate::pagination::Pagination;

/// `{"success": true, "data": ...}` body used by the reviews and settings endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paged(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pagination_is_omitted_when_absent() {
        let body = serde_json::to_value(Envelope::ok(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn paged_envelope_carries_meta() {
        let meta = Pagination {
            page: 2,
            limit: 20,
            total: 41,
            pages: 3,
        };
        let body = serde_json::to_value(Envelope::paged(Vec::<u8>::new(), meta)).unwrap();
        assert_eq!(body["pagination"]["pages"], 3);
    }
}
