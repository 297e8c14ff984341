use serde::Serialize;

/// JSON envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn with_message(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: impl Serialize) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(serde_json::to_value(error).unwrap_or(serde_json::Value::Null)),
            message: None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            success: true,
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 25).total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 30).total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn message_envelope_omits_missing_data() {
        let body = serde_json::to_value(ApiResponse::<()>::with_message(None, "User deleted successfully"))
            .unwrap();
        assert_eq!(
            body,
            json!({"success": true, "message": "User deleted successfully"})
        );
    }

    #[test]
    fn error_envelope_carries_error_only() {
        let body = serde_json::to_value(ApiResponse::<()>::error("User not found")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "User not found"}));
    }
}
