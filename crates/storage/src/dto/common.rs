use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub offset: u32,
    pub limit: u32,
    pub total: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(offset: u32, limit: u32, total: i64) -> Self {
        Self {
            offset,
            limit,
            total,
            has_more: i64::from(offset) + i64::from(limit) < total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, offset: u32, limit: u32, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(offset, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more() {
        assert!(PaginationMeta::new(0, 20, 21).has_more);
        assert!(!PaginationMeta::new(0, 20, 20).has_more);
        assert!(!PaginationMeta::new(40, 20, 45).has_more);
    }

    #[test]
    fn test_limit_bounds() {
        let params = PaginationParams {
            limit: 0,
            offset: 0,
        };
        assert!(params.validate().is_err());

        let params = PaginationParams {
            limit: MAX_LIMIT + 1,
            offset: 0,
        };
        assert!(params.validate().is_err());

        assert!(PaginationParams::default().validate().is_ok());
    }
}
