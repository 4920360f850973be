//! Offset pagination (`skip` / `limit` query parameters)
//!
//! ```rust,ignore
//! let page = params.validate()?;
//! let items = Goods::find_all(page.skip, page.limit, pool).await?;
//! ```

use anyhow::{bail, Result};
use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// Raw query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl PaginationParams {
    /// Negative values are rejected; oversized limits are clamped to [`MAX_LIMIT`].
    pub fn validate(&self) -> Result<Page> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        if skip < 0 {
            bail!("skip must be non-negative");
        }
        if limit < 0 {
            bail!("limit must be non-negative");
        }

        Ok(Page {
            skip,
            limit: limit.min(MAX_LIMIT),
        })
    }
}
