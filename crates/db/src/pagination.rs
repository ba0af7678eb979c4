//! Optional limit/offset windows for list queries.

use sea_orm::{QuerySelect, Select, EntityTrait};
use serde::Deserialize;

/// Largest page a client may request.
pub const MAX_LIMIT: u64 = 1000;

/// Largest offset the database driver can bind (`BIGINT`).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A list window. Both bounds are optional; without them the whole scope is
/// returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

impl Page {
    /// A window with both bounds set.
    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// The effective limit after capping.
    #[must_use]
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.map(|l| l.min(MAX_LIMIT))
    }

    /// The effective offset. Past [`MAX_OFFSET`] the window is empty anyway.
    #[must_use]
    pub fn effective_offset(&self) -> Option<u64> {
        self.offset.map(|o| o.min(MAX_OFFSET))
    }

    /// Apply the window to a select.
    #[must_use]
    pub fn apply<E: EntityTrait>(&self, query: Select<E>) -> Select<E> {
        let query = match self.effective_limit() {
            Some(limit) => query.limit(limit),
            None => query,
        };
        match self.effective_offset() {
            Some(offset) => query.offset(offset),
            None => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(Page::new(5000, 0).effective_limit(), Some(MAX_LIMIT));
        assert_eq!(Page::new(10, 0).effective_limit(), Some(10));
        assert_eq!(Page::default().effective_limit(), None);
    }

    #[test]
    fn test_offset_is_clamped_to_bigint() {
        let page = Page {
            limit: None,
            offset: Some(u64::MAX),
        };
        assert_eq!(page.effective_offset(), Some(MAX_OFFSET));
        assert_eq!(Page::new(10, 20).effective_offset(), Some(20));
    }

    #[test]
    fn test_huge_offset_binds_as_bigint() {
        use crate::entities::note;
        use sea_orm::{DatabaseBackend, QueryTrait, Value};

        let page = Page {
            limit: None,
            offset: Some(u64::MAX),
        };
        let stmt = page.apply(note::Entity::find()).build(DatabaseBackend::Postgres);
        let values = stmt.values.map(|v| v.0).unwrap_or_default();

        assert!(values.iter().all(|v| match v {
            Value::BigUnsigned(Some(n)) => i64::try_from(*n).is_ok(),
            _ => true,
        }));
    }
}
