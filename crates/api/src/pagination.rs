//! Pagination for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use common::PaginationConfig;

use crate::resources::{
    DocumentTemplateResource, LandlordResource, LeaseResource, PaymentResource, PropertyResource,
    UnitResource, UserResource,
};

/// Pagination query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    pub page: Option<u64>,
    /// Items per page, capped at the configured maximum
    pub per_page: Option<u64>,
}

impl PaginationParams {
    /// Effective `(page, per_page)` under `config`.
    pub fn resolve(&self, config: &PaginationConfig) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(config.default_per_page)
            .clamp(1, config.max_per_page);
        (page, per_page)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedLandlords = Paginated<LandlordResource>,
    PaginatedUsers = Paginated<UserResource>,
    PaginatedProperties = Paginated<PropertyResource>,
    PaginatedUnits = Paginated<UnitResource>,
    PaginatedLeases = Paginated<LeaseResource>,
    PaginatedPayments = Paginated<PaymentResource>,
    PaginatedDocumentTemplates = Paginated<DocumentTemplateResource>,
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Cut one page out of `items`, transforming only the rows on it.
    pub fn paginate<R>(
        items: Vec<R>,
        params: &PaginationParams,
        config: &PaginationConfig,
        transform: impl FnMut(R) -> T,
    ) -> Self {
        let (page, per_page) = params.resolve(config);
        let total = items.len() as u64;
        let offset = (page - 1).saturating_mul(per_page);

        let data = items
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .map(transform)
            .collect();

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_per_page: 2,
            max_per_page: 3,
        }
    }

    #[test]
    fn test_defaults_and_cap() {
        assert_eq!(PaginationParams::default().resolve(&config()), (1, 2));

        let params = PaginationParams {
            page: Some(0),
            per_page: Some(50),
        };
        assert_eq!(params.resolve(&config()), (1, 3));
    }

    #[test]
    fn test_second_page() {
        let params = PaginationParams {
            page: Some(2),
            per_page: None,
        };
        let page = Paginated::paginate(vec![1, 2, 3, 4, 5], &params, &config(), |n| n * 10);

        assert_eq!(page.data, vec![30, 40]);
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let params = PaginationParams {
            page: Some(9),
            per_page: None,
        };
        let page: Paginated<i32> = Paginated::paginate(vec![1], &params, &config(), |n| n);
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total_pages, 1);
    }
}
