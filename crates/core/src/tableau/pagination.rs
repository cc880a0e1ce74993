//! Exhaustive pagination over Tableau collection endpoints.
//!
//! Every "list all" operation funnels through [`fetch_all`]. Pages are
//! requested strictly in order, one at a time, because each request depends
//! on the size metadata of the previous one.
//!
//! Termination follows the server's bookkeeping rather than ours: the loop
//! sums the *reported* `pageSize` of each page and stops once that sum
//! reaches `totalAvailable`. A server that returns fewer records than it
//! reports before the last page is therefore under-fetched.

use std::future::Future;

use tracing::debug;

use super::models::Pagination;
use crate::errors::TableauError;

/// Page size requested from every collection endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Tableau page numbers are 1-based.
pub const FIRST_PAGE_NUMBER: u32 = 1;

/// Fetch every page from `fetch_page(page_size, page_number)` and concatenate
/// the records.
///
/// The first error from `fetch_page`, or a pagination block whose numbers do
/// not parse, aborts the whole listing; no partial result is returned.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, TableauError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Pagination), TableauError>>,
{
    let mut records = Vec::new();
    let mut page_number = FIRST_PAGE_NUMBER;
    let mut total_returned: u64 = 0;

    loop {
        let (page, pagination) = fetch_page(DEFAULT_PAGE_SIZE, page_number).await?;

        let page_size = pagination.page_size()?;
        let total_available = pagination.total_available()?;
        total_returned += page_size;

        debug!(
            page_number,
            page_size,
            received = page.len(),
            total_returned,
            total_available,
            "fetched page"
        );
        records.extend(page);

        if total_returned >= total_available {
            break;
        }
        // A zero page size would never reach the total.
        if page_size == 0 {
            return Err(TableauError::InvalidPagination {
                field: "pageSize",
                value: pagination.page_size,
            });
        }
        page_number += 1;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn pagination(page_number: u32, page_size: &str, total: &str) -> Pagination {
        Pagination {
            page_number: page_number.to_string(),
            page_size: page_size.into(),
            total_available: total.into(),
        }
    }

    /// Serves `total` numbered records in pages of `DEFAULT_PAGE_SIZE`,
    /// reporting the requested page size on every page like Tableau does.
    fn paged_source(
        total: u32,
        calls: Arc<Mutex<Vec<u32>>>,
    ) -> impl FnMut(u32, u32) -> std::future::Ready<Result<(Vec<u32>, Pagination), TableauError>> {
        move |page_size, page_number| {
            calls.lock().unwrap().push(page_number);
            let start = (page_number - 1) * page_size;
            let end = (start + page_size).min(total);
            let records = (start..end).collect();
            std::future::ready(Ok((
                records,
                pagination(page_number, &page_size.to_string(), &total.to_string()),
            )))
        }
    }

    #[tokio::test]
    async fn test_fetches_every_page_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let records = fetch_all(paged_source(250, calls.clone())).await.unwrap();

        assert_eq!(records.len(), 250);
        assert_eq!(records.first(), Some(&0));
        assert_eq!(records.last(), Some(&249));
        assert_eq!(*calls.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exact_multiple_stops_without_extra_request() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let records = fetch_all(paged_source(200, calls.clone())).await.unwrap();

        assert_eq!(records.len(), 200);
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_collection_makes_one_request() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let records = fetch_all(paged_source(0, calls.clone())).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(*calls.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_short_page_still_advances_by_reported_size() {
        // Known edge case: the server reports pageSize=100 but sends only 10
        // records on page 1. The counter advances by 100, so with
        // totalAvailable=150 we stop after page 2 and return 10 + 50 records.
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let records = fetch_all(move |_size, page_number| {
            seen.lock().unwrap().push(page_number);
            let count = if page_number == 1 { 10 } else { 50 };
            std::future::ready(Ok((vec![page_number; count], pagination(page_number, "100", "150"))))
        })
        .await
        .unwrap();

        assert_eq!(records.len(), 60);
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_first_error_aborts_listing() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let result: Result<Vec<u32>, _> = fetch_all(move |_size, page_number| {
            seen.lock().unwrap().push(page_number);
            std::future::ready(if page_number == 2 {
                Err(TableauError::ApiError {
                    status: 503,
                    url: "users".into(),
                })
            } else {
                Ok((vec![1; 100], pagination(page_number, "100", "300")))
            })
        })
        .await;

        assert!(matches!(result, Err(TableauError::ApiError { status: 503, .. })));
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_malformed_page_size_is_a_decode_error() {
        let result: Result<Vec<u32>, _> = fetch_all(|_size, page_number| {
            std::future::ready(Ok((vec![1], pagination(page_number, "one hundred", "1"))))
        })
        .await;

        assert!(matches!(
            result,
            Err(TableauError::InvalidPagination { field: "pageSize", .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_total_is_a_decode_error() {
        let result: Result<Vec<u32>, _> = fetch_all(|_size, page_number| {
            std::future::ready(Ok((vec![1], pagination(page_number, "100", ""))))
        })
        .await;

        assert!(matches!(
            result,
            Err(TableauError::InvalidPagination { field: "totalAvailable", .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_page_size_does_not_spin() {
        let result: Result<Vec<u32>, _> = fetch_all(|_size, page_number| {
            std::future::ready(Ok((Vec::new(), pagination(page_number, "0", "5"))))
        })
        .await;

        assert!(matches!(result, Err(TableauError::InvalidPagination { .. })));
    }
}
