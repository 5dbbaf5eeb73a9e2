//! Paginated retrieval of an owner's asset records.

use dioxus_logger::tracing;
use futures::future::join_all;

use crate::{
    error::Error,
    esi::source::{AssetPage, AssetSource},
    model::asset::Asset,
    service::retry::{RetryContext, RetryPolicy},
};

/// Fetches every page of an owner's asset record set in bounded concurrent batches.
pub struct AssetFetcher<S: AssetSource> {
    source: S,
    page_concurrency: usize,
    retry: RetryPolicy,
}

impl<S: AssetSource> AssetFetcher<S> {
    pub fn new(source: S, page_concurrency: usize, retry: RetryPolicy) -> Self {
        Self {
            source,
            page_concurrency: page_concurrency.max(1),
            retry,
        }
    }

    /// Fetch all asset records of `owner_id`.
    ///
    /// Pages are requested in batches of `page_concurrency` and consumed in page order. The
    /// first empty page, "page does not exist" response or page at ESI's reported `X-Pages`
    /// count ends the fetch; results for later pages of the same batch, failures included,
    /// are discarded. A failure on a page before that point fails the whole fetch.
    ///
    /// # Returns
    /// - `Ok(Vec<Asset>)` - Complete record set in page order
    /// - `Err(Error)` - A page failed permanently or exhausted its retries
    pub async fn fetch_all(&self, owner_id: i64) -> Result<Vec<Asset>, Error> {
        let mut assets = Vec::new();
        let mut next_page: u32 = 1;
        let mut last_page: Option<u32> = None;

        loop {
            let mut batch_end = next_page + self.page_concurrency as u32 - 1;
            if let Some(last_page) = last_page {
                batch_end = batch_end.min(last_page);
            }
            if batch_end < next_page {
                break;
            }

            let pages: Vec<u32> = (next_page..=batch_end).collect();
            let results = join_all(pages.iter().map(|&page| self.fetch_page(owner_id, page))).await;

            for (page, result) in pages.into_iter().zip(results) {
                let (page_assets, total_pages) = match result? {
                    AssetPage::PageNotExist => {
                        tracing::debug!(
                            "Asset page {} for owner {} does not exist, fetch complete",
                            page,
                            owner_id
                        );
                        return Ok(assets);
                    }
                    AssetPage::Assets {
                        assets,
                        total_pages,
                    } => (assets, total_pages),
                };

                if page_assets.is_empty() {
                    return Ok(assets);
                }

                assets.extend(page_assets);

                if let Some(total_pages) = total_pages {
                    last_page = Some(total_pages);
                }
                if last_page.is_some_and(|last_page| page >= last_page) {
                    return Ok(assets);
                }
            }

            next_page = batch_end + 1;
        }

        Ok(assets)
    }

    async fn fetch_page(&self, owner_id: i64, page: u32) -> Result<AssetPage, Error> {
        let mut ctx: RetryContext<()> = RetryContext::with_policy(self.retry);
        let description = format!("asset page {} for owner {}", page, owner_id);

        ctx.execute_with_retry(&description, |_| {
            let source = self.source.clone();

            Box::pin(async move { source.fetch_page(owner_id, page).await })
        })
        .await
    }
}
