use serde_json::Value;
use tracing::trace;

use super::client::ApiClient;

pub const MAX_PAGE_SIZE: usize = 100;

impl ApiClient {
    /// Walks a list endpoint page by page and returns every item.
    ///
    /// Stops on the first short page, or as soon as the gate reports no data
    /// for a page; items collected before that point are kept.
    pub async fn paginate(&self, path: &str, query: &[(&str, String)]) -> Vec<Value> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut params: Vec<(&str, String)> = query.to_vec();
            params.push(("page", page.to_string()));
            params.push(("per_page", MAX_PAGE_SIZE.to_string()));

            let Some(batch) = self.request(path, &params).await else {
                break;
            };

            let len = batch.len();
            trace!(path, page, len, "fetched page");
            items.extend(batch);

            if len < MAX_PAGE_SIZE {
                break;
            }
            page += 1;
        }

        items
    }
}
