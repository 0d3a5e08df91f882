use quran_model::{Chapter, TranslationResource};
use tokio::sync::OnceCell;

use crate::client::ApiClient;
use crate::error::{AcquireError, Result};

const NO_PARAMS: &[(&str, &str)] = &[];

/// Resolves chapter ids against the `/chapters` listing.
///
/// The listing is fetched at most once per resolver and kept for the rest
/// of the process run.
#[derive(Debug)]
pub struct ChapterResolver {
    client: ApiClient,
    chapters: OnceCell<Vec<Chapter>>,
}

impl ChapterResolver {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            chapters: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// All chapters, in the order the API returned them. No re-sorting and
    /// no check on the count.
    pub async fn list_chapters(&self) -> Result<&[Chapter]> {
        let chapters = self
            .chapters
            .get_or_try_init(|| async {
                tracing::debug!(base_url = %self.client.base_url(), "Fetching chapter listing");
                let chapters: Vec<Chapter> =
                    self.client.get_array("/chapters", NO_PARAMS, "chapters").await?;
                tracing::info!(chapters = chapters.len(), "Loaded chapter listing");
                Ok::<_, AcquireError>(chapters)
            })
            .await?;
        Ok(chapters.as_slice())
    }

    /// The chapter whose id equals `id`.
    ///
    /// Ids outside the listing (including anything outside 1..=114) fail
    /// with [`AcquireError::ChapterNotFound`].
    pub async fn resolve_chapter(&self, id: u32) -> Result<Chapter> {
        self.list_chapters()
            .await?
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(AcquireError::ChapterNotFound(id))
    }

    /// Chapters with ids in `from..=to`, in listing order.
    pub async fn chapters_in_range(&self, from: u32, to: u32) -> Result<Vec<Chapter>> {
        Ok(self
            .list_chapters()
            .await?
            .iter()
            .filter(|c| (from..=to).contains(&c.id))
            .cloned()
            .collect())
    }
}

/// The `/resources/translations` catalog.
pub async fn list_translations(client: &ApiClient) -> Result<Vec<TranslationResource>> {
    tracing::debug!(base_url = %client.base_url(), "Fetching translation catalog");
    client
        .get_array("/resources/translations", NO_PARAMS, "translations")
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chapters_listing, mount_listing};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(server: &MockServer) -> ChapterResolver {
        ChapterResolver::new(ApiClient::new(&server.uri(), "test").unwrap())
    }

    #[tokio::test]
    async fn test_resolve_every_canonical_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chapters_listing()))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = resolver(&server);
        for id in 1..=114 {
            assert_eq!(resolver.resolve_chapter(id).await.unwrap().id, id);
        }
        assert_eq!(resolver.list_chapters().await.unwrap().len(), 114);
        // The expect(1) above is verified when the server drops: one fetch total.
    }

    #[tokio::test]
    async fn test_unknown_ids_not_found() {
        let server = MockServer::start().await;
        mount_listing(&server).await;

        let resolver = resolver(&server);
        for id in [0, 115, 999] {
            let err = resolver.resolve_chapter(id).await.unwrap_err();
            assert!(matches!(err, AcquireError::ChapterNotFound(n) if n == id));
        }
    }

    #[tokio::test]
    async fn test_listing_order_preserved() {
        let server = MockServer::start().await;
        let mut listing = chapters_listing();
        listing["chapters"].as_array_mut().unwrap().reverse();
        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&server)
            .await;

        let resolver = resolver(&server);
        let chapters = resolver.list_chapters().await.unwrap();
        assert_eq!(chapters.first().unwrap().id, 114);
        assert_eq!(chapters.last().unwrap().id, 1);

        let range: Vec<u32> = resolver
            .chapters_in_range(3, 5)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(range, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn test_missing_listing_field_resolves_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "maintenance"})),
            )
            .mount(&server)
            .await;

        let err = resolver(&server).resolve_chapter(1).await.unwrap_err();
        assert!(matches!(err, AcquireError::ChapterNotFound(1)));
    }

    #[tokio::test]
    async fn test_list_translations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources/translations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "translations": [
                    {"id": 20, "name": "Saheeh International", "author_name": "Saheeh International",
                     "slug": "en-sahih-international", "language_name": "english",
                     "translated_name": {"name": "Saheeh International", "language_name": "english"}},
                    {"id": 33, "name": "Indonesian Islamic affairs ministry", "author_name": "Indonesian Islamic affairs ministry",
                     "slug": null, "language_name": "indonesian",
                     "translated_name": {"name": "Indonesian Islamic affairs ministry", "language_name": "english"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), "test").unwrap();
        let catalog = list_translations(&client).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].language_name, "indonesian");
        assert!(catalog[1].slug.is_none());
    }
}
