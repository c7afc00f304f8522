//! Publish fan-out across platforms.
//!
//! One content item goes to every requested platform concurrently. Platforms
//! fail independently; partial success is the normal case, not an error.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use social_client::{Platform, PublisherRegistry};
use tracing::info;

use crate::kernel::store::{ContentStore, GeneratedContent, PostRecord};

/// Publish one item to the requested platforms and record every outcome.
///
/// Returns one [`PostRecord`] per requested platform, in request order.
/// Credential absence, missing per-platform text and upstream rejections all
/// come back as `success=false` records rather than errors.
pub async fn publish_content(
    registry: &PublisherRegistry,
    store: &Arc<dyn ContentStore>,
    content: &GeneratedContent,
    platforms: &[Platform],
    link: Option<&str>,
) -> Vec<PostRecord> {
    let attempts = platforms.iter().map(|&platform| {
        let registry = registry.clone();
        async move {
            let outcome = match (content.texts.get(&platform), registry.get(platform)) {
                (None, _) => Err(format!("no {} text on content item", platform)),
                (_, None) => Err(format!("no publisher registered for {}", platform)),
                (Some(text), Some(publisher)) => publisher
                    .publish(text, link)
                    .await
                    .map_err(|e| e.to_string()),
            };

            match outcome {
                Ok(post_id) => PostRecord {
                    content_id: content.id,
                    platform,
                    success: true,
                    post_id: Some(post_id),
                    error: None,
                    topic: content.topic.clone(),
                    posted_at: Utc::now(),
                },
                Err(error) => PostRecord {
                    content_id: content.id,
                    platform,
                    success: false,
                    post_id: None,
                    error: Some(error),
                    topic: content.topic.clone(),
                    posted_at: Utc::now(),
                },
            }
        }
    });

    let records = join_all(attempts).await;

    let successes = records.iter().filter(|r| r.success).count();
    if successes > 0 {
        store.mark_published(content.id);
    }
    for record in &records {
        store.record_post(record.clone());
    }

    info!(
        content_id = %content.id,
        requested = platforms.len(),
        successes,
        "Publish fan-out complete"
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::store::{MemoryStore, PlatformTexts};
    use social_client::MockPublisher;
    use uuid::Uuid;

    fn content_for(platforms: &[Platform]) -> GeneratedContent {
        let mut texts = PlatformTexts::new();
        for platform in platforms {
            texts.insert(*platform, format!("{} copy", platform));
        }
        GeneratedContent {
            id: Uuid::new_v4(),
            topic: "topic".to_string(),
            source: "anthropic".to_string(),
            texts,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_partial_success_across_platforms() {
        let facebook = Arc::new(MockPublisher::configured(Platform::Facebook).with_post_id("fb_9"));
        let twitter = Arc::new(MockPublisher::configured(Platform::Twitter).with_api_error("rate limited"));
        let registry = PublisherRegistry::new()
            .register(facebook.clone())
            .register(twitter.clone());
        let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::default());
        let content = content_for(&[Platform::Facebook, Platform::Twitter]);

        let records = publish_content(
            &registry,
            &store,
            &content,
            &[Platform::Facebook, Platform::Twitter],
            Some("https://realmute.com/start"),
        )
        .await;

        assert_eq!(records.len(), 2);
        assert!(records[0].success);
        assert_eq!(records[0].post_id.as_deref(), Some("fb_9"));
        assert!(!records[1].success);
        assert!(records[1].error.as_deref().unwrap().contains("rate limited"));

        // One success is enough to mark the item published
        assert!(store.next_unpublished().is_none());
        assert_eq!(store.recent_posts(10).len(), 2);
    }

    #[tokio::test]
    async fn test_missing_credentials_never_reach_the_network() {
        let publisher = Arc::new(MockPublisher::unconfigured(Platform::Linkedin));
        let registry = PublisherRegistry::new().register(publisher.clone());
        let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::default());
        let content = content_for(&[Platform::Linkedin]);

        let records =
            publish_content(&registry, &store, &content, &[Platform::Linkedin], None).await;

        assert!(!records[0].success);
        assert!(records[0]
            .error
            .as_deref()
            .unwrap()
            .contains("credentials not configured"));
        assert_eq!(publisher.call_count(), 0);
        // All attempts failed, item stays unpublished
        assert_eq!(store.next_unpublished().unwrap().id, content.id);
    }

    #[tokio::test]
    async fn test_platform_without_text_fails_locally() {
        let publisher = Arc::new(MockPublisher::configured(Platform::Instagram));
        let registry = PublisherRegistry::new().register(publisher.clone());
        let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::default());
        // Content generated for facebook only
        let content = content_for(&[Platform::Facebook]);

        let records =
            publish_content(&registry, &store, &content, &[Platform::Instagram], None).await;

        assert!(!records[0].success);
        assert!(records[0].error.as_deref().unwrap().contains("instagram"));
        assert_eq!(publisher.call_count(), 0);
    }
}
