//! In-memory content store.
//!
//! The store is the only shared mutable state in the process: a bounded queue
//! of generated content, a bounded log of publish attempts, per-provider
//! usage counters and the automation pause flag. Both buffers evict oldest
//! entries on overflow (ring-buffer-by-truncation); nothing survives a
//! restart and nothing is meant to.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_client::Platform;
use uuid::Uuid;

/// Per-platform text, keyed by destination network.
pub type PlatformTexts = BTreeMap<Platform, String>;

/// One generated marketing item. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: Uuid,
    pub topic: String,
    /// Provider tag that produced the text, or "fallback".
    pub source: String,
    pub texts: PlatformTexts,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of one publish attempt against one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub content_id: Uuid,
    pub platform: Platform,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub topic: String,
    pub posted_at: DateTime<Utc>,
}

/// Success/error tallies for one provider.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ProviderCounters {
    pub successes: u64,
    pub errors: u64,
}

/// Queue occupancy summary.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QueueStats {
    pub total: usize,
    pub published: usize,
    pub pending: usize,
}

/// Injected storage seam for all process-local state.
pub trait ContentStore: Send + Sync {
    fn push_content(&self, item: GeneratedContent);
    fn content(&self, id: Uuid) -> Option<GeneratedContent>;
    /// Queue contents, newest first.
    fn recent_content(&self) -> Vec<GeneratedContent>;
    /// Oldest queued item with no successful publish yet.
    fn next_unpublished(&self) -> Option<GeneratedContent>;
    /// Every queued item with no successful publish yet, oldest first.
    fn pending_content(&self) -> Vec<GeneratedContent>;
    fn mark_published(&self, id: Uuid);

    fn record_post(&self, record: PostRecord);
    /// Publish attempts, newest first, up to `limit`.
    fn recent_posts(&self, limit: usize) -> Vec<PostRecord>;
    /// Successful posts made today (UTC), for the daily limit gate.
    fn posts_today(&self) -> usize;

    fn record_provider_success(&self, provider: &str);
    fn record_provider_error(&self, provider: &str);
    fn provider_counters(&self) -> BTreeMap<String, ProviderCounters>;

    fn queue_stats(&self) -> QueueStats;

    fn is_paused(&self) -> bool;
    fn set_paused(&self, paused: bool);

    /// Re-apply retention caps (the nightly trim job).
    fn trim(&self);
    /// Reset counters and empty every buffer. Leaves the pause flag alone.
    fn clear(&self);
}

#[derive(Default)]
struct StoreInner {
    queue: VecDeque<GeneratedContent>,
    published: HashSet<Uuid>,
    posts: VecDeque<PostRecord>,
    counters: BTreeMap<String, ProviderCounters>,
    paused: bool,
}

/// Bounded in-memory [`ContentStore`].
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    queue_capacity: usize,
    posts_capacity: usize,
}

impl MemoryStore {
    pub fn new(queue_capacity: usize, posts_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            queue_capacity,
            posts_capacity,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(100, 500)
    }
}

fn truncate_front<T>(buffer: &mut VecDeque<T>, capacity: usize) {
    while buffer.len() > capacity {
        buffer.pop_front();
    }
}

impl ContentStore for MemoryStore {
    fn push_content(&self, item: GeneratedContent) {
        let mut inner = self.inner.write().unwrap();
        inner.queue.push_back(item);
        truncate_front(&mut inner.queue, self.queue_capacity);
    }

    fn content(&self, id: Uuid) -> Option<GeneratedContent> {
        let inner = self.inner.read().unwrap();
        inner.queue.iter().find(|item| item.id == id).cloned()
    }

    fn recent_content(&self) -> Vec<GeneratedContent> {
        let inner = self.inner.read().unwrap();
        inner.queue.iter().rev().cloned().collect()
    }

    fn next_unpublished(&self) -> Option<GeneratedContent> {
        let inner = self.inner.read().unwrap();
        inner
            .queue
            .iter()
            .find(|item| !inner.published.contains(&item.id))
            .cloned()
    }

    fn pending_content(&self) -> Vec<GeneratedContent> {
        let inner = self.inner.read().unwrap();
        inner
            .queue
            .iter()
            .filter(|item| !inner.published.contains(&item.id))
            .cloned()
            .collect()
    }

    fn mark_published(&self, id: Uuid) {
        let mut inner = self.inner.write().unwrap();
        inner.published.insert(id);
    }

    fn record_post(&self, record: PostRecord) {
        let mut inner = self.inner.write().unwrap();
        inner.posts.push_back(record);
        truncate_front(&mut inner.posts, self.posts_capacity);
    }

    fn recent_posts(&self, limit: usize) -> Vec<PostRecord> {
        let inner = self.inner.read().unwrap();
        inner.posts.iter().rev().take(limit).cloned().collect()
    }

    fn posts_today(&self) -> usize {
        let today = Utc::now().date_naive();
        let inner = self.inner.read().unwrap();
        inner
            .posts
            .iter()
            .filter(|post| post.success && post.posted_at.date_naive() == today)
            .count()
    }

    fn record_provider_success(&self, provider: &str) {
        let mut inner = self.inner.write().unwrap();
        inner
            .counters
            .entry(provider.to_string())
            .or_default()
            .successes += 1;
    }

    fn record_provider_error(&self, provider: &str) {
        let mut inner = self.inner.write().unwrap();
        inner
            .counters
            .entry(provider.to_string())
            .or_default()
            .errors += 1;
    }

    fn provider_counters(&self) -> BTreeMap<String, ProviderCounters> {
        self.inner.read().unwrap().counters.clone()
    }

    fn queue_stats(&self) -> QueueStats {
        let inner = self.inner.read().unwrap();
        let published = inner
            .queue
            .iter()
            .filter(|item| inner.published.contains(&item.id))
            .count();
        QueueStats {
            total: inner.queue.len(),
            published,
            pending: inner.queue.len() - published,
        }
    }

    fn is_paused(&self) -> bool {
        self.inner.read().unwrap().paused
    }

    fn set_paused(&self, paused: bool) {
        self.inner.write().unwrap().paused = paused;
    }

    fn trim(&self) {
        let mut inner = self.inner.write().unwrap();
        truncate_front(&mut inner.queue, self.queue_capacity);
        truncate_front(&mut inner.posts, self.posts_capacity);
        // Drop bookkeeping for items the queue no longer holds
        let live: HashSet<Uuid> = inner.queue.iter().map(|item| item.id).collect();
        inner.published.retain(|id| live.contains(id));
    }

    fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.queue.clear();
        inner.published.clear();
        inner.posts.clear();
        inner.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(topic: &str) -> GeneratedContent {
        GeneratedContent {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            source: "fallback".to_string(),
            texts: PlatformTexts::new(),
            generated_at: Utc::now(),
        }
    }

    fn post(content: &GeneratedContent, success: bool) -> PostRecord {
        PostRecord {
            content_id: content.id,
            platform: Platform::Facebook,
            success,
            post_id: success.then(|| "fb_1".to_string()),
            error: (!success).then(|| "denied".to_string()),
            topic: content.topic.clone(),
            posted_at: Utc::now(),
        }
    }

    #[test]
    fn test_queue_evicts_oldest_at_capacity() {
        let store = MemoryStore::new(3, 10);
        for i in 0..5 {
            store.push_content(item(&format!("topic-{}", i)));
        }

        let recent = store.recent_content();
        assert_eq!(recent.len(), 3);
        // Newest first; topic-0 and topic-1 were evicted
        assert_eq!(recent[0].topic, "topic-4");
        assert_eq!(recent[2].topic, "topic-2");
    }

    #[test]
    fn test_next_unpublished_skips_published_items() {
        let store = MemoryStore::default();
        let first = item("first");
        let second = item("second");
        store.push_content(first.clone());
        store.push_content(second.clone());

        assert_eq!(store.next_unpublished().unwrap().id, first.id);

        store.mark_published(first.id);
        assert_eq!(store.next_unpublished().unwrap().id, second.id);

        store.mark_published(second.id);
        assert!(store.next_unpublished().is_none());

        let stats = store.queue_stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.published, 2);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_posts_today_counts_only_successes() {
        let store = MemoryStore::default();
        let content = item("topic");
        store.record_post(post(&content, true));
        store.record_post(post(&content, false));

        assert_eq!(store.posts_today(), 1);
    }

    #[test]
    fn test_clear_resets_counters_and_buffers() {
        let store = MemoryStore::default();
        store.push_content(item("topic"));
        store.record_post(post(&item("other"), true));
        store.record_provider_success("anthropic");
        store.record_provider_error("openai");

        store.clear();

        assert!(store.recent_content().is_empty());
        assert!(store.recent_posts(10).is_empty());
        assert!(store.provider_counters().is_empty());
        assert_eq!(store.queue_stats().total, 0);
    }

    #[test]
    fn test_counters_accumulate_per_provider() {
        let store = MemoryStore::default();
        store.record_provider_success("anthropic");
        store.record_provider_success("anthropic");
        store.record_provider_error("anthropic");
        store.record_provider_error("gemini");

        let counters = store.provider_counters();
        assert_eq!(counters["anthropic"].successes, 2);
        assert_eq!(counters["anthropic"].errors, 1);
        assert_eq!(counters["gemini"].successes, 0);
        assert_eq!(counters["gemini"].errors, 1);
    }
}
