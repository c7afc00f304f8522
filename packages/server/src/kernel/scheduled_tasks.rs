//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Three periodic tasks drive the automation:
//! - auto-post cycle (every POST_INTERVAL_HOURS hours): publish the next
//!   pending item, generating a fresh batch first when the queue is dry
//! - queue top-up (every 30 minutes): keep a couple of items ready
//! - nightly trim: re-apply the in-memory retention caps
//!
//! Every task runs under a single-flight guard: a tick that lands while the
//! previous run is still in flight logs and returns instead of overlapping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use social_client::{Platform, PublisherRegistry};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::PostingConfig;
use crate::kernel::engine::ContentEngine;
use crate::kernel::publish::publish_content;
use crate::kernel::store::ContentStore;

/// Everything the scheduled tasks need, cloned into each job closure.
#[derive(Clone)]
pub struct AutomationDeps {
    pub engine: Arc<ContentEngine>,
    pub registry: PublisherRegistry,
    pub store: Arc<dyn ContentStore>,
    pub posting: PostingConfig,
    pub landing_page: String,
}

/// Skip-if-running guard for scheduled work.
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the flight slot. Returns `None` while a previous claim is alive.
    pub fn try_begin(&self) -> Option<SingleFlightGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(SingleFlightGuard(self))
        } else {
            None
        }
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the flight slot on drop, including on panic unwinds.
pub struct SingleFlightGuard<'a>(&'a SingleFlight);

impl Drop for SingleFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

/// Start all scheduled tasks
pub async fn start_scheduler(deps: AutomationDeps) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Auto-post cycle
    let interval_hours = deps.posting.interval_hours.max(1);
    let post_deps = deps.clone();
    let post_guard = Arc::new(SingleFlight::new());
    let post_cron = format!("0 0 */{} * * *", interval_hours);
    let post_job = Job::new_async(post_cron.as_str(), move |_uuid, _lock| {
        let deps = post_deps.clone();
        let guard = post_guard.clone();
        Box::pin(async move {
            let Some(_flight) = guard.try_begin() else {
                tracing::warn!(task = "auto-post", "Previous run still in flight, skipping tick");
                return;
            };
            if let Err(e) = run_auto_post(&deps).await {
                tracing::error!("Auto-post task failed: {}", e);
            }
        })
    })?;
    scheduler.add(post_job).await?;

    // Queue top-up every 30 minutes
    let top_up_deps = deps.clone();
    let top_up_guard = Arc::new(SingleFlight::new());
    let top_up_job = Job::new_async("0 */30 * * * *", move |_uuid, _lock| {
        let deps = top_up_deps.clone();
        let guard = top_up_guard.clone();
        Box::pin(async move {
            let Some(_flight) = guard.try_begin() else {
                tracing::warn!(task = "queue-top-up", "Previous run still in flight, skipping tick");
                return;
            };
            if let Err(e) = run_queue_top_up(&deps).await {
                tracing::error!("Queue top-up task failed: {}", e);
            }
        })
    })?;
    scheduler.add(top_up_job).await?;

    // Nightly retention trim at midnight
    let trim_store = deps.store.clone();
    let trim_job = Job::new_async("0 0 0 * * *", move |_uuid, _lock| {
        let store = trim_store.clone();
        Box::pin(async move {
            store.trim();
            tracing::info!("Nightly retention trim complete");
        })
    })?;
    scheduler.add(trim_job).await?;

    scheduler.start().await?;

    tracing::info!(
        interval_hours,
        daily_limit = deps.posting.daily_limit,
        "Scheduled tasks started (auto-post, queue top-up every 30 minutes, nightly trim)"
    );
    Ok(scheduler)
}

/// Run one auto-post cycle
///
/// Publishes the oldest pending item to every configured platform, generating
/// a fresh batch first when the queue has nothing pending. Skips entirely
/// when paused or when today's successful posts hit the daily limit.
pub async fn run_auto_post(deps: &AutomationDeps) -> Result<()> {
    if deps.store.is_paused() {
        tracing::info!("Auto-post skipped: system paused");
        return Ok(());
    }

    let posted_today = deps.store.posts_today();
    if posted_today >= deps.posting.daily_limit {
        tracing::info!(
            posted_today,
            limit = deps.posting.daily_limit,
            "Auto-post skipped: daily posting limit reached"
        );
        return Ok(());
    }

    let next = match deps.store.next_unpublished() {
        Some(item) => Some(item),
        None => {
            tracing::info!("No pending content, generating new batch");
            deps.engine
                .generate_batch(deps.posting.batch_size, &Platform::ALL)
                .await;
            deps.store.next_unpublished()
        }
    };

    let Some(item) = next else {
        tracing::warn!("Auto-post found nothing to publish");
        return Ok(());
    };

    let platforms = deps.registry.configured_platforms();
    if platforms.is_empty() {
        tracing::warn!("Auto-post skipped: no platform credentials configured");
        return Ok(());
    }

    let records = publish_content(
        &deps.registry,
        &deps.store,
        &item,
        &platforms,
        Some(deps.landing_page.as_str()),
    )
    .await;

    tracing::info!(
        content_id = %item.id,
        successes = records.iter().filter(|r| r.success).count(),
        attempts = records.len(),
        "Auto-post cycle complete"
    );
    Ok(())
}

/// Top up the queue when fewer than two items are pending
pub async fn run_queue_top_up(deps: &AutomationDeps) -> Result<()> {
    if deps.store.is_paused() {
        return Ok(());
    }

    let stats = deps.store.queue_stats();
    if stats.pending < 2 {
        tracing::info!(pending = stats.pending, "Content queue low, generating more");
        deps.engine
            .generate_batch(deps.posting.batch_size, &Platform::ALL)
            .await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrandConfig;
    use crate::kernel::store::MemoryStore;
    use social_client::MockPublisher;

    fn deps_with(
        registry: PublisherRegistry,
        posting: PostingConfig,
    ) -> (AutomationDeps, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let content_store: Arc<dyn ContentStore> = store.clone();
        let engine = Arc::new(ContentEngine::new(
            Vec::new(),
            content_store.clone(),
            BrandConfig::default(),
        ));
        (
            AutomationDeps {
                engine,
                registry,
                store: content_store,
                posting,
                landing_page: "https://realmute.com/start".to_string(),
            },
            store,
        )
    }

    #[test]
    fn test_single_flight_rejects_overlap() {
        let flight = SingleFlight::new();

        let first = flight.try_begin();
        assert!(first.is_some());
        assert!(flight.try_begin().is_none());

        drop(first);
        assert!(flight.try_begin().is_some());
    }

    #[tokio::test]
    async fn test_auto_post_generates_then_publishes() {
        let facebook = Arc::new(MockPublisher::configured(Platform::Facebook));
        let registry = PublisherRegistry::new().register(facebook.clone());
        let (deps, store) = deps_with(registry, PostingConfig::default());

        run_auto_post(&deps).await.unwrap();

        // Queue was empty: a batch was generated, then one item published
        assert_eq!(store.queue_stats().total, deps.posting.batch_size);
        assert_eq!(facebook.call_count(), 1);
        assert_eq!(store.recent_posts(10).len(), 1);
        assert!(store.recent_posts(10)[0].success);
    }

    #[tokio::test]
    async fn test_auto_post_respects_pause() {
        let facebook = Arc::new(MockPublisher::configured(Platform::Facebook));
        let registry = PublisherRegistry::new().register(facebook.clone());
        let (deps, store) = deps_with(registry, PostingConfig::default());
        store.set_paused(true);

        run_auto_post(&deps).await.unwrap();

        assert_eq!(store.queue_stats().total, 0);
        assert_eq!(facebook.call_count(), 0);
    }

    #[tokio::test]
    async fn test_auto_post_respects_daily_limit() {
        let facebook = Arc::new(MockPublisher::configured(Platform::Facebook));
        let registry = PublisherRegistry::new().register(facebook.clone());
        let posting = PostingConfig {
            daily_limit: 1,
            ..PostingConfig::default()
        };
        let (deps, store) = deps_with(registry, posting);

        run_auto_post(&deps).await.unwrap();
        assert_eq!(facebook.call_count(), 1);

        // Limit of one reached; the next cycle must not post
        run_auto_post(&deps).await.unwrap();
        assert_eq!(facebook.call_count(), 1);
        assert_eq!(store.posts_today(), 1);
    }

    #[tokio::test]
    async fn test_top_up_only_when_pending_is_low() {
        let (deps, store) = deps_with(PublisherRegistry::new(), PostingConfig::default());

        run_queue_top_up(&deps).await.unwrap();
        assert_eq!(store.queue_stats().total, deps.posting.batch_size);

        // Enough pending now; a second tick adds nothing
        run_queue_top_up(&deps).await.unwrap();
        assert_eq!(store.queue_stats().total, deps.posting.batch_size);
    }
}
