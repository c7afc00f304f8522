//! Stats, analytics and schedule preview endpoints.
//!
//! Post and provider counts come from the real in-memory counters; reach and
//! engagement figures are mock numbers in plausible ranges, as the dashboard
//! has nothing real to draw on without platform insight APIs.

use std::collections::BTreeMap;

use axum::{extract::Extension, Json};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use social_client::Platform;
use uuid::Uuid;

use crate::kernel::store::ProviderCounters;
use crate::server::app::AppState;

const RECOMMENDATIONS: &[&str] = &[
    "Instagram posts perform better than other platforms - post there first",
    "Best posting time is mid-afternoon on weekdays",
    "Educational content gets noticeably more engagement than promotions",
    "Add more video content for higher reach",
];

#[derive(Serialize)]
pub struct StatsResponse {
    success: bool,
    posts_today: usize,
    total_posts: usize,
    platforms_active: usize,
    providers: BTreeMap<String, ProviderCounters>,
    engagement: Engagement,
    platforms: BTreeMap<Platform, PlatformStats>,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct Engagement {
    likes: u32,
    comments: u32,
    shares: u32,
}

#[derive(Serialize)]
pub struct PlatformStats {
    status: &'static str,
    posts: usize,
    engagement: u32,
}

/// Counter-derived usage numbers plus mock engagement.
pub async fn stats_handler(Extension(state): Extension<AppState>) -> Json<StatsResponse> {
    let posts = state.store.recent_posts(usize::MAX);
    let configured = state.registry.configured_platforms();
    let mut rng = rand::thread_rng();

    let platforms = state
        .registry
        .platforms()
        .into_iter()
        .map(|platform| {
            let posted = posts
                .iter()
                .filter(|p| p.platform == platform && p.success)
                .count();
            (
                platform,
                PlatformStats {
                    status: if configured.contains(&platform) {
                        "active"
                    } else {
                        "unconfigured"
                    },
                    posts: posted,
                    engagement: rng.gen_range(100..500),
                },
            )
        })
        .collect();

    Json(StatsResponse {
        success: true,
        posts_today: state.store.posts_today(),
        total_posts: posts.iter().filter(|p| p.success).count(),
        platforms_active: configured.len(),
        providers: state.store.provider_counters(),
        engagement: Engagement {
            likes: rng.gen_range(500..1500),
            comments: rng.gen_range(100..300),
            shares: rng.gen_range(50..150),
        },
        platforms,
        timestamp: Utc::now(),
    })
}

#[derive(Serialize)]
pub struct AnalyticsResponse {
    success: bool,
    message: String,
    time_range: &'static str,
    summary: AnalyticsSummary,
    platform_breakdown: BTreeMap<Platform, PlatformBreakdown>,
    recommendations: &'static [&'static str],
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AnalyticsSummary {
    total_posts: usize,
    total_reach: u32,
    total_engagement: u32,
    total_clicks: u32,
    average_engagement_rate: String,
    top_performing_platform: Option<Platform>,
}

#[derive(Serialize)]
pub struct PlatformBreakdown {
    posts: usize,
    reach: u32,
    engagement: u32,
    clicks: u32,
    engagement_rate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_post: Option<String>,
}

/// 30-day style analytics summary. Post counts are real, the rest is mock.
pub async fn analytics_handler(Extension(state): Extension<AppState>) -> Json<AnalyticsResponse> {
    let posts = state.store.recent_posts(usize::MAX);
    let mut rng = rand::thread_rng();

    let mut breakdown = BTreeMap::new();
    let mut top: Option<(Platform, usize)> = None;
    for platform in state.registry.platforms() {
        let platform_posts: Vec<_> = posts
            .iter()
            .filter(|p| p.platform == platform && p.success)
            .collect();
        if top.map_or(true, |(_, count)| platform_posts.len() > count) {
            top = Some((platform, platform_posts.len()));
        }
        breakdown.insert(
            platform,
            PlatformBreakdown {
                posts: platform_posts.len(),
                reach: rng.gen_range(5_000..20_000),
                engagement: rng.gen_range(400..1_700),
                clicks: rng.gen_range(100..400),
                engagement_rate: format!("{:.1}%", rng.gen_range(3.0..5.0)),
                top_post: platform_posts.first().map(|p| p.topic.clone()),
            },
        );
    }

    let total_posts = posts.iter().filter(|p| p.success).count();

    Json(AnalyticsResponse {
        success: true,
        message: "Analytics data retrieved successfully".to_string(),
        time_range: "Last 30 days",
        summary: AnalyticsSummary {
            total_posts,
            total_reach: rng.gen_range(20_000..60_000),
            total_engagement: rng.gen_range(1_500..5_000),
            total_clicks: rng.gen_range(400..1_200),
            average_engagement_rate: format!("{:.1}%", rng.gen_range(3.0..5.0)),
            top_performing_platform: top.filter(|(_, count)| *count > 0).map(|(p, _)| p),
        },
        platform_breakdown: breakdown,
        recommendations: RECOMMENDATIONS,
        timestamp: Utc::now(),
    })
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    success: bool,
    message: String,
    automation: AutomationReport,
    upcoming: Vec<UpcomingPost>,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AutomationReport {
    status: &'static str,
    interval_hours: u32,
    daily_limit: usize,
    posted_today: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_post: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct UpcomingPost {
    id: Uuid,
    topic: String,
    platforms: Vec<Platform>,
    scheduled_for: DateTime<Utc>,
}

/// Project pending queue items onto the posting cadence.
pub async fn schedule_handler(Extension(state): Extension<AppState>) -> Json<ScheduleResponse> {
    let posting = &state.config.posting;
    let paused = state.store.is_paused();
    let interval = Duration::hours(i64::from(posting.interval_hours.max(1)));
    let configured = state.registry.configured_platforms();

    let upcoming: Vec<UpcomingPost> = state
        .store
        .pending_content()
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, item)| UpcomingPost {
            id: item.id,
            topic: item.topic.clone(),
            platforms: configured.clone(),
            scheduled_for: Utc::now() + interval * (i as i32 + 1),
        })
        .collect();

    Json(ScheduleResponse {
        success: true,
        message: "Posting schedule computed".to_string(),
        automation: AutomationReport {
            status: if paused { "paused" } else { "active" },
            interval_hours: posting.interval_hours,
            daily_limit: posting.daily_limit,
            posted_today: state.store.posts_today(),
            next_post: (!paused && !upcoming.is_empty()).then(|| upcoming[0].scheduled_for),
        },
        upcoming,
        timestamp: Utc::now(),
    })
}
