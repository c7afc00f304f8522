//! End-to-end handler tests over fully in-memory state.
//!
//! Handlers are plain async functions, so these tests call them directly
//! with an `Extension`-wrapped state built from scripted providers and
//! publishers; nothing here touches the network.

use axum::extract::{Extension, Path, Query};
use axum::response::IntoResponse;
use axum::Json;

use ai_client::MockProvider;
use marketing_core::kernel::TestDependencies;
use marketing_core::server::routes::{
    clear_handler, generate_handler, get_content_handler, list_content_handler, publish_handler,
    status_handler, test_handler, ContentQuery, GenerateRequest, PublishRequest,
};
use social_client::{MockPublisher, Platform};

const PROVIDER_JSON: &str =
    r#"{"facebook": "fb text", "linkedin": "li text", "instagram": "ig text", "twitter": "tw text"}"#;

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).expect("response serializes")
}

#[tokio::test]
async fn generate_uses_first_healthy_provider_and_skips_the_rest() {
    let deps = TestDependencies::new()
        .with_provider(MockProvider::new("anthropic").with_response(PROVIDER_JSON))
        .with_provider(MockProvider::new("openai"))
        .with_provider(MockProvider::new("gemini"));
    let (state, _) = deps.state();

    let response = generate_handler(
        Extension(state),
        Some(Json(GenerateRequest {
            topic: Some("hotel room practice".to_string()),
            platforms: None,
        })),
    )
    .await
    .unwrap();

    let body = to_json(&response.0);
    assert_eq!(body["success"], true);
    assert_eq!(body["content"]["source"], "anthropic");
    assert_eq!(body["content"]["topic"], "hotel room practice");
    assert_eq!(body["content"]["texts"]["facebook"], "fb text");

    assert_eq!(deps.providers()[0].call_count(), 1);
    assert_eq!(deps.providers()[1].call_count(), 0);
    assert_eq!(deps.providers()[2].call_count(), 0);
}

#[tokio::test]
async fn generate_advances_past_a_failing_provider() {
    let deps = TestDependencies::new()
        .with_provider(MockProvider::new("anthropic").with_error("overloaded"))
        .with_provider(MockProvider::new("openai").with_response(PROVIDER_JSON));
    let (state, store) = deps.state();

    let response = generate_handler(Extension(state), None).await.unwrap();

    let body = to_json(&response.0);
    assert_eq!(body["content"]["source"], "openai");

    use marketing_core::kernel::ContentStore;
    let counters = store.provider_counters();
    assert_eq!(counters["anthropic"].errors, 1);
    assert_eq!(counters["openai"].successes, 1);
}

#[tokio::test]
async fn generate_with_no_working_provider_returns_fallback_under_budget() {
    // No providers configured at all
    let (state, _) = TestDependencies::new().state();

    let response = generate_handler(
        Extension(state),
        Some(Json(GenerateRequest {
            topic: Some("silent practice tips".to_string()),
            platforms: None,
        })),
    )
    .await
    .unwrap();

    let body = to_json(&response.0);
    assert_eq!(body["content"]["source"], "fallback");
    for platform in ["facebook", "linkedin", "instagram", "twitter"] {
        let text = body["content"]["texts"][platform].as_str().unwrap();
        assert!(!text.is_empty());
    }
    let tweet = body["content"]["texts"]["twitter"].as_str().unwrap();
    assert!(tweet.chars().count() <= 280);
}

#[tokio::test]
async fn publish_reports_credential_failures_without_outbound_calls() {
    let deps = TestDependencies::new()
        .with_publisher(MockPublisher::unconfigured(Platform::Facebook))
        .with_publisher(MockPublisher::unconfigured(Platform::Linkedin))
        .with_publisher(MockPublisher::unconfigured(Platform::Instagram))
        .with_publisher(MockPublisher::unconfigured(Platform::Twitter));
    let (state, _) = deps.state();

    // Queue one fallback-generated item, then publish it everywhere
    generate_handler(Extension(state.clone()), None).await.unwrap();
    let response = publish_handler(Extension(state), None).await.unwrap();

    let body = to_json(&response.0);
    assert_eq!(body["success"], false);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    for result in results {
        assert_eq!(result["success"], false);
        assert!(result["error"]
            .as_str()
            .unwrap()
            .contains("credentials not configured"));
    }
    for publisher in deps.publishers() {
        assert_eq!(publisher.call_count(), 0);
    }
}

#[tokio::test]
async fn publish_fan_out_tolerates_partial_success() {
    let deps = TestDependencies::new()
        .with_publisher(MockPublisher::configured(Platform::Facebook).with_post_id("fb_77"))
        .with_publisher(MockPublisher::configured(Platform::Twitter).with_api_error("duplicate"));
    let (state, _) = deps.state();

    generate_handler(Extension(state.clone()), None).await.unwrap();
    let response = publish_handler(
        Extension(state),
        Some(Json(PublishRequest {
            content_id: None,
            platforms: Some(vec!["facebook".to_string(), "twitter".to_string()]),
            link: None,
        })),
    )
    .await
    .unwrap();

    let body = to_json(&response.0);
    assert_eq!(body["success"], true);
    let results = body["results"].as_array().unwrap();
    let facebook = results.iter().find(|r| r["platform"] == "facebook").unwrap();
    let twitter = results.iter().find(|r| r["platform"] == "twitter").unwrap();
    assert_eq!(facebook["success"], true);
    assert_eq!(facebook["post_id"], "fb_77");
    assert_eq!(twitter["success"], false);
    assert!(twitter["error"].as_str().unwrap().contains("duplicate"));
}

#[tokio::test]
async fn publish_with_empty_queue_is_a_bad_request() {
    let (state, _) = TestDependencies::new()
        .with_publisher(MockPublisher::configured(Platform::Facebook))
        .state();

    let error = publish_handler(Extension(state), None).await.unwrap_err();
    let response = error.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn publish_rejects_unknown_platform_names() {
    let (state, _) = TestDependencies::new()
        .with_publisher(MockPublisher::configured(Platform::Facebook))
        .state();

    generate_handler(Extension(state.clone()), None).await.unwrap();
    let error = publish_handler(
        Extension(state),
        Some(Json(PublishRequest {
            content_id: None,
            platforms: Some(vec!["myspace".to_string()]),
            link: None,
        })),
    )
    .await
    .unwrap_err();

    let response = error.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clear_resets_counters_and_queues() {
    let deps = TestDependencies::new()
        .with_provider(MockProvider::new("anthropic").with_error("down"))
        .with_publisher(MockPublisher::configured(Platform::Facebook));
    let (state, store) = deps.state();

    generate_handler(Extension(state.clone()), None).await.unwrap();
    publish_handler(Extension(state.clone()), None).await.unwrap();

    use marketing_core::kernel::ContentStore;
    assert!(!store.provider_counters().is_empty());
    assert_eq!(store.queue_stats().total, 1);

    let response = clear_handler(Extension(state.clone())).await;
    let body = to_json(&response.0);
    assert_eq!(body["success"], true);
    assert_eq!(body["cleared"]["content_queue"], 1);

    assert!(store.provider_counters().is_empty());
    assert_eq!(store.queue_stats().total, 0);
    assert!(store.recent_posts(10).is_empty());

    // Status reflects the reset too
    let status = status_handler(Extension(state)).await;
    let status_body = to_json(&status.0);
    assert_eq!(status_body["stats"]["total"], 0);
    assert_eq!(status_body["posted_today"], 0);
}

#[tokio::test]
async fn content_listing_paginates_newest_first() {
    let (state, _) = TestDependencies::new().state();

    for _ in 0..5 {
        generate_handler(Extension(state.clone()), None).await.unwrap();
    }

    let response = list_content_handler(
        Extension(state.clone()),
        Query(ContentQuery {
            page: Some(1),
            limit: Some(2),
            platform: None,
        }),
    )
    .await
    .unwrap();

    let body = to_json(&response.0);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["pages"], 3);
    assert_eq!(body["content"].as_array().unwrap().len(), 2);

    // Item fetch round-trips by id
    let id = body["content"][0]["id"].as_str().unwrap().parse().unwrap();
    let item = get_content_handler(Extension(state.clone()), Path(id))
        .await
        .unwrap();
    assert_eq!(to_json(&item.0)["id"].as_str().unwrap(), id.to_string());

    // Unknown ids are a 404
    let error = get_content_handler(Extension(state), Path(uuid::Uuid::new_v4()))
        .await
        .unwrap_err();
    assert_eq!(
        error.into_response().status(),
        axum::http::StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn system_report_lists_credential_presence() {
    let deps = TestDependencies::new()
        .with_publisher(MockPublisher::configured(Platform::Facebook))
        .with_publisher(MockPublisher::unconfigured(Platform::Twitter));
    let (state, _) = deps.state();

    let response = test_handler(Extension(state)).await;
    let body = to_json(&response.0);

    assert_eq!(body["success"], true);
    // No provider keys in the test config
    assert_eq!(body["apis"]["claude"], "missing");
    assert_eq!(body["apis"]["openai"], "missing");
    assert_eq!(body["apis"]["gemini"], "missing");
    assert_eq!(body["apis"]["facebook"], "configured");
    assert_eq!(body["apis"]["twitter"], "missing");
}
