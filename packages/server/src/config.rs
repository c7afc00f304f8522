use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
///
/// Every third-party credential is optional: absent provider keys shrink the
/// generation chain, absent platform tokens make that publisher report
/// structured failures instead of posting.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub claude_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub facebook_page_access_token: Option<String>,
    pub facebook_page_id: Option<String>,
    pub linkedin_access_token: Option<String>,
    pub linkedin_person_id: Option<String>,
    pub instagram_access_token: Option<String>,
    pub instagram_account_id: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub brand: BrandConfig,
    pub posting: PostingConfig,
}

/// Brand facts embedded into every generation prompt.
#[derive(Debug, Clone)]
pub struct BrandConfig {
    pub name: String,
    pub product: String,
    pub website: String,
    pub landing_page: String,
}

/// Posting cadence, limits and in-memory retention.
#[derive(Debug, Clone)]
pub struct PostingConfig {
    pub interval_hours: u32,
    pub daily_limit: usize,
    pub batch_size: usize,
    pub queue_capacity: usize,
    pub posts_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            claude_api_key: env::var("CLAUDE_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            facebook_page_access_token: env::var("FACEBOOK_PAGE_ACCESS_TOKEN").ok(),
            facebook_page_id: env::var("FACEBOOK_PAGE_ID").ok(),
            linkedin_access_token: env::var("LINKEDIN_ACCESS_TOKEN").ok(),
            linkedin_person_id: env::var("LINKEDIN_PERSON_ID").ok(),
            instagram_access_token: env::var("INSTAGRAM_ACCESS_TOKEN").ok(),
            instagram_account_id: env::var("INSTAGRAM_ACCOUNT_ID").ok(),
            twitter_bearer_token: env::var("TWITTER_BEARER_TOKEN").ok(),
            brand: BrandConfig {
                name: env::var("BRAND_NAME")
                    .unwrap_or_else(|_| "Real Mute Technologies".to_string()),
                product: env::var("PRODUCT_NAME").unwrap_or_else(|_| "Real Mute".to_string()),
                website: env::var("WEBSITE_URL")
                    .unwrap_or_else(|_| "https://realmute.com".to_string()),
                landing_page: env::var("LANDING_PAGE_URL")
                    .unwrap_or_else(|_| "https://realmute.com/start".to_string()),
            },
            posting: PostingConfig {
                interval_hours: env::var("POST_INTERVAL_HOURS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()
                    .context("POST_INTERVAL_HOURS must be a valid number")?,
                daily_limit: env::var("DAILY_POST_LIMIT")
                    .unwrap_or_else(|_| "6".to_string())
                    .parse()
                    .context("DAILY_POST_LIMIT must be a valid number")?,
                batch_size: env::var("GENERATE_BATCH_SIZE")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .context("GENERATE_BATCH_SIZE must be a valid number")?,
                queue_capacity: env::var("CONTENT_QUEUE_CAPACITY")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()
                    .context("CONTENT_QUEUE_CAPACITY must be a valid number")?,
                posts_capacity: env::var("POSTS_LOG_CAPACITY")
                    .unwrap_or_else(|_| "500".to_string())
                    .parse()
                    .context("POSTS_LOG_CAPACITY must be a valid number")?,
            },
        })
    }
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            interval_hours: 4,
            daily_limit: 6,
            batch_size: 3,
            queue_capacity: 100,
            posts_capacity: 500,
        }
    }
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "Real Mute Technologies".to_string(),
            product: "Real Mute".to_string(),
            website: "https://realmute.com".to_string(),
            landing_page: "https://realmute.com/start".to_string(),
        }
    }
}
