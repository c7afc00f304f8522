//! Topics, prompt template, fallback copy and response parsing.
//!
//! The prompt asks every provider for a JSON object keyed by platform. Models
//! do not always comply, so parsing is two-tier: a strict JSON parse first,
//! then a permissive slicer that carves per-platform text out of whatever
//! came back. The slicer cannot fail, which is what makes any 2xx provider
//! response acceptable to the generation chain.

use std::collections::BTreeMap;

use ai_client::strip_code_blocks;
use rand::seq::SliceRandom;
use social_client::Platform;

use crate::config::BrandConfig;
use crate::kernel::store::PlatformTexts;

/// Hard character budget for Twitter-equivalent text.
pub const TWITTER_CHAR_BUDGET: usize = 280;

/// Candidate topics, sampled uniformly when a request names none.
pub const TOPICS: &[&str] = &[
    "silent practice tips for apartment musicians",
    "how 50dB noise reduction changes everything",
    "perfect intonation while practicing quietly",
    "Real Mute vs traditional practice mutes comparison",
    "late night practice sessions made possible",
    "hotel room practice for touring musicians",
    "conservatory practice room solutions",
    "neighbor-friendly music practice",
    "breakthrough practice mute technology",
    "maintaining embouchure with practice mutes",
    "professional musicians testimonials",
    "music student practice challenges solved",
    "acoustic engineering behind Real Mute",
    "practice efficiency tips",
    "brass instrument care and maintenance",
    "overcoming practice obstacles",
    "music education innovation",
    "sound isolation technology",
    "practice motivation and consistency",
    "musical instrument industry trends",
];

/// Pre-written copy used when every provider fails.
pub const FALLBACK_TEMPLATES: &[&str] = &[
    "🎺 Practice without limits! Real Mute's 50dB noise reduction lets you play anytime, anywhere. Perfect intonation, zero back-pressure. Transform your practice routine today! #RealMute #SilentPractice #TrumpetPractice #MusicTech",
    "🏠 Apartment living doesn't mean giving up your music! Real Mute technology delivers studio-quality silent practice. Your neighbors will thank you! 🤫 #RealMute #ApartmentPractice #SilentMusic #BrassInstruments",
    "⏰ Late night practice session? Early morning warmup? With Real Mute, practice on YOUR schedule. 50dB noise reduction = unlimited practice time! #RealMute #PracticeAnytime #MusicianLife #SilentPractice",
    "🎯 Maintain perfect pitch while practicing silently! Real Mute preserves your instrument's natural intonation. No more compromising between volume and accuracy! #RealMute #PerfectPitch #MusicPractice #BrassPlayers",
    "💪 Consistency is key to musical excellence. Real Mute removes all barriers to daily practice. Practice more, improve faster, achieve your musical goals! #RealMute #DailyPractice #MusicGoals #PracticeMotivation",
];

const INSTAGRAM_HASHTAGS: &str =
    "#realmute #practicemute #silentpractice #brassmusic #trumpet #musictech #apartmentpractice #musicstudent";
const TWITTER_HASHTAGS: &str = "#realmute #silentpractice #musictech";

/// Pick a topic uniformly at random.
pub fn pick_topic() -> &'static str {
    TOPICS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TOPICS[0])
}

/// Deterministic template pick: same topic, same template.
pub fn fallback_template(topic: &str) -> &'static str {
    // FNV-1a; stability matters here, distribution barely does
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in topic.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    FALLBACK_TEMPLATES[(hash % FALLBACK_TEMPLATES.len() as u64) as usize]
}

/// Build the multi-platform generation prompt.
pub fn build_prompt(brand: &BrandConfig, topic: &str) -> String {
    format!(
        r#"You are an expert social media marketing AI for {name}, a company that makes revolutionary practice mutes for brass instruments with 50dB noise reduction.

Generate engaging social media content about: {topic}

Create content for these platforms with their specific characteristics:

1. FACEBOOK (casual, community-focused, 100-200 words):
- Engaging and conversational
- Include call-to-action
- Use emojis appropriately

2. LINKEDIN (professional, B2B, 150-250 words):
- Professional tone, industry insights
- No emojis, formal language

3. INSTAGRAM (visual-focused, hashtag-rich, 80-150 words):
- Lifestyle and visual elements
- Include 8-12 relevant hashtags

4. TWITTER (concise, engaging, under 280 characters):
- Quick tips or insights
- Include 2-3 hashtags and a call-to-action

For each platform, focus on:
- How {product} solves practice problems
- 50dB noise reduction technology
- Perfect for apartments, hotels, late-night practice
- Professional quality maintained

Mention {website} where a link fits naturally.

Return ONLY a JSON object in this exact format, with no other text:
{{
  "facebook": "content here",
  "linkedin": "content here",
  "instagram": "content here",
  "twitter": "content here"
}}

Generate authentic, valuable content that musicians will want to engage with. Make it helpful, not just promotional."#,
        name = brand.name,
        product = brand.product,
        website = brand.website,
        topic = topic,
    )
}

/// Strict parse: a JSON object carrying non-empty text for every requested
/// platform. Returns `None` on any shortfall so the caller can fall through
/// to [`slice_response`].
pub fn parse_response(raw: &str, platforms: &[Platform]) -> Option<PlatformTexts> {
    let value: serde_json::Value = serde_json::from_str(strip_code_blocks(raw)).ok()?;
    let object = value.as_object()?;

    let mut texts = BTreeMap::new();
    for platform in platforms {
        let text = object.get(platform.as_str())?.as_str()?.trim();
        if text.is_empty() {
            return None;
        }
        texts.insert(*platform, text.to_string());
    }
    Some(texts)
}

/// Permissive parse: slice the raw text into per-platform budgets with canned
/// hashtag suffixes. Always succeeds.
pub fn slice_response(raw: &str, platforms: &[Platform]) -> PlatformTexts {
    let text = strip_code_blocks(raw);
    let mut texts = BTreeMap::new();
    for platform in platforms {
        let sliced = match platform {
            Platform::Facebook => truncate_chars(text, 300).to_string(),
            Platform::Linkedin => truncate_chars(text, 400).to_string(),
            Platform::Instagram => {
                format!("{}\n\n{}", truncate_chars(text, 200), INSTAGRAM_HASHTAGS)
            }
            Platform::Twitter => {
                let tweet = format!("{} {}", truncate_chars(text, 200), TWITTER_HASHTAGS);
                truncate_chars(&tweet, TWITTER_CHAR_BUDGET).to_string()
            }
        };
        texts.insert(*platform, sliced);
    }
    texts
}

/// Terminal fallback: pre-written template, never fails.
pub fn fallback_texts(topic: &str, platforms: &[Platform]) -> PlatformTexts {
    let template = fallback_template(topic);
    let mut texts = BTreeMap::new();
    for platform in platforms {
        let text = match platform {
            Platform::Twitter => truncate_chars(template, TWITTER_CHAR_BUDGET).to_string(),
            _ => template.to_string(),
        };
        texts.insert(*platform, text);
    }
    texts
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Platform; 4] = Platform::ALL;

    #[test]
    fn test_fallback_template_is_deterministic() {
        let first = fallback_template("silent practice tips");
        let second = fallback_template("silent practice tips");
        assert_eq!(first, second);
        assert!(FALLBACK_TEMPLATES.contains(&first));
    }

    #[test]
    fn test_build_prompt_embeds_brand_and_topic() {
        let brand = crate::config::BrandConfig::default();
        let prompt = build_prompt(&brand, "hotel room practice");

        assert!(prompt.contains("hotel room practice"));
        assert!(prompt.contains(&brand.name));
        assert!(prompt.contains(&brand.website));
        assert!(prompt.contains("\"facebook\""));
    }

    #[test]
    fn test_parse_response_accepts_fenced_json() {
        let raw = r#"```json
{"facebook": "fb text", "linkedin": "li text", "instagram": "ig text", "twitter": "tw text"}
```"#;
        let texts = parse_response(raw, &ALL).unwrap();
        assert_eq!(texts[&Platform::Facebook], "fb text");
        assert_eq!(texts[&Platform::Twitter], "tw text");
    }

    #[test]
    fn test_parse_response_rejects_missing_platform() {
        let raw = r#"{"facebook": "fb text"}"#;
        assert!(parse_response(raw, &ALL).is_none());
        // But succeeds when only facebook was requested
        assert!(parse_response(raw, &[Platform::Facebook]).is_some());
    }

    #[test]
    fn test_parse_response_rejects_prose() {
        assert!(parse_response("Here are some great posts!", &ALL).is_none());
    }

    #[test]
    fn test_slice_response_respects_twitter_budget() {
        let long = "🎺".repeat(500);
        let texts = slice_response(&long, &ALL);

        assert!(texts[&Platform::Twitter].chars().count() <= TWITTER_CHAR_BUDGET);
        assert_eq!(texts[&Platform::Facebook].chars().count(), 300);
        assert!(texts[&Platform::Instagram].contains("#realmute"));
    }

    #[test]
    fn test_fallback_texts_non_empty_and_within_budget() {
        let texts = fallback_texts("silent practice tips", &ALL);

        for platform in ALL {
            assert!(!texts[&platform].is_empty());
        }
        assert!(texts[&Platform::Twitter].chars().count() <= TWITTER_CHAR_BUDGET);
    }

    #[test]
    fn test_pick_topic_returns_candidate() {
        for _ in 0..20 {
            assert!(TOPICS.contains(&pick_topic()));
        }
    }
}
