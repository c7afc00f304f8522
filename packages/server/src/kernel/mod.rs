//! Kernel module - content engine, store, publishing and scheduling.

pub mod engine;
pub mod prompts;
pub mod publish;
pub mod scheduled_tasks;
pub mod store;
pub mod test_dependencies;

pub use engine::{ContentEngine, FALLBACK_SOURCE};
pub use publish::publish_content;
pub use scheduled_tasks::{start_scheduler, AutomationDeps, SingleFlight};
pub use store::{
    ContentStore, GeneratedContent, MemoryStore, PlatformTexts, PostRecord, ProviderCounters,
    QueueStats,
};
pub use test_dependencies::TestDependencies;
