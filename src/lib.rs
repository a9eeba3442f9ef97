pub mod config;
pub mod constants;
pub mod crawler;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod types;

pub use normalize::{MeetingNormalizer, SourceAdapter, SpiderRegistry};
pub use types::{Classification, Link, Location, Meeting, MeetingStatus};
