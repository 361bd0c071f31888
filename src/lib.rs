pub mod bonus;
pub mod config;
pub mod digest;
pub mod distance;
pub mod eligibility;
pub mod fake_feed;
pub mod http_cache;
pub mod http_client;
pub mod logging;
pub mod mlb_fetch;
pub mod model;
pub mod proximity;
pub mod quality;
pub mod scorer;
pub mod season;
pub mod store;
