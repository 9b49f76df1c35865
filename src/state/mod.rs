//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The orchestration state machine of one crawl run
//! - `LinkState`: The final classification of each extracted link

mod crawl_phase;
mod link_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use link_state::LinkState;
