pub mod apod;
pub mod cache;
pub mod config;
pub mod constants;
pub mod env_state;
pub mod metrics;
pub mod neo_errors;
pub mod neo_feed;
pub mod neo_lookup;
pub mod neotrack;
pub mod orbit_path;
pub mod report;
pub mod time;

pub use config::NeoConfig;
pub use neo_errors::NeoError;
pub use neotrack::{NeoTrack, SearchState};
pub use report::{HazardReport, TableMode};
pub use time::{DateRange, NeoDate};
