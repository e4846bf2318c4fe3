//! HTTP API handlers for radio-api

pub mod episodes;
pub mod health;
pub mod search;
pub mod welcome;

pub use episodes::{episodes_by_date, list_episodes};
pub use health::health_routes;
pub use search::{search_episodes, MIN_SEARCH_LEN};
pub use welcome::welcome;
