pub mod trend;

pub use trend::{trend, TREND_WINDOW};
