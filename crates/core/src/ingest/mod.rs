pub mod catalogue;
pub mod fixture;
pub mod provider;
pub mod synthetic;
pub mod types;

pub use provider::{HistoricalSeriesProvider, HttpJsonPriceFeed, PriceSnapshotProvider};
