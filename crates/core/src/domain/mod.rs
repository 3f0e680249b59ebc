pub mod contract;
pub mod market;
pub mod news;
pub mod recommendation;
