pub mod season;

pub use season::{resolve_as_of_date, SeasonCalendar};
