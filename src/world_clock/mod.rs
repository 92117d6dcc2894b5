pub mod filter;
pub mod zones;

pub use filter::{filter_regions, FilterView, RegionVisibility, ZoneVisibility};
pub use zones::{Region, TimezoneEntry, WorldClock, ZoneReading, CONTINENTS};
