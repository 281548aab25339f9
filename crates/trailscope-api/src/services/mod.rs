mod proximity;
mod search;
mod statistics;

pub use proximity::ProximityService;
pub use search::SearchService;
pub use statistics::StatisticsService;
