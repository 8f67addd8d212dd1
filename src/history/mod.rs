//! Historical revenue records and the aggregates derived from them

mod dataset;
pub mod loader;

pub use dataset::{
    ClientRevenue, HistoricalDataset, MonthlyRevenue, QuarterlyRevenue, RevenueRecord,
    RevenueStatistics, UNASSIGNED_CLIENT,
};
pub use loader::{load_default_history, load_history, load_history_from_reader, DEFAULT_HISTORY_PATH};
