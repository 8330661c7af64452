pub mod aggregator;
pub mod calendar;
pub mod classifier;
pub mod data_loader;
pub mod downloader;
pub mod models;
pub mod report;

pub use aggregator::MonthlyAggregator;
pub use calendar::{HolidayCalendar, ItalianHolidays};
pub use classifier::band_for;
pub use data_loader::PriceSheet;
pub use models::{Band, DateRange, HourlyRecord, MonthBucket, SummaryRow};
