mod counters;
mod fetch_counters;

pub use fetch_counters::FetchCounters;
