pub mod environment;

pub use environment::{TourConfig, DEFAULT_SLICE_LEN, DEFAULT_START_REGION_ID};
