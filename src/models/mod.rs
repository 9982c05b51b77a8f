pub mod tour_route;
pub mod tour_slice;
pub mod visit_record;

pub use tour_route::{Column, Locator, TourRoute, MIN_SLICE_LEN};
pub use tour_slice::TourSlice;
pub use visit_record::{RecordUpdate, RegionRecord, SeatCandidate, VisitRecord};
