pub mod distance;
pub mod errors;
pub mod validation;
