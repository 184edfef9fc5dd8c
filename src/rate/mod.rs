pub mod estimator;

pub use estimator::{RateCarry, RateEstimate, RateEstimator, RefreshRateTracker};
