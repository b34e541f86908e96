pub mod geo;
pub mod drivers;
pub mod markers;
pub mod viewport;
pub mod pricing;
pub mod routing;
pub mod estimate;
pub mod discovery;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
