pub mod linearize;
pub mod metrics;
pub mod minute;
pub mod price;
pub mod reconcile;
pub mod record;
pub mod resolve;
pub mod segment;
pub mod series;
