pub mod allocation;
pub mod coefficient;
pub mod plan;
pub mod profit;
pub mod reconcile;
pub mod series;
pub mod slot;
pub mod transfer;
