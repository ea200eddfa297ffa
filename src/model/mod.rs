//! Types that represent the core data model, such as `Customer`, `Transaction` and `Dataset`.
mod amount;
mod customer;
mod dataset;
mod id;
mod scalar;
mod transaction;

pub use amount::{parse_float, Amount};
pub use customer::Customer;
pub use dataset::{Dataset, Grouping, Payload};
pub use id::Id;
pub use scalar::Scalar;
pub use transaction::Transaction;
