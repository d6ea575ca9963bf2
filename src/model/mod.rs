//! Plain domain data: the catalog, customers, coffees and orders.

pub mod catalog;
pub mod coffee;
pub mod customer;
pub mod order;

pub use catalog::*;
pub use coffee::*;
pub use customer::*;
pub use order::*;
