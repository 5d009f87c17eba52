//! Runtime model representations.
//!
//! These are the types prediction runs against. Persisted forms live in
//! [`crate::persist`] and convert into these after validation.

mod linear;

pub use linear::LinearRegression;
