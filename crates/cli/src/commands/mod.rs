//! Command implementations.

mod destinations;
mod send;
mod validate;

pub use destinations::run_destinations;
pub use send::run_send;
pub use validate::run_validate;
