pub mod filter;
pub mod reconcile;
pub mod session;
