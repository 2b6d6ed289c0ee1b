pub mod conn;
pub mod contentsync;
pub mod documents;
pub mod pending;
pub mod reconcile;
pub mod session;

#[cfg(test)]
pub mod testutil;
