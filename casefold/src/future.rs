//! Re-exports of future helpers used by component traits.

pub use futures::future::{BoxFuture, FutureExt};
