//! Rate limiting logic and state management.

mod entry;
pub mod headers;
mod limiter;

pub use headers::rejection_body;
pub use limiter::{Decision, RateLimiter};
