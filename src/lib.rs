//! Quotagate - Fixed-Window Request Rate Limiting
//!
//! This crate implements in-process admission control for HTTP services.
//! The request-handling layer derives an opaque key for each inbound
//! request (typically a route name plus a client identifier), asks the
//! shared [`ratelimit::RateLimiter`] whether the request is admitted, and
//! attaches the `X-RateLimit-*` headers it renders to the response. A
//! rejected request maps to `429 Too Many Requests` with
//! [`ratelimit::rejection_body`] as the payload.
//!
//! The limiter is advisory and never errors or blocks: all state lives in
//! one concurrent in-memory table, and a background task sweeps expired
//! entries to bound memory growth.

pub mod config;
pub mod error;
pub mod ratelimit;
