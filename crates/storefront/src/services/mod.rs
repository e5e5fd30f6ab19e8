//! Storefront services.
//!
//! Services wrap the platform clients with storefront-specific behavior
//! (caching, partitioning). Route handlers talk to services, not to the
//! raw clients, except where a call must run under the shopper's token.

pub mod catalog;
