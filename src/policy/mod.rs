//! Replacement policies.
//!
//! [`lru::LruCore`] is the shared building block; [`two_q::TwoQCache`] and
//! [`arc::ArcCache`] compose several of them.

pub mod arc;
pub mod lru;
pub mod two_q;
