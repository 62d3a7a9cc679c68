//! Invoice service implementations: a seeded in-memory stand-in and the
//! reqwest-based client for the real backend.

pub mod http;
pub mod in_memory;
