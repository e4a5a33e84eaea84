//! Adapters binding the domain ports to cluster backends.

pub mod admin;
