//! Blocking client for a Google-style directions service.
//!
//! One request answers one origin/destination pair; the first route's first
//! leg is authoritative. Response decoding is defensive: everything below the
//! `status` field is optional in the schema, and a pure parser decides what
//! each payload shape means so the mapping is testable without HTTP.

mod client;
mod parser;
mod response;


pub use client::DirectionsClient;
