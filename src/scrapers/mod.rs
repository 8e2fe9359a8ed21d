//! Clients for the upstream publishing API.
//!
//! One module per site. Each client exposes a listing fetch (tag URL →
//! article summaries) and a detail fetch (article URL → cleaned body
//! text), both going through the retrying executor so transient
//! transport faults degrade to empty results instead of errors.

pub mod forbes;
