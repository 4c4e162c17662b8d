//! Clients for the individual server distribution APIs.
//!
//! Every provider publishes a different checksum for its artifacts, so each one
//! picks the algorithm its downloads are verified with:
//!
//! | Provider | Algorithm |
//! |----------|-----------|
//! | Paper    | SHA-256   |
//! | Purpur   | MD5       |
//! | Vanilla  | SHA-1     |
//! | Magma    | none      |

pub mod magma;
pub mod paper;
pub mod purpur;
pub mod vanilla;
