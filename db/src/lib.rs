//! Storage for Chirp.
//!
//! [`models`] holds the records as they are stored, [`storage`] the traits
//! the API talks to and their backends.

pub mod models;
pub mod storage;
