//! Chirp API service.
//!
//! Serves the post feed and accepts new posts from signed in users.
//!
//! # Configuration
//!
//! See [`config::ChirpApiConfig`]. Without a MongoDB URI the service keeps
//! everything in memory.
//!
//! # Authentication
//!
//! Identity is established upstream by an identity gateway, which forwards the
//! user ID in a header. See [`auth::providers::identity_header`].

pub mod auth;
pub mod config;
pub mod feed;
pub mod server;

pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod handlers;
