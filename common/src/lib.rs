//! Types shared between the Chirp services.
//!
//! [`views`] holds everything that is safe to hand to a client, [`params`]
//! the request bodies the API accepts, and [`caller`] the authenticated
//! principal model. The feed projection itself (handle resolution and row
//! rendering) lives next to the view types it produces.

pub mod caller;
pub mod params;
pub mod time;
pub mod views;
