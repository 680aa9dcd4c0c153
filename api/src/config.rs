use clap::Parser;
use std::{net::SocketAddr, time::Duration};

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Chirp API server")]
pub struct ChirpApiConfig {
    #[clap(
        short,
        long,
        env = "CHIRP_API_BIND_ADDR",
        default_value = "0.0.0.0:4000"
    )]
    pub bind_addr: SocketAddr,

    /// Origin of the web client, allowed through CORS.
    #[clap(
        long,
        env = "CHIRP_API_PUBLIC_URL",
        default_value = "http://localhost:3000"
    )]
    pub public_url: String,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,

    /// MongoDB connection string. When unset, posts and users are kept in
    /// memory and lost on restart.
    #[clap(long, env = "CHIRP_API_MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// How long a page of the feed may be served from cache, in seconds.
    /// Submitting a post clears the cache regardless.
    #[clap(long, env = "CHIRP_API_FEED_CACHE_TTL", default_value_t = 30)]
    pub feed_cache_ttl_secs: u64,

    /// Shared secret the identity gateway sends in `X-Identity-Proxy-Secret`.
    ///
    /// When set, identity headers without the matching secret are rejected.
    /// Leave unset only when the API is not reachable except through the
    /// gateway.
    #[clap(long, env = "CHIRP_API_IDENTITY_PROXY_SECRET")]
    pub identity_proxy_secret: Option<String>,
}

impl ChirpApiConfig {
    pub fn feed_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.feed_cache_ttl_secs)
    }
}
