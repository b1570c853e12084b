//! Reachable network endpoint of a running worker.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Where a worker's generation server listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub address: IpAddr,
    pub port: u16,
    pub tls: bool,
}

impl Endpoint {
    #[must_use]
    pub const fn new(address: IpAddr, port: u16, tls: bool) -> Self {
        Self { address, port, tls }
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    /// WebSocket URL for `path` on this endpoint.
    #[must_use]
    pub fn ws_url(&self, path: &str) -> String {
        let scheme = if self.tls { "wss" } else { "ws" };
        format!("{scheme}://{}{}", self.socket_addr(), normalize(path))
    }

    /// HTTP URL for `path` on this endpoint.
    #[must_use]
    pub fn http_url(&self, path: &str) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}{}", self.socket_addr(), normalize(path))
    }
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_plain_urls() {
        let endpoint = Endpoint::new("10.0.0.5".parse().unwrap(), 8080, false);
        assert_eq!(endpoint.ws_url("/generate"), "ws://10.0.0.5:8080/generate");
        assert_eq!(endpoint.http_url("shutdown"), "http://10.0.0.5:8080/shutdown");
        assert_eq!(endpoint.to_string(), "10.0.0.5:8080");
    }

    #[test]
    fn builds_tls_urls() {
        let endpoint = Endpoint::new("10.0.0.5".parse().unwrap(), 443, true);
        assert_eq!(endpoint.ws_url("/generate"), "wss://10.0.0.5:443/generate");
        assert_eq!(endpoint.http_url("/shutdown"), "https://10.0.0.5:443/shutdown");
    }

    #[test]
    fn brackets_ipv6_addresses() {
        let endpoint = Endpoint::new("fd00::5".parse().unwrap(), 8080, false);
        assert_eq!(endpoint.ws_url("/generate"), "ws://[fd00::5]:8080/generate");
    }
}
