// ────────────────────────────────
// src/server/listener.rs
// Address parsing and low‑level TCP bind.
// ────────────────────────────────
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;

use crate::error::SinkError;

/// Parses a `host:port` listen spec. An empty host binds to all
/// interfaces; an empty or zero port requests an ephemeral port from the
/// OS, so `":"`, `":0"` and `"127.0.0.1:"` are all valid.
pub fn parse_listen_addr(spec: &str) -> Result<SocketAddr, SinkError> {
    let (host, port) = spec
        .rsplit_once(':')
        .ok_or_else(|| SinkError::InvalidListenAddr(spec.to_string()))?;

    let port: u16 = if port.is_empty() {
        0
    } else {
        port.parse()
            .map_err(|_| SinkError::InvalidListenAddr(spec.to_string()))?
    };

    let ip: IpAddr = if host.is_empty() {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        // Accept bracketed IPv6 hosts like "[::1]".
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|_| SinkError::InvalidListenAddr(spec.to_string()))?
    };

    Ok(SocketAddr::new(ip, port))
}

/// Bind failure is fatal to the caller; there is no retry.
pub async fn bind_tcp(addr: SocketAddr) -> Result<TcpListener, SinkError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| SinkError::Bind { addr, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_host_and_port() {
        let addr = parse_listen_addr(":").unwrap();
        assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(addr.port(), 0);
    }

    #[test]
    fn loopback_with_ephemeral_port() {
        let addr = parse_listen_addr("127.0.0.1:").unwrap();
        assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(addr.port(), 0);
        assert_eq!(addr, parse_listen_addr("127.0.0.1:0").unwrap());
    }

    #[test]
    fn explicit_port() {
        let addr = parse_listen_addr("0.0.0.0:8080").unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn bracketed_ipv6_host() {
        let addr = parse_listen_addr("[::1]:0").unwrap();
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn rejects_missing_colon_and_bad_port() {
        assert!(parse_listen_addr("localhost").is_err());
        assert!(parse_listen_addr("127.0.0.1:notaport").is_err());
        assert!(parse_listen_addr("not-an-ip:80").is_err());
    }

    #[tokio::test]
    async fn ephemeral_bind_reports_nonzero_port() {
        let listener = bind_tcp(parse_listen_addr("127.0.0.1:0").unwrap())
            .await
            .unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
