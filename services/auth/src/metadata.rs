//! Session metadata extraction from raw request details
//!
//! The transport layer hands over header values as plain strings; these
//! helpers turn them into the [`SessionMetadata`] recorded with a session.

use std::net::{IpAddr, SocketAddr};

use crate::models::SessionMetadata;

/// Classify the client platform from a user agent string
pub fn detect_platform(user_agent: &str) -> &'static str {
    let ua = user_agent.to_lowercase();

    if ua.contains("android") {
        "android"
    } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        "ios"
    } else if ua.contains("windows") {
        "windows"
    } else if ua.contains("macintosh") || ua.contains("mac os") {
        "macos"
    } else if ua.contains("linux") {
        "linux"
    } else {
        "web"
    }
}

/// Classify the client device from a user agent string
pub fn detect_device(user_agent: &str) -> &'static str {
    let ua = user_agent.to_lowercase();

    if ua.contains("mobile") || ua.contains("android") {
        return "mobile";
    }
    if ua.contains("tablet") || ua.contains("ipad") {
        return "tablet";
    }
    if ua.contains("iphone") {
        return "mobile";
    }

    if ["chrome", "firefox", "safari", "edge"]
        .iter()
        .any(|browser| ua.contains(browser))
    {
        return "desktop";
    }

    "unknown"
}

/// Pick the client address: first `X-Forwarded-For` hop, then `X-Real-IP`,
/// then the socket peer. Any port suffix is removed.
pub fn resolve_client_ip(
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
    remote_addr: Option<&str>,
) -> Option<String> {
    let forwarded = forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let candidate = forwarded
        .or_else(|| real_ip.map(str::trim).filter(|value| !value.is_empty()))
        .or_else(|| remote_addr.map(str::trim).filter(|value| !value.is_empty()))?;

    Some(strip_port(candidate))
}

fn strip_port(addr: &str) -> String {
    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return ip.to_string();
    }
    // host:port with a non-IP host
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => {
            host.to_string()
        }
        _ => addr.to_string(),
    }
}

impl SessionMetadata {
    /// Build metadata from raw header values and the peer address.
    pub fn from_request_parts(
        user_agent: Option<&str>,
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
        remote_addr: Option<&str>,
    ) -> Self {
        let user_agent = user_agent
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_string);
        let ua = user_agent.as_deref().unwrap_or_default();

        Self {
            device: Some(detect_device(ua).to_string()),
            platform: Some(detect_platform(ua).to_string()),
            ip_address: resolve_client_ip(forwarded_for, real_ip, remote_addr),
            user_agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                          AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
                           (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
    const WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15";

    #[test]
    fn platform_detection() {
        assert_eq!(detect_platform(ANDROID), "android");
        assert_eq!(detect_platform(IPHONE), "ios");
        assert_eq!(detect_platform(IPAD), "ios");
        assert_eq!(detect_platform(WINDOWS_CHROME), "windows");
        assert_eq!(
            detect_platform("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)"),
            "macos"
        );
        assert_eq!(detect_platform("Mozilla/5.0 (X11; Linux x86_64)"), "linux");
        assert_eq!(detect_platform("curl/8.4.0"), "web");
    }

    #[test]
    fn device_detection() {
        assert_eq!(detect_device(ANDROID), "mobile");
        assert_eq!(detect_device(IPHONE), "mobile");
        assert_eq!(detect_device(IPAD), "tablet");
        assert_eq!(detect_device(WINDOWS_CHROME), "desktop");
        assert_eq!(detect_device("curl/8.4.0"), "unknown");
        assert_eq!(detect_device(""), "unknown");
    }

    #[test]
    fn forwarded_for_wins_and_takes_first_hop() {
        let ip = resolve_client_ip(
            Some("203.0.113.7, 10.0.0.1"),
            Some("198.51.100.2"),
            Some("127.0.0.1:55000"),
        );
        assert_eq!(ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn real_ip_then_remote_addr() {
        assert_eq!(
            resolve_client_ip(None, Some("198.51.100.2"), Some("127.0.0.1:55000")).as_deref(),
            Some("198.51.100.2")
        );
        assert_eq!(
            resolve_client_ip(Some("  "), None, Some("127.0.0.1:55000")).as_deref(),
            Some("127.0.0.1")
        );
        assert_eq!(resolve_client_ip(None, None, None), None);
    }

    #[test]
    fn ports_are_stripped_for_ipv4_ipv6_and_hosts() {
        assert_eq!(
            resolve_client_ip(None, None, Some("[2001:db8::1]:8443")).as_deref(),
            Some("2001:db8::1")
        );
        assert_eq!(
            resolve_client_ip(None, None, Some("2001:db8::1")).as_deref(),
            Some("2001:db8::1")
        );
        assert_eq!(
            resolve_client_ip(None, None, Some("gateway.local:8080")).as_deref(),
            Some("gateway.local")
        );
    }

    #[test]
    fn metadata_from_request_parts() {
        let meta =
            SessionMetadata::from_request_parts(Some(IPHONE), None, None, Some("10.1.2.3:4000"));

        assert_eq!(meta.device.as_deref(), Some("mobile"));
        assert_eq!(meta.platform.as_deref(), Some("ios"));
        assert_eq!(meta.user_agent.as_deref(), Some(IPHONE));
        assert_eq!(meta.ip_address.as_deref(), Some("10.1.2.3"));

        let empty = SessionMetadata::from_request_parts(None, None, None, None);
        assert_eq!(empty.user_agent, None);
        assert_eq!(empty.platform.as_deref(), Some("web"));
    }
}
