//! Feed address resolution
//!
//! Users type `connect lab.example:9000`, `connect lab.example`, or
//! nothing at all. Missing pieces are filled from defaults: `ws://`
//! scheme, `localhost` host, port 8080. Anything that still does not
//! look like an authority is rejected before dialing.

use orrery_core::{OrreryError, OrreryResult};

/// Host used when the input is empty
pub const DEFAULT_HOST: &str = "localhost";

/// Port appended when the authority has none
pub const DEFAULT_PORT: u16 = 8080;

/// Expand a user-supplied feed address into a dialable URL
pub fn resolve_feed_address(input: &str) -> OrreryResult<String> {
    let trimmed = input.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return Err(OrreryError::InvalidAddress(trimmed.to_string()));
    }

    let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("ws://") {
        ("ws://", rest)
    } else if let Some(rest) = trimmed.strip_prefix("wss://") {
        ("wss://", rest)
    } else {
        ("ws://", trimmed)
    };

    let rest = if rest.is_empty() { DEFAULT_HOST } else { rest };

    // authority ends at the first path separator
    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    let authority = resolve_authority(authority)?;
    Ok(format!("{}{}{}", scheme, authority, path))
}

fn resolve_authority(authority: &str) -> OrreryResult<String> {
    if authority.is_empty() {
        return Err(OrreryError::InvalidAddress(authority.to_string()));
    }

    // bracketed IPv6 carries its port after the closing bracket
    let port = if let Some(bracket) = authority.strip_prefix('[') {
        match bracket.split_once(']') {
            Some((_, tail)) => tail.strip_prefix(':'),
            None => return Err(OrreryError::InvalidAddress(authority.to_string())),
        }
    } else if authority.matches(':').count() > 1 {
        return Err(OrreryError::InvalidAddress(authority.to_string()));
    } else {
        match authority.split_once(':') {
            Some(("", _)) => return Err(OrreryError::InvalidAddress(authority.to_string())),
            Some((_, port)) => Some(port),
            None => None,
        }
    };

    match port {
        Some(port) => {
            port.parse::<u16>()
                .map_err(|_| OrreryError::InvalidAddress(authority.to_string()))?;
            Ok(authority.to_string())
        }
        None => Ok(format!("{}:{}", authority, DEFAULT_PORT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gets_all_defaults() {
        assert_eq!(resolve_feed_address("").unwrap(), "ws://localhost:8080");
        assert_eq!(resolve_feed_address("  ").unwrap(), "ws://localhost:8080");
    }

    #[test]
    fn test_bare_host_gets_scheme_and_port() {
        assert_eq!(resolve_feed_address("lab.example").unwrap(), "ws://lab.example:8080");
    }

    #[test]
    fn test_explicit_port_is_kept() {
        assert_eq!(resolve_feed_address("lab.example:9000").unwrap(), "ws://lab.example:9000");
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        assert_eq!(resolve_feed_address("ws://lab.example").unwrap(), "ws://lab.example:8080");
        assert_eq!(
            resolve_feed_address("wss://secure.example").unwrap(),
            "wss://secure.example:8080"
        );
        assert_eq!(
            resolve_feed_address("ws://lab.example:1234").unwrap(),
            "ws://lab.example:1234"
        );
    }

    #[test]
    fn test_path_survives() {
        assert_eq!(
            resolve_feed_address("lab.example/feed").unwrap(),
            "ws://lab.example:8080/feed"
        );
    }

    #[test]
    fn test_ipv6_brackets() {
        assert_eq!(resolve_feed_address("[::1]").unwrap(), "ws://[::1]:8080");
        assert_eq!(resolve_feed_address("[::1]:9000").unwrap(), "ws://[::1]:9000");
    }

    #[test]
    fn test_rejects_junk() {
        assert!(resolve_feed_address("two words").is_err());
        assert!(resolve_feed_address(":9000").is_err());
        assert!(resolve_feed_address("host:notaport").is_err());
        assert!(resolve_feed_address("host:99999").is_err());
        assert!(resolve_feed_address("a:b:c").is_err());
        assert!(resolve_feed_address("[::1").is_err());
    }
}
