//! Device role classification from handshake metadata.
//!
//! Every WebSocket connection is classified exactly once, during the
//! handshake, from the raw query string. Classification never fails: a
//! missing or unrecognized client-kind parameter resolves to
//! [`Role::Unknown`], which is pooled with the edge displays. Dropping a
//! misconfigured display would be worse than letting it listen, so the
//! default is fail-open and logged by the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Query parameter names recognized as "what kind of client is this".
///
/// Older display firmware sends `client=`, newer builds send `clientType=`.
/// Both are matched case-insensitively.
pub const CLIENT_KIND_PARAMS: &[&str] = &["clienttype", "client"];

/// Query parameter carrying an optional human-assigned device label.
pub const DEVICE_LABEL_PARAM: &str = "device";

/// The population a connection belongs to.
///
/// Fixed at connect time; there is no reassignment API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Embedded table display (ESP32 + small LCD).
    EdgeDisplay,
    /// Kitchen display screen.
    KitchenDisplay,
    /// Staff mobile/web client.
    StaffApp,
    /// Classification failed; pooled with the edge displays.
    Unknown,
}

impl Role {
    /// Resolve a role from the raw handshake query string.
    ///
    /// Parameter names and values are matched case-insensitively. The first
    /// recognized parameter name wins (`clientType` before `client`).
    pub fn classify(raw_query: &str) -> Role {
        let params = parse_query(raw_query);

        for key in CLIENT_KIND_PARAMS {
            if let Some(value) = params.get(*key) {
                return Role::from_token(value);
            }
        }

        Role::Unknown
    }

    /// Map a client-kind token to a role.
    fn from_token(token: &str) -> Role {
        match token.to_ascii_lowercase().as_str() {
            "esp32" => Role::EdgeDisplay,
            "kitchen" => Role::KitchenDisplay,
            "staff" => Role::StaffApp,
            _ => Role::Unknown,
        }
    }

    /// The pool this role is registered under.
    ///
    /// `Unknown` folds into the edge-display pool; the role itself stays
    /// distinguishable for diagnostics.
    pub fn pool(self) -> Role {
        match self {
            Role::Unknown => Role::EdgeDisplay,
            other => other,
        }
    }

    /// Token used on the wire (`CONNECTED|<token>` and notice prefixes).
    pub fn wire_token(self) -> &'static str {
        match self {
            Role::EdgeDisplay => "ESP32",
            Role::KitchenDisplay => "KITCHEN",
            Role::StaffApp => "STAFF",
            Role::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_token())
    }
}

/// Parse a raw query string into a key/value map.
///
/// Keys are lowercased; values keep their original casing (labels are
/// user-visible). On duplicate keys the first occurrence wins. No percent
/// decoding is attempted; the recognized tokens are plain ASCII.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| value.to_string());
    }

    params
}

/// Extract the optional device label from the raw query string.
pub fn device_label(raw_query: &str) -> Option<String> {
    parse_query(raw_query)
        .remove(DEVICE_LABEL_PARAM)
        .filter(|label| !label.is_empty())
}
