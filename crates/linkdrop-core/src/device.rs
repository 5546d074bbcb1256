//! Discovered device records.
//!
//! Devices arrive from the discovery collaborator and are replaced wholesale
//! on every refresh; nothing here is persisted. Identity is fingerprint-based
//! when a fingerprint is present. A device without one cannot be favorited
//! and cannot be reliably re-selected across a refresh.

use serde::{Deserialize, Serialize};

/// A device discovered on the local network.
///
/// Every field is optional: discovery announcements are best-effort and
/// peers on older protocol versions omit fields freely. Wire names follow
/// the discovery payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Display name announced by the device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// IPv4/IPv6 address the device was seen at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Hardware model string
    #[serde(rename = "deviceModel", skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    /// Device category (mobile, desktop, server, ...)
    #[serde(rename = "deviceType", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Identity key; stable across refreshes when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Port the device accepts transfers on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Transfer protocol scheme (http/https)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl Device {
    /// Whether two records identify the same device.
    ///
    /// Only fingerprints establish identity; two records without
    /// fingerprints are never the same device, whatever else matches.
    #[must_use]
    pub fn same_device(&self, other: &Self) -> bool {
        matches!(
            (&self.fingerprint, &other.fingerprint),
            (Some(a), Some(b)) if a == b
        )
    }

    /// Whether this device can be favorited and re-selected across refreshes.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.fingerprint.is_some()
    }

    /// Best display label: alias, then address, then fingerprint.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.alias
            .as_deref()
            .or(self.ip_address.as_deref())
            .or(self.fingerprint.as_deref())
            .unwrap_or("Unknown Device")
    }
}
