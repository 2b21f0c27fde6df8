//! Gemeinsame Identifikationstypen
//!
//! Newtype-Pattern fuer die vom Server vergebene Sitzungs-Identitaet und
//! fuer das Ergebnis der Dienstsuche.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BowwError;

/// Vom Server vergebene Sitzungs-Identitaet (GUID)
///
/// Wird genau einmal pro Lauf beim Onboarding zugewiesen und danach
/// nicht mehr veraendert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionGuid(String);

impl SessionGuid {
    /// Uebernimmt die vom Server gesendete ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Gibt die GUID als String-Slice zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionGuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aufgeloester Server-Endpunkt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub adresse: Ipv4Addr,
    pub port: u16,
}

impl ServiceRecord {
    pub fn new(adresse: Ipv4Addr, port: u16) -> Self {
        Self { adresse, port }
    }

    /// WebSocket-URI des Servers (`ws://adresse:port`)
    pub fn ws_uri(&self) -> String {
        format!("ws://{}:{}", self.adresse, self.port)
    }
}

impl std::fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.adresse, self.port)
    }
}

impl FromStr for ServiceRecord {
    type Err = BowwError;

    /// Parst `"a.b.c.d:port"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr = SocketAddrV4::from_str(s.trim())
            .map_err(|e| BowwError::UngueltigeAdresse(format!("'{s}': {e}")))?;
        Ok(Self::new(*addr.ip(), addr.port()))
    }
}
