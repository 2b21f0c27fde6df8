//! Dienstsuche per mDNS (mdns-sd)
//!
//! Sucht nach dem konfigurierten Diensttyp (Standard `_boww._tcp.local.`)
//! und liefert den ersten aufgeloesten Server mit IPv4-Adresse. Kommt
//! innerhalb des Zeitlimits keine Antwort, endet der Lauf mit
//! `DiscoveryTimeout`; eine zweite Suche gibt es nicht.

use std::net::IpAddr;
use std::time::Duration;

use boww_core::ServiceRecord;
use futures_util::{Stream, StreamExt};
use mdns_sd::{ServiceDaemon, ServiceEvent};
use tracing::{debug, info, warn};

use crate::config::DiscoveryEinstellungen;
use crate::error::{ClientError, ClientResult};

/// Loest den Server-Endpunkt auf
///
/// Ist `server` in der Konfiguration gesetzt, wird die mDNS-Suche
/// uebersprungen.
pub async fn entdecken(einst: &DiscoveryEinstellungen) -> ClientResult<ServiceRecord> {
    if let Some(server) = &einst.server {
        let record: ServiceRecord = server.parse()?;
        info!(server = %record, "Feste Server-Adresse konfiguriert, mDNS uebersprungen");
        return Ok(record);
    }

    info!(dienst = %einst.service_typ, "Suche BoWW-Server per mDNS...");

    let daemon = ServiceDaemon::new()?;
    let receiver = daemon.browse(&einst.service_typ)?;
    let ereignisse = futures_util::stream::unfold(receiver, |rx| async move {
        rx.recv_async().await.ok().map(|ereignis| (ereignis, rx))
    });

    let ergebnis = erste_antwort(Box::pin(ereignisse), einst.timeout()).await;

    // Daemon in jedem Fall beenden, auch nach Timeout
    if let Err(e) = daemon.stop_browse(&einst.service_typ) {
        debug!(fehler = %e, "mDNS-Suche konnte nicht gestoppt werden");
    }
    if let Err(e) = daemon.shutdown() {
        warn!(fehler = %e, "mDNS-Daemon konnte nicht beendet werden");
    }

    if let Ok(record) = &ergebnis {
        info!(server = %record, "BoWW-Server gefunden");
    }
    ergebnis
}

/// Wartet auf das erste aufgeloeste Ereignis mit IPv4-Adresse
///
/// Endet der Ereignisstrom vorzeitig, gilt das ebenfalls als Timeout.
pub async fn erste_antwort<S>(mut ereignisse: S, timeout: Duration) -> ClientResult<ServiceRecord>
where
    S: Stream<Item = ServiceEvent> + Unpin,
{
    let suche = async {
        while let Some(ereignis) = ereignisse.next().await {
            if let Some(record) = record_aus_ereignis(&ereignis) {
                return Some(record);
            }
        }
        None
    };

    match tokio::time::timeout(timeout, suche).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            debug!("mDNS-Ereigniskanal geschlossen");
            Err(ClientError::DiscoveryTimeout(timeout))
        }
        Err(_) => Err(ClientError::DiscoveryTimeout(timeout)),
    }
}

fn record_aus_ereignis(ereignis: &ServiceEvent) -> Option<ServiceRecord> {
    match ereignis {
        ServiceEvent::ServiceResolved(info) => {
            let adresse = info.get_addresses().iter().find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(*v4),
                IpAddr::V6(_) => None,
            });
            match adresse {
                Some(adresse) => {
                    debug!(name = info.get_fullname(), "mDNS: Dienst aufgeloest");
                    Some(ServiceRecord::new(adresse, info.get_port()))
                }
                None => {
                    debug!(name = info.get_fullname(), "mDNS: Dienst ohne IPv4-Adresse ignoriert");
                    None
                }
            }
        }
        ServiceEvent::SearchStarted(typ) => {
            debug!(typ = %typ, "mDNS: Suche gestartet");
            None
        }
        ServiceEvent::ServiceFound(_, name) => {
            debug!(name = %name, "mDNS: Dienst gefunden, warte auf Aufloesung");
            None
        }
        _ => None,
    }
}
