//! Client list business logic: the recent-clients rotation and the AUM book.
//!
//! The AUM figures are a static book seeded per client — there is no ledger
//! behind them. Locally stored overrides take precedence so an advisor can
//! pin real numbers for individual clients.

use rand::seq::SliceRandom;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{AumRecord, ClientCustomFields, Contact};

/// How many clients the dashboard's "recent clients" card shows.
const RECENT_CLIENTS_COUNT: usize = 6;

/// A rotating subset of clients, cached for 24 hours.
///
/// On a cache miss the full contact list is fetched from Copper, shuffled,
/// and the snapshot stored so the card stays stable for the day.
pub async fn recent_clients(state: &AppState) -> Result<Vec<Contact>, ApiError> {
    if let Some(cached) = state.try_cache(|db| db.get_recent_clients()) {
        log::debug!("recent clients served from cache ({} entries)", cached.len());
        return Ok(cached);
    }

    let mut contacts = state.copper()?.list_contacts().await?;
    contacts.shuffle(&mut rand::thread_rng());
    contacts.truncate(RECENT_CLIENTS_COUNT);

    if let Err(e) = state.with_cache(|db| db.put_recent_clients(&contacts)) {
        log::warn!("could not cache recent clients: {}", e);
    }
    Ok(contacts)
}

/// AUM summary for the whole book.
pub async fn aum_summary(state: &AppState) -> Result<Vec<AumRecord>, ApiError> {
    let contacts = state.copper()?.list_contacts().await?;
    let overrides = state
        .with_cache(|db| db.all_custom_fields())
        .unwrap_or_default();

    Ok(contacts
        .iter()
        .map(|contact| {
            let stored = overrides
                .iter()
                .find(|(id, _)| *id == contact.id)
                .map(|(_, fields)| fields);
            aum_record(contact, stored)
        })
        .collect())
}

/// Build one AUM record, preferring the stored override over the seeded
/// book value.
fn aum_record(contact: &Contact, stored: Option<&ClientCustomFields>) -> AumRecord {
    let aum = stored
        .and_then(|f| f.aum_override)
        .unwrap_or_else(|| seeded_aum(contact.id));
    AumRecord {
        client: contact.name.clone(),
        aum,
        growth: seeded_fraction(contact.id, 7) * 0.15,
        performance: seeded_fraction(contact.id, 13) * 0.12,
    }
}

/// Deterministic placeholder AUM so the book is stable between requests.
fn seeded_aum(id: u64) -> f64 {
    250_000.0 + (id % 40) as f64 * 125_000.0
}

/// Deterministic fraction in [0, 1) derived from the client id.
fn seeded_fraction(id: u64, salt: u64) -> f64 {
    ((id.wrapping_mul(2654435761).wrapping_add(salt * 97)) % 1000) as f64 / 1000.0
}
