//! Savings accumulator with write-through persistence.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use handlekurv_core::{Co2Kg, Kroner, SavingsTotals};
use tracing::{debug, instrument, warn};

use crate::storage::{CO2_SAVED_KEY, KeyValueStore, MONEY_SAVED_KEY, PersistHandle, WriteThrough};

/// Owner of the running money and CO2 totals.
///
/// Totals only change through [`SavingsStore::update_savings`], which
/// replaces both values. Callers that want to add to the totals compute the
/// new pair with [`SavingsTotals::accumulate`] first.
#[derive(Debug)]
pub struct SavingsStore<S> {
    totals: Mutex<SavingsTotals>,
    money_writer: WriteThrough<S>,
    co2_writer: WriteThrough<S>,
}

impl<S: KeyValueStore> SavingsStore<S> {
    /// Load the persisted totals. Absent or unparsable values count as zero.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<S>) -> Self {
        let totals = SavingsTotals {
            money_saved: read_amount::<S, Kroner>(&store, MONEY_SAVED_KEY).await,
            co2_saved: read_amount::<S, Co2Kg>(&store, CO2_SAVED_KEY).await,
        };

        debug!(money_saved = %totals.money_saved, co2_saved = %totals.co2_saved, "Loaded savings");
        Self::with_totals(store, totals)
    }

    /// Create a store around known totals without reading storage.
    #[must_use]
    pub fn with_totals(store: Arc<S>, totals: SavingsTotals) -> Self {
        Self {
            totals: Mutex::new(totals),
            money_writer: WriteThrough::new(Arc::clone(&store), MONEY_SAVED_KEY),
            co2_writer: WriteThrough::new(store, CO2_SAVED_KEY),
        }
    }

    /// Replace both totals and persist them as decimal strings.
    pub fn update_savings(&self, money_saved: Kroner, co2_saved: Co2Kg) -> PersistHandle {
        let mut totals = self.lock();
        *totals = SavingsTotals {
            money_saved,
            co2_saved,
        };
        debug!(%money_saved, %co2_saved, "Updated savings");

        self.money_writer
            .write(money_saved.amount().to_string())
            .merge(self.co2_writer.write(co2_saved.kilograms().to_string()))
    }

    /// Current totals.
    #[must_use]
    pub fn totals(&self) -> SavingsTotals {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, SavingsTotals> {
        self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn read_amount<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore,
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match store.get(key).await {
        Ok(Some(raw)) => raw.parse::<T>().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "Stored amount is not a number, using zero");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored amount, using zero");
            T::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_load_defaults_to_zero() {
        let savings = SavingsStore::load(Arc::new(MemoryStore::new())).await;
        assert_eq!(savings.totals(), SavingsTotals::default());
    }

    #[tokio::test]
    async fn test_load_parses_stored_strings() {
        let store = MemoryStore::with_entries([(MONEY_SAVED_KEY, "27"), (CO2_SAVED_KEY, "3.16")]);
        let savings = SavingsStore::load(Arc::new(store)).await;

        assert_eq!(savings.totals().money_saved, Kroner::whole(27));
        assert_eq!(savings.totals().co2_saved.kilograms(), Decimal::new(316, 2));
    }

    #[tokio::test]
    async fn test_load_unparsable_is_zero() {
        let store = MemoryStore::with_entries([(MONEY_SAVED_KEY, "NaN"), (CO2_SAVED_KEY, "1.58")]);
        let savings = SavingsStore::load(Arc::new(store)).await;

        assert_eq!(savings.totals().money_saved, Kroner::ZERO);
        assert_eq!(savings.totals().co2_saved.kilograms(), Decimal::new(158, 2));
    }

    #[tokio::test]
    async fn test_update_persists_both_keys() {
        let store = Arc::new(MemoryStore::new());
        let savings = SavingsStore::load(Arc::clone(&store)).await;

        savings
            .update_savings(Kroner::whole(22), Co2Kg::new(Decimal::new(316, 2)))
            .wait()
            .await
            .unwrap();

        assert_eq!(store.peek(MONEY_SAVED_KEY).as_deref(), Some("22"));
        assert_eq!(store.peek(CO2_SAVED_KEY).as_deref(), Some("3.16"));

        let reloaded = SavingsStore::load(store).await;
        assert_eq!(reloaded.totals(), savings.totals());
    }

    #[tokio::test]
    async fn test_update_replaces_rather_than_adds() {
        let savings = SavingsStore::load(Arc::new(MemoryStore::new())).await;
        savings.update_savings(Kroner::whole(10), Co2Kg::ZERO);
        savings.update_savings(Kroner::whole(4), Co2Kg::ZERO);

        assert_eq!(savings.totals().money_saved, Kroner::whole(4));
    }
}
