use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    store::{KeyValueStore, StoredValue},
    Result,
};

/// Preference keys, all under [`NAMESPACE`](crate::store::NAMESPACE).
pub mod keys {
    /// First install time, epoch milliseconds.
    pub const INSTALL_DATE: &str = "rta_install_date";
    /// Launches since install or the last deferral.
    pub const LAUNCH_TIMES: &str = "rta_launch_times";
    /// Opt-out flag.
    pub const OPT_OUT: &str = "rta_opt_out";
    /// Last "later" answer, epoch milliseconds.
    pub const ASK_LATER_DATE: &str = "rta_ask_later_date";
}

/// Everything the eligibility policy remembers between launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptState {
    /// First observed install time. `None` until the first launch after creation or after a
    /// deferral.
    pub install_date: Option<DateTime<Utc>>,
    /// Launches since install or the last deferral.
    pub launch_count: u32,
    /// Set once the user rated or declined. Never cleared by this crate.
    pub opted_out: bool,
    /// Last "later" answer. The Unix epoch if the user never deferred.
    pub last_deferred_at: DateTime<Utc>,
}

impl Default for PromptState {
    fn default() -> Self {
        PromptState {
            install_date: None,
            launch_count: 0,
            opted_out: false,
            last_deferred_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl PromptState {
    /// Read the state from `store`. Missing or malformed entries read as their defaults.
    pub fn load(store: &dyn KeyValueStore) -> PromptState {
        PromptState {
            install_date: read_timestamp(store, keys::INSTALL_DATE),
            launch_count: read(store, keys::LAUNCH_TIMES, StoredValue::as_int).unwrap_or(0),
            opted_out: read(store, keys::OPT_OUT, StoredValue::as_bool).unwrap_or(false),
            last_deferred_at: read_timestamp(store, keys::ASK_LATER_DATE)
                .unwrap_or(DateTime::UNIX_EPOCH),
        }
    }

    /// Write the state to `store` and commit.
    ///
    /// An unset install date and a zero launch count remove their entries, so a deferred state
    /// looks exactly like a fresh one apart from the opt-out flag and the deferral time.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        match self.install_date {
            Some(date) => store.put(keys::INSTALL_DATE, date.timestamp_millis().into()),
            None => store.remove(keys::INSTALL_DATE),
        }
        if self.launch_count > 0 {
            store.put(keys::LAUNCH_TIMES, self.launch_count.into());
        } else {
            store.remove(keys::LAUNCH_TIMES);
        }
        store.put(keys::OPT_OUT, self.opted_out.into());
        if self.last_deferred_at == DateTime::UNIX_EPOCH {
            store.remove(keys::ASK_LATER_DATE);
        } else {
            store.put(
                keys::ASK_LATER_DATE,
                self.last_deferred_at.timestamp_millis().into(),
            );
        }
        store.commit()
    }
}

fn read<T>(
    store: &dyn KeyValueStore,
    key: &str,
    convert: impl Fn(&StoredValue) -> Option<T>,
) -> Option<T> {
    let value = store.get(key)?;
    let converted = convert(&value);
    if converted.is_none() {
        log::warn!(target: "rate_prompt", key; "ignoring stored value of unexpected type: {:?}", value);
    }
    converted
}

/// Zero means unset, matching how platform preference stores report a missing long.
fn read_timestamp(store: &dyn KeyValueStore, key: &str) -> Option<DateTime<Utc>> {
    let millis = read(store, key, StoredValue::as_long)?;
    if millis == 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::{keys, PromptState};
    use crate::store::{InMemoryStore, KeyValueStore, StoredValue};

    #[test]
    fn empty_store_loads_default_state() {
        let store = InMemoryStore::new();
        assert_eq!(PromptState::load(&store), PromptState::default());
    }

    #[test]
    fn save_writes_expected_entries() {
        let mut store = InMemoryStore::new();
        let installed = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let state = PromptState {
            install_date: Some(installed),
            launch_count: 4,
            opted_out: false,
            last_deferred_at: DateTime::UNIX_EPOCH,
        };

        state.save(&mut store).unwrap();

        assert_eq!(
            store.get(keys::INSTALL_DATE),
            Some(StoredValue::Long(1_700_000_000_123))
        );
        assert_eq!(store.get(keys::LAUNCH_TIMES), Some(StoredValue::Int(4)));
        assert_eq!(store.get(keys::OPT_OUT), Some(StoredValue::Bool(false)));
        assert_eq!(store.get(keys::ASK_LATER_DATE), None);
        assert_eq!(PromptState::load(&store), state);
    }

    #[test]
    fn saving_unset_fields_removes_entries() {
        let mut store = InMemoryStore::new();
        store.put(keys::INSTALL_DATE, StoredValue::Long(1_000));
        store.put(keys::LAUNCH_TIMES, StoredValue::Int(9));

        let deferred_at = Utc.timestamp_opt(5_000, 0).unwrap();
        PromptState {
            last_deferred_at: deferred_at,
            ..PromptState::default()
        }
        .save(&mut store)
        .unwrap();

        assert_eq!(store.get(keys::INSTALL_DATE), None);
        assert_eq!(store.get(keys::LAUNCH_TIMES), None);
        assert_eq!(
            store.get(keys::ASK_LATER_DATE),
            Some(StoredValue::Long(5_000_000))
        );
    }

    #[test]
    fn wrongly_typed_entries_read_as_defaults() {
        let mut store = InMemoryStore::new();
        store.put(keys::INSTALL_DATE, StoredValue::Bool(true));
        store.put(keys::LAUNCH_TIMES, StoredValue::Long(3));
        store.put(keys::OPT_OUT, StoredValue::Int(1));

        assert_eq!(PromptState::load(&store), PromptState::default());
    }

    #[test]
    fn zero_install_date_is_unset() {
        let mut store = InMemoryStore::new();
        store.put(keys::INSTALL_DATE, StoredValue::Long(0));

        assert_eq!(PromptState::load(&store).install_date, None);
    }
}
