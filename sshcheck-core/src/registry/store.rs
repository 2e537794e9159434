use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use super::DEFAULT_STALENESS;
use crate::{
    api::UpsertCredentials,
    error::Result,
    orchestration::RegistryPort,
    types::{RegistryEntry, RegistryKey},
};

/// Process-wide store of currently valid credentials.
///
/// At most one entry exists per (team, host); a newer success overwrites
/// the previous credential in place. Every operation takes the single
/// internal lock for its whole read-modify-write, so concurrent upserts and
/// prunes never observe or leave a half-updated entry.
pub struct CredentialRegistry {
    entries: Mutex<HashMap<RegistryKey, RegistryEntry>>,
    staleness: Duration,
}

impl fmt::Debug for CredentialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRegistry")
            .field("entries", &self.entries.try_lock().map(|guard| guard.len()))
            .field("staleness", &self.staleness)
            .finish()
    }
}

impl Default for CredentialRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_STALENESS)
    }
}

impl CredentialRegistry {
    pub fn new(staleness: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            staleness,
        }
    }

    /// Maximum age an entry may reach before [`prune`](Self::prune)
    /// removes it.
    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Insert or overwrite the entry for `(update.team, update.ip)`,
    /// stamped with the current time.
    pub fn upsert(&self, update: &UpsertCredentials) -> RegistryEntry {
        self.upsert_at(update, Utc::now())
    }

    /// Like [`upsert`](Self::upsert) with an explicit timestamp. The stored
    /// timestamp never moves backwards for a key, even if `at` does.
    pub fn upsert_at(
        &self,
        update: &UpsertCredentials,
        at: DateTime<Utc>,
    ) -> RegistryEntry {
        let key = RegistryKey::new(update.team, update.ip.clone());
        let mut entries = self.entries.lock();

        let last_updated = entries
            .get(&key)
            .map_or(at, |existing| existing.last_updated.max(at));
        let entry = RegistryEntry {
            team: update.team,
            ip: update.ip.clone(),
            user: update.user.clone(),
            password: update.password.clone(),
            last_updated,
        };
        entries.insert(key, entry.clone());
        entry
    }

    /// Snapshot of every entry, ordered by team then host. Callers must not
    /// rely on the ordering.
    pub fn list(&self) -> Vec<RegistryEntry> {
        let mut snapshot: Vec<RegistryEntry> =
            self.entries.lock().values().cloned().collect();
        snapshot.sort_by(|a, b| (a.team, &a.ip).cmp(&(b.team, &b.ip)));
        snapshot
    }

    /// Remove entries older than the configured staleness threshold.
    /// Returns how many were removed.
    pub fn prune(&self) -> usize {
        self.prune_older_than(self.staleness)
    }

    pub fn prune_older_than(&self, threshold: Duration) -> usize {
        let mut entries = self.entries.lock();
        Self::retain_fresh(&mut entries, Utc::now(), threshold)
    }

    /// Prune as if the clock read `now`.
    pub fn prune_at(&self, now: DateTime<Utc>, threshold: Duration) -> usize {
        let mut entries = self.entries.lock();
        Self::retain_fresh(&mut entries, now, threshold)
    }

    fn retain_fresh(
        entries: &mut HashMap<RegistryKey, RegistryEntry>,
        now: DateTime<Utc>,
        threshold: Duration,
    ) -> usize {
        // A threshold too large to represent can never be exceeded.
        let Some(cutoff) = chrono::Duration::from_std(threshold)
            .ok()
            .and_then(|threshold| now.checked_sub_signed(threshold))
        else {
            return 0;
        };

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale(cutoff));
        let removed = before - entries.len();
        debug!(
            target: "registry",
            removed,
            remaining = entries.len(),
            %cutoff,
            "pruned stale credentials"
        );
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl RegistryPort for CredentialRegistry {
    async fn upsert(&self, update: &UpsertCredentials) -> Result<()> {
        CredentialRegistry::upsert(self, update);
        Ok(())
    }

    async fn prune(&self) -> Result<()> {
        CredentialRegistry::prune(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Arc, thread};

    fn update(team: u32, ip: &str, user: &str, password: &str) -> UpsertCredentials {
        UpsertCredentials {
            team,
            ip: ip.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn repeated_upsert_keeps_one_entry_with_later_timestamp() {
        let registry = CredentialRegistry::default();
        let first = registry.upsert(&update(1, "10.1.1.1", "root", "toor"));
        let second = registry.upsert(&update(1, "10.1.1.1", "root", "toor"));

        assert_eq!(registry.len(), 1);
        assert!(second.last_updated >= first.last_updated);
        assert_eq!(registry.list()[0].last_updated, second.last_updated);
    }

    #[test]
    fn newer_credential_overwrites_in_place() {
        let registry = CredentialRegistry::default();
        registry.upsert(&update(2, "10.2.1.1", "root", "toor"));
        registry.upsert(&update(2, "10.2.1.1", "admin", "changeme"));

        let entries = registry.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user, "admin");
        assert_eq!(entries[0].password, "changeme");
    }

    #[test]
    fn same_host_on_different_teams_are_distinct() {
        let registry = CredentialRegistry::default();
        registry.upsert(&update(1, "192.168.0.1", "root", "toor"));
        registry.upsert(&update(2, "192.168.0.1", "root", "toor"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn timestamp_never_moves_backwards() {
        let registry = CredentialRegistry::default();
        let now = Utc::now();
        registry.upsert_at(&update(1, "h", "u", "p"), now);
        let stored = registry
            .upsert_at(&update(1, "h", "u2", "p2"), now - chrono::Duration::seconds(30));

        assert_eq!(stored.last_updated, now);
        assert_eq!(stored.user, "u2");
    }

    #[test]
    fn prune_removes_exactly_entries_past_threshold() {
        let registry = CredentialRegistry::default();
        let now = Utc::now();
        registry.upsert_at(
            &update(1, "10.1.1.1", "root", "toor"),
            now - chrono::Duration::seconds(30),
        );
        registry.upsert_at(
            &update(1, "10.1.1.2", "root", "toor"),
            now - chrono::Duration::seconds(90),
        );

        let removed = registry.prune_at(now, Duration::from_secs(60));

        assert_eq!(removed, 1);
        let remaining = registry.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].ip, "10.1.1.1");
    }

    #[test]
    fn prune_keeps_entries_newer_than_cutoff() {
        let registry = CredentialRegistry::new(Duration::from_secs(60));
        registry.upsert(&update(1, "10.1.1.1", "root", "toor"));
        assert_eq!(registry.prune(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn huge_threshold_prunes_nothing() {
        let registry = CredentialRegistry::default();
        registry.upsert(&update(1, "h", "u", "p"));
        assert_eq!(registry.prune_older_than(Duration::MAX), 0);
    }

    #[test]
    fn concurrent_upserts_to_distinct_keys_all_persist() {
        let registry = Arc::new(CredentialRegistry::default());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry.upsert(&update(
                        i % 8 + 1,
                        &format!("10.{}.1.{}", i % 8 + 1, i),
                        "root",
                        "toor",
                    ));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 64);
        let keys: HashSet<_> =
            registry.list().iter().map(RegistryEntry::key).collect();
        assert_eq!(keys.len(), 64);
    }

    #[test]
    fn concurrent_upserts_to_one_key_leave_a_single_coherent_entry() {
        let registry = Arc::new(CredentialRegistry::default());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry.upsert(&update(
                        3,
                        "10.3.1.1",
                        &format!("user{i}"),
                        &format!("pass{i}"),
                    ));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = registry.list();
        assert_eq!(entries.len(), 1);
        let suffix = entries[0].user.trim_start_matches("user");
        assert_eq!(entries[0].password, format!("pass{suffix}"));
    }

    #[tokio::test]
    async fn entries_written_after_prune_started_survive_it() {
        let registry = Arc::new(CredentialRegistry::new(Duration::ZERO));
        let stale = Utc::now() - chrono::Duration::seconds(5);
        registry.upsert_at(&update(1, "10.1.1.1", "root", "toor"), stale);

        let prune_started = Utc::now();
        RegistryPort::upsert(
            registry.as_ref(),
            &update(1, "10.1.1.2", "root", "toor"),
        )
        .await
        .unwrap();
        let removed = registry.prune_at(prune_started, Duration::ZERO);

        assert_eq!(removed, 1);
        let entries = registry.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ip, "10.1.1.2");
    }
}
