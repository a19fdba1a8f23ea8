//! Owner-scoped interactive sessions with timeout defaults.
//!
//! A session is a short-lived pending choice: open a chest or ignore it,
//! pick a slot to evict, hit or stand. The registry keeps an arena of
//! sessions plus an (owner, flow) index, enforces one live session per
//! (owner, flow) pair, and resolves overdue sessions to their declared
//! default; expiry is an outcome, never an error.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::errors::GameError;

/// The interactive flows the engine runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Open a (possibly sealed) chest, or leave it. Default: ignore.
    ChestOpen,
    /// Inventory full: pick a slot to evict, or decline. Default: decline.
    ForcedReplacement,
    /// Pick a weapon before a duel. Default: no weapon.
    WeaponChoice,
    /// Blackjack turn: hit or stand. Default: stand.
    Blackjack,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub choice: String,
    /// False when the deadline resolved the session to its default.
    pub by_owner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Open,
    Resolved(Resolution),
}

/// What a submit did. Non-owner input and input to a terminal session are
/// ignored on purpose: the dispatcher already vetted identity, so these
/// are races, not user-facing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Ignored,
}

/// Opaque handle the dispatcher routes raw input events by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(Uuid);

struct SessionEntry {
    owner: String,
    kind: FlowKind,
    choices: Vec<String>,
    default_choice: String,
    deadline: DateTime<Utc>,
    status: Status,
    tx: watch::Sender<Option<Resolution>>,
}

impl SessionEntry {
    fn resolve(&mut self, choice: String, by_owner: bool) -> Resolution {
        let resolution = Resolution { choice, by_owner };
        self.status = Status::Resolved(resolution.clone());
        let _ = self.tx.send(Some(resolution.clone()));
        resolution
    }
}

/// Arena of live sessions plus an (owner, flow) index.
pub struct SessionRegistry {
    inner: Mutex<Registry>,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<Uuid, SessionEntry>,
    index: HashMap<(String, FlowKind), Uuid>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a session. Fails when a live session already exists for this
    /// (owner, flow) pair; terminal or overdue predecessors are retired
    /// first (an overdue one resolves to its default on the way out).
    pub fn open(
        &self,
        owner: &str,
        kind: FlowKind,
        choices: Vec<String>,
        default_choice: &str,
        timeout: Duration,
    ) -> Result<SessionHandle, GameError> {
        if !choices.iter().any(|c| c == default_choice) {
            return Err(GameError::InvalidChoice(format!(
                "default '{}' not among the legal choices",
                default_choice
            )));
        }
        let now = Utc::now();
        let mut registry = self.lock();
        let key = (owner.to_string(), kind);
        if let Some(existing_id) = registry.index.get(&key).copied() {
            let live = match registry.entries.get_mut(&existing_id) {
                Some(entry) => match entry.status {
                    Status::Open if entry.deadline > now => true,
                    Status::Open => {
                        let default = entry.default_choice.clone();
                        entry.resolve(default, false);
                        false
                    }
                    Status::Resolved(_) => false,
                },
                None => false,
            };
            if live {
                return Err(GameError::SessionAlreadyOpen {
                    owner: owner.to_string(),
                });
            }
            registry.entries.remove(&existing_id);
            registry.index.remove(&key);
        }

        let id = Uuid::new_v4();
        let (tx, _rx) = watch::channel(None);
        registry.entries.insert(
            id,
            SessionEntry {
                owner: owner.to_string(),
                kind,
                choices,
                default_choice: default_choice.to_string(),
                deadline: now + timeout,
                status: Status::Open,
                tx,
            },
        );
        registry.index.insert(key, id);
        debug!("session open: owner={} kind={:?} id={}", owner, kind, id);
        Ok(SessionHandle(id))
    }

    /// Route one input event into a session. Owner-only; everything else
    /// is ignored without touching state. An overdue session resolves to
    /// its default before the input is considered (and the input is then
    /// ignored, since the session just went terminal).
    pub fn submit(
        &self,
        handle: SessionHandle,
        actor: &str,
        choice: &str,
    ) -> Result<SubmitOutcome, GameError> {
        let now = Utc::now();
        let mut registry = self.lock();
        let entry = registry
            .entries
            .get_mut(&handle.0)
            .ok_or_else(|| GameError::NotFound(format!("session: {}", handle.0)))?;

        if entry.status != Status::Open {
            return Ok(SubmitOutcome::Ignored);
        }
        if entry.deadline <= now {
            let default = entry.default_choice.clone();
            entry.resolve(default, false);
            return Ok(SubmitOutcome::Ignored);
        }
        if entry.owner != actor {
            debug!(
                "session {}: input from non-owner {} ignored",
                handle.0, actor
            );
            return Ok(SubmitOutcome::Ignored);
        }
        if !entry.choices.iter().any(|c| c == choice) {
            return Err(GameError::InvalidChoice(format!(
                "'{}' is not one of the offered choices",
                choice
            )));
        }
        entry.resolve(choice.to_string(), true);
        Ok(SubmitOutcome::Accepted)
    }

    /// Find the current session for an (owner, flow) pair, so the
    /// dispatcher can route raw input events without tracking handles.
    pub fn lookup(&self, owner: &str, kind: FlowKind) -> Option<SessionHandle> {
        let registry = self.lock();
        registry
            .index
            .get(&(owner.to_string(), kind))
            .copied()
            .map(SessionHandle)
    }

    /// Peek at a session's resolution without waiting.
    pub fn resolution(&self, handle: SessionHandle) -> Option<Resolution> {
        let registry = self.lock();
        match registry.entries.get(&handle.0)?.status {
            Status::Resolved(ref resolution) => Some(resolution.clone()),
            Status::Open => None,
        }
    }

    /// Wait for the owner's choice, or the deadline, whichever comes
    /// first. Expiry yields the declared default.
    pub async fn await_resolution(&self, handle: SessionHandle) -> Result<Resolution, GameError> {
        let (mut rx, deadline) = {
            let registry = self.lock();
            let entry = registry
                .entries
                .get(&handle.0)
                .ok_or_else(|| GameError::NotFound(format!("session: {}", handle.0)))?;
            if let Status::Resolved(ref resolution) = entry.status {
                return Ok(resolution.clone());
            }
            (entry.tx.subscribe(), entry.deadline)
        };

        loop {
            if let Some(resolution) = rx.borrow().clone() {
                return Ok(resolution);
            }
            let now = Utc::now();
            let remaining = deadline.signed_duration_since(now);
            if remaining <= Duration::zero() {
                return Ok(self.expire(handle));
            }
            let wait = remaining
                .to_std()
                .unwrap_or(std::time::Duration::from_millis(1));
            match tokio::time::timeout(wait, rx.changed()).await {
                Ok(Ok(())) => continue,
                // Sender gone means the entry was swept. The channel keeps
                // its last value, so a resolution sent just before the
                // sweep is still visible here.
                Ok(Err(_)) => {
                    if let Some(resolution) = rx.borrow().clone() {
                        return Ok(resolution);
                    }
                    return Ok(self.expire(handle));
                }
                Err(_) => return Ok(self.expire(handle)),
            }
        }
    }

    fn expire(&self, handle: SessionHandle) -> Resolution {
        let mut registry = self.lock();
        match registry.entries.get_mut(&handle.0) {
            Some(entry) => match entry.status {
                Status::Resolved(ref resolution) => resolution.clone(),
                Status::Open => {
                    let default = entry.default_choice.clone();
                    entry.resolve(default, false)
                }
            },
            // Entry swept between waits: all sweeps resolve to defaults,
            // so reconstructing one here loses nothing.
            None => Resolution {
                choice: String::new(),
                by_owner: false,
            },
        }
    }

    /// Resolve every overdue open session to its default and drop
    /// terminal entries. Returns how many sessions expired this pass.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut registry = self.lock();
        let mut expired = 0;
        for entry in registry.entries.values_mut() {
            if entry.status == Status::Open && entry.deadline <= now {
                let default = entry.default_choice.clone();
                entry.resolve(default, false);
                expired += 1;
            }
        }
        let terminal: Vec<Uuid> = registry
            .entries
            .iter()
            .filter(|(_, e)| matches!(e.status, Status::Resolved(_)) && e.deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in terminal {
            if let Some(entry) = registry.entries.remove(&id) {
                registry.index.remove(&(entry.owner, entry.kind));
            }
        }
        expired
    }

    /// Number of sessions currently held (live and recently terminal).
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chest_choices() -> Vec<String> {
        vec!["open".to_string(), "ignore".to_string()]
    }

    #[test]
    fn default_must_be_a_legal_choice() {
        let registry = SessionRegistry::new();
        let result = registry.open(
            "ana",
            FlowKind::ChestOpen,
            chest_choices(),
            "burn",
            Duration::seconds(30),
        );
        assert!(matches!(result, Err(GameError::InvalidChoice(_))));
    }

    #[test]
    fn one_live_session_per_owner_and_flow() {
        let registry = SessionRegistry::new();
        registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("first open");
        assert!(matches!(
            registry.open(
                "ana",
                FlowKind::ChestOpen,
                chest_choices(),
                "ignore",
                Duration::seconds(30)
            ),
            Err(GameError::SessionAlreadyOpen { .. })
        ));
        // A different flow for the same owner is fine.
        registry
            .open(
                "ana",
                FlowKind::Blackjack,
                vec!["hit".into(), "stand".into()],
                "stand",
                Duration::seconds(30),
            )
            .expect("different flow");
        // As is the same flow for a different owner.
        registry
            .open("beto", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("different owner");
    }

    #[test]
    fn lookup_routes_by_owner_and_flow() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("open");
        assert_eq!(registry.lookup("ana", FlowKind::ChestOpen), Some(handle));
        assert_eq!(registry.lookup("ana", FlowKind::Blackjack), None);
        assert_eq!(registry.lookup("beto", FlowKind::ChestOpen), None);
    }

    #[test]
    fn owner_submit_resolves() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("open");
        let outcome = registry.submit(handle, "ana", "open").expect("submit");
        assert_eq!(outcome, SubmitOutcome::Accepted);
        let resolution = registry.resolution(handle).expect("resolved");
        assert_eq!(resolution.choice, "open");
        assert!(resolution.by_owner);
    }

    #[test]
    fn non_owner_submit_is_silently_ignored() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("open");
        let outcome = registry.submit(handle, "beto", "open").expect("submit");
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(registry.resolution(handle).is_none());
    }

    #[test]
    fn double_submit_is_silently_ignored() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("open");
        registry.submit(handle, "ana", "open").expect("first");
        let outcome = registry.submit(handle, "ana", "ignore").expect("second");
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(registry.resolution(handle).unwrap().choice, "open");
    }

    #[test]
    fn illegal_choice_from_owner_is_a_validation_error() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("open");
        assert!(matches!(
            registry.submit(handle, "ana", "smash"),
            Err(GameError::InvalidChoice(_))
        ));
        assert!(registry.resolution(handle).is_none());
    }

    #[tokio::test]
    async fn expiry_yields_the_declared_default() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::milliseconds(30))
            .expect("open");
        let resolution = registry.await_resolution(handle).await.expect("await");
        assert_eq!(resolution.choice, "ignore");
        assert!(!resolution.by_owner);
    }

    #[tokio::test]
    async fn await_returns_owner_choice_when_submitted() {
        let registry = std::sync::Arc::new(SessionRegistry::new());
        let handle = registry
            .open("ana", FlowKind::Blackjack, vec!["hit".into(), "stand".into()], "stand", Duration::seconds(5))
            .expect("open");
        let waiter = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.await_resolution(handle).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        registry.submit(handle, "ana", "hit").expect("submit");
        let resolution = waiter.await.expect("join").expect("await");
        assert_eq!(resolution.choice, "hit");
        assert!(resolution.by_owner);
    }

    #[test]
    fn sweep_resolves_overdue_sessions_and_drops_terminal_ones() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(1))
            .expect("open");
        let later = Utc::now() + Duration::seconds(5);
        assert_eq!(registry.sweep_expired(later), 1);
        assert_eq!(registry.resolution(handle), None); // swept away entirely
        // The slot is free again.
        registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::seconds(30))
            .expect("reopen after sweep");
    }

    #[test]
    fn late_submit_lands_after_the_default() {
        let registry = SessionRegistry::new();
        let handle = registry
            .open("ana", FlowKind::ChestOpen, chest_choices(), "ignore", Duration::milliseconds(0))
            .expect("open");
        // Deadline already passed: the submit triggers expiry, then is
        // ignored.
        let outcome = registry.submit(handle, "ana", "open").expect("submit");
        assert_eq!(outcome, SubmitOutcome::Ignored);
        let resolution = registry.resolution(handle).expect("resolved");
        assert_eq!(resolution.choice, "ignore");
        assert!(!resolution.by_owner);
    }
}
