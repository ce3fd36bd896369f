//! The canonical in-memory settings and their write-back to storage.
//!
//! A [`SettingsManager`] is the single writer of the settings key. Every
//! committed mutation is followed, before the mutator returns, by a write of
//! the full snapshot through [`codec::dump`]. Observers registered with
//! [`SettingsHandle::subscribe`] see the snapshot after it has been written.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use quill_store::DurableStore;
use tracing::{debug, warn};

use crate::codec;
use crate::config::SettingsConfig;
use crate::error::SettingsResult;
use crate::model::{SettingValue, Settings};

type Listener = Arc<dyn Fn(&Settings) + Send + Sync>;

/// Live record plus the last record the store accepted.
struct State {
    current: Settings,
    /// `None` until a write succeeds.
    persisted: Option<Settings>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Owns the live [`Settings`] for one provider scope.
pub struct SettingsManager {
    store: Arc<dyn DurableStore>,
    config: SettingsConfig,
    state: Mutex<State>,
    listeners: Mutex<Listeners>,
}

impl SettingsManager {
    /// Seed a manager from the store and write the seed back once.
    ///
    /// A failed read is logged and seeds from defaults. A failed write is
    /// returned.
    pub fn open(store: Arc<dyn DurableStore>, config: SettingsConfig) -> SettingsResult<SettingsHandle> {
        config.validate()?;

        let raw = match store.get(&config.storage_key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %config.storage_key, error = %e, "settings read failed, using defaults");
                None
            }
        };
        let seeded = config.apply_pin(codec::load(raw.as_deref()));
        debug!(key = %config.storage_key, found = raw.is_some(), "settings seeded");

        let manager = Self {
            store,
            config,
            state: Mutex::new(State {
                current: seeded,
                persisted: None,
            }),
            listeners: Mutex::new(Listeners::default()),
        };
        {
            let mut state = manager.state();
            let seeded = state.current.clone();
            manager.persist(&seeded)?;
            state.persisted = Some(seeded);
        }
        Ok(SettingsHandle {
            inner: Arc::new(manager),
        })
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    /// Copy of the full current record.
    pub fn snapshot(&self) -> Settings {
        self.state().current.clone()
    }

    pub fn theme(&self) -> String {
        self.state().current.theme.clone()
    }

    pub fn language(&self) -> String {
        self.state().current.language.clone()
    }

    pub fn font_size(&self) -> u32 {
        self.state().current.font_size
    }

    pub fn font_family(&self) -> String {
        self.state().current.font_family.clone()
    }

    pub fn show_github_corner(&self) -> bool {
        self.state().current.show_github_corner
    }

    pub fn set_theme(&self, theme: impl Into<String>) -> SettingsResult<()> {
        self.set(SettingValue::Theme(theme.into()))
    }

    /// Request a language change.
    ///
    /// While a pin is configured the request is accepted and discarded.
    pub fn set_language(&self, language: impl Into<String>) -> SettingsResult<()> {
        let language = language.into();
        if let Some(pinned) = &self.config.pinned_language {
            if *pinned != language {
                debug!(requested = %language, %pinned, "language is pinned, request discarded");
            }
        }
        self.set(SettingValue::Language(language))
    }

    pub fn set_font_size(&self, font_size: u32) -> SettingsResult<()> {
        self.set(SettingValue::FontSize(font_size))
    }

    pub fn set_font_family(&self, font_family: impl Into<String>) -> SettingsResult<()> {
        self.set(SettingValue::FontFamily(font_family.into()))
    }

    pub fn set_show_github_corner(&self, show: bool) -> SettingsResult<()> {
        self.set(SettingValue::ShowGitHubCorner(show))
    }

    /// Set the one field `value` names.
    pub fn set(&self, value: SettingValue) -> SettingsResult<()> {
        self.update(|s| s.apply(value)).map(|_| ())
    }

    /// Restore every field to its default, with the pin applied.
    pub fn reset(&self) -> SettingsResult<()> {
        self.update(|s| *s = Settings::default()).map(|_| ())
    }

    /// Apply `change` and persist the result once.
    ///
    /// `change` runs on a copy of the record with no lock held, so it may
    /// read this manager. Returns `Ok(false)` without writing when the
    /// pinned result equals both the current record and the last persisted
    /// one. On a failed write the in-memory record keeps the new value,
    /// observers are not notified, and the next mutation writes again.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> SettingsResult<bool> {
        let mut next = self.snapshot();
        change(&mut next);
        let next = self.config.apply_pin(next);

        {
            let mut state = self.state();
            if next == state.current && state.persisted.as_ref() == Some(&next) {
                return Ok(false);
            }
            state.current = next.clone();
            self.persist(&next)?;
            state.persisted = Some(next.clone());
        }
        self.notify(&next);
        Ok(true)
    }

    /// Returns `true` while the in-memory record differs from the last
    /// successful write.
    pub fn is_dirty(&self) -> bool {
        let state = self.state();
        state.persisted.as_ref() != Some(&state.current)
    }

    /// Write `settings` under the configured key.
    fn persist(&self, settings: &Settings) -> SettingsResult<()> {
        let raw = codec::dump(&self.config.apply_pin(settings.clone()));
        self.store.set(&self.config.storage_key, &raw)?;
        debug!(key = %self.config.storage_key, bytes = raw.len(), "settings persisted");
        Ok(())
    }

    fn notify(&self, snapshot: &Settings) {
        // Listeners run without any lock held so they may read the handle.
        let listeners: Vec<Listener> = self
            .listeners()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn add_listener(&self, listener: Listener) -> u64 {
        let mut listeners = self.listeners();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        id
    }

    fn remove_listener(&self, id: u64) {
        self.listeners().entries.retain(|(entry, _)| *entry != id);
    }

    // The record is only ever replaced whole, so a poisoned lock still
    // guards a complete value.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsManager")
            .field("config", &self.config)
            .field("state", &self.state().current)
            .field("listeners", &self.listeners().entries.len())
            .finish()
    }
}

/// Shared reference to a scope's [`SettingsManager`].
///
/// Clones refer to the same manager.
#[derive(Clone, Debug)]
pub struct SettingsHandle {
    inner: Arc<SettingsManager>,
}

impl SettingsHandle {
    /// Register `listener` to receive every committed snapshot.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = self.inner.add_listener(Arc::new(listener));
        Subscription {
            manager: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Returns `true` if both handles share one manager.
    pub fn same_manager(&self, other: &SettingsHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for SettingsHandle {
    type Target = SettingsManager;

    fn deref(&self) -> &SettingsManager {
        &self.inner
    }
}

/// Keeps a change listener registered.
#[must_use = "dropping a Subscription unregisters its listener"]
#[derive(Debug)]
pub struct Subscription {
    manager: Weak<SettingsManager>,
    id: u64,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.remove_listener(self.id);
        }
    }
}
