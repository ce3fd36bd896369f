//! The access point: provider scopes and the context passed to consumers.
//!
//! Consumers never look settings up ambiently. A [`SettingsProvider`]
//! creates a [`ScopedSettings`], whose [`SettingsContext`] is handed down
//! explicitly. A context built outside any scope (`SettingsContext::default()`)
//! refuses every [`acquire`] with [`ScopeError::OutsideScope`].

use std::sync::Arc;

use quill_store::DurableStore;
use tracing::debug;

use crate::config::SettingsConfig;
use crate::error::{ScopeError, SettingsResult};
use crate::manager::{SettingsHandle, SettingsManager};

/// Builds settings scopes over one durable store.
#[derive(Clone)]
pub struct SettingsProvider {
    store: Arc<dyn DurableStore>,
    config: SettingsConfig,
}

impl SettingsProvider {
    /// Provider using the default configuration.
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_config(store, SettingsConfig::default())
    }

    pub fn with_config(store: Arc<dyn DurableStore>, config: SettingsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DurableStore> {
        &self.store
    }

    /// Open a new scope backed by a fresh [`SettingsManager`].
    ///
    /// Scopes are never deduplicated: two scopes over the same store hold
    /// independent managers that both write the same key, last write wins.
    pub fn create_scope(&self) -> SettingsResult<ScopedSettings> {
        let handle = SettingsManager::open(Arc::clone(&self.store), self.config.clone())?;
        debug!(key = %self.config.storage_key, "settings scope created");
        Ok(ScopedSettings { handle })
    }

    /// Open a scope, run `children` inside it, and close it.
    pub fn scoped<R>(&self, children: impl FnOnce(&SettingsContext) -> R) -> SettingsResult<R> {
        let scope = self.create_scope()?;
        Ok(scope.run(children))
    }
}

impl std::fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One live provider scope.
#[derive(Debug)]
pub struct ScopedSettings {
    handle: SettingsHandle,
}

impl ScopedSettings {
    /// The scope's handle.
    pub fn acquire(&self) -> SettingsHandle {
        self.handle.clone()
    }

    /// Context to pass to consumers inside this scope.
    pub fn context(&self) -> SettingsContext {
        SettingsContext {
            handle: Some(self.handle.clone()),
        }
    }

    /// Run `children` with this scope's context.
    pub fn run<R>(&self, children: impl FnOnce(&SettingsContext) -> R) -> R {
        children(&self.context())
    }
}

/// What a consumer receives in place of ambient lookup.
///
/// The default value stands for "no enclosing scope".
#[derive(Clone, Debug, Default)]
pub struct SettingsContext {
    handle: Option<SettingsHandle>,
}

impl SettingsContext {
    /// A context with no enclosing scope.
    pub fn outside() -> Self {
        Self::default()
    }

    /// Returns `true` if this context came from a provider scope.
    pub fn is_scoped(&self) -> bool {
        self.handle.is_some()
    }

    /// The live handle, or [`ScopeError::OutsideScope`].
    pub fn acquire(&self) -> Result<SettingsHandle, ScopeError> {
        self.handle.clone().ok_or(ScopeError::OutsideScope)
    }
}

/// Free-function form of [`SettingsContext::acquire`].
pub fn acquire(context: &SettingsContext) -> Result<SettingsHandle, ScopeError> {
    context.acquire()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_store::{FileStore, InMemoryStore};

    use crate::codec;
    use crate::error::SettingsError;
    use crate::model::Settings;

    fn provider() -> (Arc<InMemoryStore>, SettingsProvider) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), SettingsProvider::new(store))
    }

    /// A consumer that only knows the context it was given.
    fn bump_font(context: &SettingsContext) -> SettingsResult<u32> {
        let settings = acquire(context)?;
        settings.set_font_size(settings.font_size() + 2)?;
        Ok(settings.font_size())
    }

    #[test]
    fn acquire_outside_scope_fails_every_time() {
        let context = SettingsContext::default();
        for _ in 0..3 {
            assert_eq!(acquire(&context).unwrap_err(), ScopeError::OutsideScope);
        }
        assert!(!context.is_scoped());
        assert_eq!(
            SettingsContext::outside().acquire().unwrap_err(),
            ScopeError::OutsideScope
        );
    }

    #[test]
    fn consumer_outside_scope_gets_scope_error() {
        let err = bump_font(&SettingsContext::outside()).unwrap_err();
        assert!(matches!(err, SettingsError::Scope(ScopeError::OutsideScope)));
    }

    #[test]
    fn consumer_inside_scope_mutates_and_persists() {
        let (store, provider) = provider();
        let size = provider.scoped(bump_font).unwrap().unwrap();
        assert_eq!(size, 18);

        let persisted = codec::load(store.get("settings").unwrap().as_deref());
        assert_eq!(persisted.font_size, 18);
    }

    #[test]
    fn scope_handles_share_one_manager() {
        let (_store, provider) = provider();
        let scope = provider.create_scope().unwrap();
        let a = scope.acquire();
        let b = scope.context().acquire().unwrap();
        assert!(a.same_manager(&b));

        a.set_theme("Nord").unwrap();
        assert_eq!(b.theme(), "Nord");
    }

    #[test]
    fn nested_scopes_are_independent() {
        let (store, provider) = provider();
        let outer = provider.create_scope().unwrap();
        outer.acquire().set_theme("Nord").unwrap();

        let inner = provider.create_scope().unwrap();
        assert!(!outer.acquire().same_manager(&inner.acquire()));
        // The inner scope seeds from what the outer one persisted.
        assert_eq!(inner.acquire().theme(), "Nord");

        inner.acquire().set_theme("Ayu").unwrap();
        assert_eq!(outer.acquire().theme(), "Nord");
        assert_eq!(codec::load(store.get("settings").unwrap().as_deref()).theme, "Ayu");
    }

    #[test]
    fn language_is_pinned_through_the_access_point() {
        let store = Arc::new(InMemoryStore::with_entries([(
            "settings",
            r#"{"language":"Kotlin"}"#,
        )]));
        let provider = SettingsProvider::new(store.clone());
        provider
            .scoped(|ctx| {
                let settings = ctx.acquire().unwrap();
                assert_eq!(settings.language(), "Cpp");
                settings.set_language("Ruby").unwrap();
                assert_eq!(settings.language(), "Cpp");
            })
            .unwrap();
        assert_eq!(
            codec::load(store.get("settings").unwrap().as_deref()).language,
            "Cpp"
        );
    }

    #[test]
    fn reset_through_the_access_point() {
        let (_store, provider) = provider();
        let scope = provider.create_scope().unwrap();
        let settings = scope.acquire();
        settings.set_font_family("Hack").unwrap();
        settings.set_show_github_corner(false).unwrap();
        settings.reset().unwrap();
        assert_eq!(settings.snapshot(), Settings::default());
    }

    #[test]
    fn settings_survive_a_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.json");

        {
            let store = Arc::new(FileStore::open(&path).unwrap());
            let provider = SettingsProvider::new(store);
            let scope = provider.create_scope().unwrap();
            scope.acquire().set_font_size(24).unwrap();
            scope.acquire().set_theme("Solarized").unwrap();
        }

        let store = Arc::new(FileStore::open(&path).unwrap());
        let scope = SettingsProvider::new(store).create_scope().unwrap();
        let settings = scope.acquire();
        assert_eq!(settings.font_size(), 24);
        assert_eq!(settings.theme(), "Solarized");
        assert_eq!(settings.language(), "Cpp");
    }

    #[test]
    fn truncated_store_file_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.json");
        std::fs::write(&path, r#"{"settings": "#).unwrap();

        let store = Arc::new(FileStore::open(&path).unwrap());
        let scope = SettingsProvider::new(store).create_scope().unwrap();
        assert_eq!(scope.acquire().snapshot(), Settings::default());
        scope.acquire().set_font_size(20).unwrap();

        let reopened = FileStore::open_strict(&path).unwrap();
        let s = codec::load(reopened.get("settings").unwrap().as_deref());
        assert_eq!(s.font_size, 20);
    }

    #[test]
    fn invalid_config_fails_scope_creation() {
        let store = Arc::new(InMemoryStore::new());
        let provider =
            SettingsProvider::with_config(store, SettingsConfig::default().with_storage_key(""));
        let err = provider.create_scope().unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }
}
