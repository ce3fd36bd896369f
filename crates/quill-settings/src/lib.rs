//! Scoped, persisted user preferences for the Quill editor.
//!
//! Three copies of the settings exist at runtime: the record in the
//! durable store, the live record owned by a [`SettingsManager`], and what
//! consumers observe through a [`SettingsHandle`]. This crate keeps them in
//! step: the manager alone writes the store, and every committed mutation is
//! written back before the mutator returns.
//!
//! # Modules
//!
//! - [`model`] -- The [`Settings`] record, its fields and defaults
//! - [`codec`] -- `load`/`dump` between the persisted string and [`Settings`]
//! - [`config`] -- [`SettingsConfig`]: storage key and the language pin
//! - [`manager`] -- [`SettingsManager`], [`SettingsHandle`], change subscriptions
//! - [`provider`] -- [`SettingsProvider`] scopes and the [`SettingsContext`] access point
//! - [`error`] -- [`SettingsError`] and [`ScopeError`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_settings::{acquire, SettingsContext, SettingsProvider};
//! use quill_store::InMemoryStore;
//!
//! let provider = SettingsProvider::new(Arc::new(InMemoryStore::new()));
//! let size = provider
//!     .scoped(|ctx| {
//!         let settings = acquire(ctx).unwrap();
//!         settings.set_font_size(24).unwrap();
//!         settings.font_size()
//!     })
//!     .unwrap();
//! assert_eq!(size, 24);
//!
//! assert!(acquire(&SettingsContext::default()).is_err());
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod provider;

pub use config::{SettingsConfig, DEFAULT_STORAGE_KEY};
pub use error::{ScopeError, SettingsError, SettingsResult};
pub use manager::{SettingsHandle, SettingsManager, Subscription};
pub use model::{SettingField, SettingValue, Settings};
pub use provider::{acquire, ScopedSettings, SettingsContext, SettingsProvider};
