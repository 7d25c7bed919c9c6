//! Lookup of header configurators declared by a test.
//!
//! WHY: Tests declare which header configurations they run with (e.g.
//! "basic-auth-admin") without building them by hand.
//!
//! WHAT: `ConfiguratorLocator` is an explicit registry from an opaque key to
//! a `HeaderConfigurator` producing one or more configurations.
//!
//! HOW: Consulted once per test, before the first request. Every requested
//! key is resolved before anything is applied, so a missing key fails the
//! test setup without touching the headers manager.

use crate::headers::{HeaderConfiguration, HeadersManager};
use crate::{ApiTestError, ApiTestResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces the header configurations of one configurator key.
pub trait HeaderConfigurator: Send + Sync {
    fn header_configurations(&self) -> Vec<Box<dyn HeaderConfiguration>>;
}

impl<F> HeaderConfigurator for F
where
    F: Fn() -> Vec<Box<dyn HeaderConfiguration>> + Send + Sync,
{
    fn header_configurations(&self) -> Vec<Box<dyn HeaderConfiguration>> {
        (self)()
    }
}

/// Registry of header configurators.
#[derive(Clone, Default)]
pub struct ConfiguratorLocator {
    registry: HashMap<String, Arc<dyn HeaderConfigurator>>,
}

impl fmt::Debug for ConfiguratorLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.registry.keys().collect();
        keys.sort();
        f.debug_struct("ConfiguratorLocator")
            .field("keys", &keys)
            .finish()
    }
}

impl ConfiguratorLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a configurator, replacing any registered under the same key.
    pub fn register<C>(&mut self, key: impl Into<String>, configurator: C)
    where
        C: HeaderConfigurator + 'static,
    {
        self.registry.insert(key.into(), Arc::new(configurator));
    }

    /// Builder form of [`ConfiguratorLocator::register`].
    #[must_use]
    pub fn with<C>(mut self, key: impl Into<String>, configurator: C) -> Self
    where
        C: HeaderConfigurator + 'static,
    {
        self.register(key, configurator);
        self
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    /// Returns the configurator registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::MissingConfigurator` if nothing is registered.
    pub fn locate(&self, key: &str) -> ApiTestResult<Arc<dyn HeaderConfigurator>> {
        self.registry
            .get(key)
            .cloned()
            .ok_or_else(|| ApiTestError::MissingConfigurator(key.to_string()))
    }

    /// Applies every configuration of the given configurators to `manager`
    /// for all requests, in key order then configuration order.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::MissingConfigurator` for the first unknown key;
    /// nothing is applied in that case.
    pub fn configure<K: AsRef<str>>(
        &self,
        keys: &[K],
        manager: &mut HeadersManager,
    ) -> ApiTestResult<()> {
        let configurators = keys
            .iter()
            .map(|key| self.locate(key.as_ref()))
            .collect::<ApiTestResult<Vec<_>>>()?;

        for (key, configurator) in keys.iter().zip(configurators) {
            tracing::debug!("Applying header configurator {}", key.as_ref());
            for configuration in configurator.header_configurations() {
                manager.apply_configuration(configuration.as_ref(), true);
            }
        }

        Ok(())
    }
}
