//! Per-test setup and teardown.
//!
//! WHY: Every API test needs a transport, a fresh headers manager and the
//! header configurators it declares, and the transport must be released
//! whatever the outcome of the test.
//!
//! WHAT: `ApiTestHarness` runs a test body with a ready `ApiTestClient`.
//!
//! HOW: An explicit ordered sequence per run:
//! 1. acquire a transport from the connector
//! 2. create a client with a fresh headers manager
//! 3. apply the declared configurators for all requests
//! 4. run the test body
//! 5. release the transport
//!
//! Step 5 is the client's `Drop`, so it also runs when step 3 fails or the
//! test body panics.

use crate::client::{ApiTestClient, ApiTestClientConfig, ReqwestTransport, Transport, TransportError};
use crate::headers::{ConfiguratorLocator, HeaderConfigurator};
use crate::ApiTestResult;

type Connector<T> = Box<dyn Fn() -> Result<T, TransportError>>;

/// Runs API tests against one entry point.
///
/// # Examples
///
/// ```rust
/// use foundation_apitest::client::{uri, RecordingTransport};
/// use foundation_apitest::harness::ApiTestHarness;
/// use foundation_apitest::headers::{BasicAuthConfiguration, HeaderConfiguration};
///
/// let transport = RecordingTransport::new();
/// let shared = transport.clone();
///
/// let mut harness = ApiTestHarness::with_connector("http://api.local", move || Ok(shared.connect()));
/// harness.register("admin", || {
///     vec![Box::new(BasicAuthConfiguration::new("admin", "pw")) as Box<dyn HeaderConfiguration>]
/// });
///
/// let status = harness
///     .try_run(&["admin"], |client| Ok(client.get(&uri("users"))?.status()))
///     .unwrap();
///
/// assert_eq!(status, 200);
/// assert!(transport.requests()[0].headers.contains("Authorization"));
/// assert_eq!(transport.close_calls(), 1);
/// ```
pub struct ApiTestHarness<T: Transport = ReqwestTransport> {
    entry_point: String,
    locator: ConfiguratorLocator,
    connector: Connector<T>,
}

impl<T: Transport> std::fmt::Debug for ApiTestHarness<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTestHarness")
            .field("entry_point", &self.entry_point)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl ApiTestHarness<ReqwestTransport> {
    /// Harness sending requests over HTTP with the given configuration.
    #[must_use]
    pub fn from_config(config: ApiTestClientConfig) -> Self {
        let entry_point = config.entry_point.clone();
        Self::with_connector(entry_point, move || ReqwestTransport::new(&config))
    }

    /// Harness configured from the environment.
    ///
    /// # Errors
    ///
    /// See [`ApiTestClientConfig::from_env`].
    pub fn from_env() -> ApiTestResult<Self> {
        Ok(Self::from_config(ApiTestClientConfig::from_env()?))
    }
}

impl<T: Transport> ApiTestHarness<T> {
    /// Harness acquiring a new transport from `connector` for every run.
    pub fn with_connector<F>(entry_point: impl Into<String>, connector: F) -> Self
    where
        F: Fn() -> Result<T, TransportError> + 'static,
    {
        Self {
            entry_point: entry_point.into(),
            locator: ConfiguratorLocator::new(),
            connector: Box::new(connector),
        }
    }

    #[must_use]
    pub fn with_locator(mut self, locator: ConfiguratorLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Registers a header configurator tests can declare by `key`.
    pub fn register<C>(&mut self, key: impl Into<String>, configurator: C)
    where
        C: HeaderConfigurator + 'static,
    {
        self.locator.register(key, configurator);
    }

    #[must_use]
    pub fn locator(&self) -> &ConfiguratorLocator {
        &self.locator
    }

    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Runs `test` with a client configured with the given configurators.
    ///
    /// # Errors
    ///
    /// Returns `ApiTestError::Transport` if no transport can be acquired and
    /// `ApiTestError::MissingConfigurator` for an unknown key. The test body
    /// is not run in either case.
    pub fn run<K, R, F>(&self, configurators: &[K], test: F) -> ApiTestResult<R>
    where
        K: AsRef<str>,
        F: FnOnce(&mut ApiTestClient<T>) -> R,
    {
        let transport = (self.connector)()?;
        let mut client = ApiTestClient::with_transport(self.entry_point.clone(), transport);

        self.locator.configure(configurators, client.headers_mut())?;

        tracing::debug!(
            "Running API test against {} with {} configurator(s)",
            self.entry_point,
            configurators.len()
        );
        let outcome = test(&mut client);
        client.close();

        Ok(outcome)
    }

    /// Like [`ApiTestHarness::run`] for test bodies that return a result.
    ///
    /// # Errors
    ///
    /// The setup errors of [`ApiTestHarness::run`] and the test body's own
    /// error.
    pub fn try_run<K, R, F>(&self, configurators: &[K], test: F) -> ApiTestResult<R>
    where
        K: AsRef<str>,
        F: FnOnce(&mut ApiTestClient<T>) -> ApiTestResult<R>,
    {
        self.run(configurators, test)?
    }
}
