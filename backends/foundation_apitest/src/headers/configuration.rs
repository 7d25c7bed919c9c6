//! Named, reusable bundles of header operations.

use crate::client::RequestContext;
use crate::headers::HeaderEntry;
use crate::HeaderComputeError;

/// Bundle of header operations applied together through a
/// [`HeadersManager`](crate::headers::HeadersManager).
///
/// The scope is chosen by whoever applies the bundle, so the same bundle can
/// seed a whole test or override a single call.
pub trait HeaderConfiguration {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Ordered header operations of this bundle.
    fn header_operations(&self) -> Vec<HeaderEntry>;
}

/// Builder-style [`HeaderConfiguration`].
///
/// # Examples
///
/// ```rust
/// use foundation_apitest::headers::{HeaderBundle, HeaderConfiguration};
///
/// let bundle = HeaderBundle::new("tracing")
///     .set("X-Request-Source", "api-tests")
///     .remove("X-Debug");
///
/// assert_eq!(bundle.header_operations().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeaderBundle {
    name: String,
    entries: Vec<HeaderEntry>,
}

impl HeaderBundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn set(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entry(HeaderEntry::set(name, value.into()))
    }

    #[must_use]
    pub fn computed<F>(self, name: impl Into<String>, computation: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> Result<String, HeaderComputeError> + Send + Sync + 'static,
    {
        self.entry(HeaderEntry::computed(name, computation))
    }

    #[must_use]
    pub fn replace(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entry(HeaderEntry::replace(name, value.into()))
    }

    #[must_use]
    pub fn remove(self, name: impl Into<String>) -> Self {
        self.entry(HeaderEntry::remove(name))
    }

    #[must_use]
    pub fn entry(mut self, entry: HeaderEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl HeaderConfiguration for HeaderBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn header_operations(&self) -> Vec<HeaderEntry> {
        self.entries.clone()
    }
}

impl<T: HeaderConfiguration + ?Sized> HeaderConfiguration for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn header_operations(&self) -> Vec<HeaderEntry> {
        (**self).header_operations()
    }
}
