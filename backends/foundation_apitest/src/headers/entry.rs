//! Pending header operations.

use crate::client::RequestContext;
use crate::headers::ComputeHeaderValue;
use crate::HeaderComputeError;
use std::fmt;
use std::sync::Arc;

/// How an entry interacts with entries of the same name pending before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderOperation {
    /// Adds the header unless one of that name is already resolved.
    Set,
    /// Overwrites an already resolved header of that name.
    Replace,
    /// Drops an already resolved header of that name.
    Remove,
}

/// Lifetime of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderScope {
    /// Applied to the next request, then discarded.
    NextRequest,
    /// Applied to every remaining request of the test.
    AllRequests,
}

impl HeaderScope {
    #[must_use]
    pub fn from_all_requests(for_all_requests: bool) -> Self {
        if for_all_requests {
            HeaderScope::AllRequests
        } else {
            HeaderScope::NextRequest
        }
    }

    #[must_use]
    pub fn is_all_requests(&self) -> bool {
        matches!(self, HeaderScope::AllRequests)
    }
}

/// Value of an entry.
#[derive(Clone)]
pub enum HeaderValue {
    Literal(String),
    Computed(Arc<dyn ComputeHeaderValue>),
    /// Used by [`HeaderOperation::Remove`] entries.
    Absent,
}

impl fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => write!(f, "Computed(..)"),
            Self::Absent => write!(f, "Absent"),
        }
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Literal(value)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Literal(value.to_string())
    }
}

/// One pending header mutation.
///
/// Entries are immutable once built; the `with_*` methods return a new entry.
/// New entries target the next request until re-scoped.
#[derive(Debug, Clone)]
pub struct HeaderEntry {
    name: String,
    value: HeaderValue,
    operation: HeaderOperation,
    scope: HeaderScope,
}

impl HeaderEntry {
    fn build(name: impl Into<String>, value: HeaderValue, operation: HeaderOperation) -> Self {
        Self {
            name: name.into(),
            value,
            operation,
            scope: HeaderScope::NextRequest,
        }
    }

    /// Creates a SET entry.
    pub fn set(name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        Self::build(name, value.into(), HeaderOperation::Set)
    }

    /// Creates a SET entry whose value is computed at resolution time.
    pub fn computed<F>(name: impl Into<String>, computation: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> Result<String, HeaderComputeError> + Send + Sync + 'static,
    {
        Self::with_computation(name, computation)
    }

    /// Creates a SET entry from any [`ComputeHeaderValue`] implementation.
    pub fn with_computation<C>(name: impl Into<String>, computation: C) -> Self
    where
        C: ComputeHeaderValue + 'static,
    {
        Self::build(
            name,
            HeaderValue::Computed(Arc::new(computation)),
            HeaderOperation::Set,
        )
    }

    /// Creates a REPLACE entry.
    pub fn replace(name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        Self::build(name, value.into(), HeaderOperation::Replace)
    }

    /// Creates a REMOVE entry.
    pub fn remove(name: impl Into<String>) -> Self {
        Self::build(name, HeaderValue::Absent, HeaderOperation::Remove)
    }

    #[must_use]
    pub fn with_scope(mut self, scope: HeaderScope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns the same header with another operation. Turning an entry into
    /// a REMOVE discards its value.
    #[must_use]
    pub fn with_operation(mut self, operation: HeaderOperation) -> Self {
        if operation == HeaderOperation::Remove {
            self.value = HeaderValue::Absent;
        }
        self.operation = operation;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    #[must_use]
    pub fn operation(&self) -> HeaderOperation {
        self.operation
    }

    #[must_use]
    pub fn scope(&self) -> HeaderScope {
        self.scope
    }

    /// Key entries of the same header are grouped under.
    pub(crate) fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Returns the value to send for this entry, `None` for removals.
    ///
    /// # Errors
    ///
    /// Returns the computation's error, tagged with the header name.
    pub fn compute_value(
        &self,
        request: &RequestContext<'_>,
    ) -> Result<Option<String>, HeaderComputeError> {
        if self.operation == HeaderOperation::Remove {
            return Ok(None);
        }

        match &self.value {
            HeaderValue::Literal(value) => Ok(Some(value.clone())),
            HeaderValue::Computed(computation) => computation
                .compute(request)
                .map(Some)
                .map_err(|err| err.for_header(self.name.clone())),
            HeaderValue::Absent => Ok(None),
        }
    }
}
