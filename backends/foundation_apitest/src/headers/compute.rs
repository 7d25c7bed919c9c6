//! Header values computed from the request being prepared.
//!
//! WHY: Some headers (signatures, timestamps, digests) can only be known
//! once the method, URL and body of the request are fixed.
//!
//! WHAT: `ComputeHeaderValue` is invoked by the headers manager during
//! resolution, once per request the header is sent with.
//!
//! HOW: Computations run in resolution order and receive a `RequestContext`
//! holding every header resolved before them. A computation must not rely on
//! headers that resolve after it.

use crate::client::RequestContext;
use crate::HeaderComputeError;

/// Produces a header value for the request being prepared.
///
/// Implementations should be pure: the same request yields the same value
/// unless the value is time based by nature.
pub trait ComputeHeaderValue: Send + Sync {
    /// Computes the header value.
    ///
    /// # Errors
    ///
    /// Any error aborts the request the header was being resolved for.
    fn compute(&self, request: &RequestContext<'_>) -> Result<String, HeaderComputeError>;
}

impl<F> ComputeHeaderValue for F
where
    F: Fn(&RequestContext<'_>) -> Result<String, HeaderComputeError> + Send + Sync,
{
    fn compute(&self, request: &RequestContext<'_>) -> Result<String, HeaderComputeError> {
        (self)(request)
    }
}
