//! Per-test owner of pending header operations.
//!
//! WHY: Test code sets headers for one call or for the rest of a test, and
//! the client needs the exact header set of each request right before it is
//! sent.
//!
//! WHAT: `HeadersManager` records operations, resolves them for the next
//! request and keeps what must apply to the requests after it.
//!
//! HOW: Resolution runs the pure [`resolve`] fold, computes the value of every
//! winning entry and only then swaps the pending state for the carried-forward
//! one. A failing computation leaves the pending state as it was.

use crate::client::{ApiRequest, RequestContext};
use crate::headers::{
    resolve, HeaderConfiguration, HeaderEntry, HeaderOperation, HeaderScope, PendingHeaders,
};
use crate::HeaderComputeError;

/// Manager of request headers for one test.
///
/// One manager per test; it is never shared between tests or threads.
#[derive(Debug, Default)]
pub struct HeadersManager {
    pending: PendingHeaders,
}

impl HeadersManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header for the next request or for all requests.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>, for_all_requests: bool) {
        self.register(HeaderEntry::set(name, value.into()), for_all_requests);
    }

    /// Sets a header whose value is computed from each request it is sent with.
    pub fn set_computed<F>(&mut self, name: impl Into<String>, computation: F, for_all_requests: bool)
    where
        F: Fn(&RequestContext<'_>) -> Result<String, HeaderComputeError> + Send + Sync + 'static,
    {
        self.register(HeaderEntry::computed(name, computation), for_all_requests);
    }

    /// Replaces a header. Ignored if no header of that name is pending.
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        for_all_requests: bool,
    ) {
        self.register(HeaderEntry::replace(name, value.into()), for_all_requests);
    }

    /// Removes a header. Ignored if no header of that name is pending.
    pub fn remove(&mut self, name: impl Into<String>, for_all_requests: bool) {
        self.register(HeaderEntry::remove(name), for_all_requests);
    }

    /// Registers an entry with the given scope.
    ///
    /// REPLACE and REMOVE entries are dropped when nothing of that name is
    /// pending, since they could not affect any request.
    pub fn register(&mut self, entry: HeaderEntry, for_all_requests: bool) {
        let entry = entry.with_scope(HeaderScope::from_all_requests(for_all_requests));

        if entry.operation() != HeaderOperation::Set && !self.pending.contains(entry.name()) {
            tracing::debug!(
                "Ignoring {:?} of header {} with nothing pending under that name",
                entry.operation(),
                entry.name()
            );
            return;
        }

        tracing::debug!(
            "Registering {:?} of header {} for {:?}",
            entry.operation(),
            entry.name(),
            entry.scope()
        );
        self.pending.push(entry);
    }

    /// Registers every entry of a configuration with one scope.
    pub fn apply_configuration(
        &mut self,
        configuration: &dyn HeaderConfiguration,
        for_all_requests: bool,
    ) {
        tracing::debug!(
            "Applying header configuration {} (all requests: {for_all_requests})",
            configuration.name()
        );
        for entry in configuration.header_operations() {
            self.register(entry, for_all_requests);
        }
    }

    /// Registers every entry of a configuration with one forced operation,
    /// e.g. to remove all headers of a bundle for the next request.
    pub fn apply_configuration_as(
        &mut self,
        configuration: &dyn HeaderConfiguration,
        operation: HeaderOperation,
        for_all_requests: bool,
    ) {
        tracing::debug!(
            "Applying header configuration {} as {operation:?} (all requests: {for_all_requests})",
            configuration.name()
        );
        for entry in configuration.header_operations() {
            self.register(entry.with_operation(operation), for_all_requests);
        }
    }

    /// Returns the headers to apply to the next request, in resolution order.
    ///
    /// Each computed header sees the request's own headers plus every header
    /// resolved before it. Next-request operations are consumed; all-requests
    /// operations stay pending.
    ///
    /// # Errors
    ///
    /// Returns the first failing computation. The pending state is then left
    /// untouched.
    pub fn resolve_for_next_request(
        &mut self,
        request: &ApiRequest,
    ) -> Result<Vec<(String, String)>, HeaderComputeError> {
        let resolution = resolve(&self.pending);

        let mut so_far = request.headers().clone();
        let mut headers = Vec::with_capacity(resolution.resolved.len());
        for entry in &resolution.resolved {
            let value = entry.compute_value(&request.context_with(&so_far))?;
            if let Some(value) = value {
                so_far.set(entry.name(), value.clone());
                headers.push((entry.name().to_string(), value));
            }
        }

        tracing::debug!(
            "Resolved {} header(s), {} operation(s) kept for later requests",
            headers.len(),
            resolution.carry_forward.len()
        );
        self.pending = resolution.carry_forward;
        Ok(headers)
    }

    /// Resolves the headers of the next request and sets them on `request`,
    /// overwriting headers of the same name.
    ///
    /// # Errors
    ///
    /// See [`HeadersManager::resolve_for_next_request`].
    pub fn configure_request(&mut self, request: &mut ApiRequest) -> Result<(), HeaderComputeError> {
        for (name, value) in self.resolve_for_next_request(request)? {
            request.set_header(name, value);
        }
        Ok(())
    }

    #[must_use]
    pub fn pending(&self) -> &PendingHeaders {
        &self.pending
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use crate::client::Method;
    use crate::headers::PendingGroup;
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use url::Url;

    const NAMES: [&str; 4] = ["X-A", "x-a", "X-B", "X-C"];
    const OPERATIONS: [HeaderOperation; 3] = [
        HeaderOperation::Set,
        HeaderOperation::Replace,
        HeaderOperation::Remove,
    ];

    #[derive(Debug, Clone)]
    struct Op {
        name: &'static str,
        operation: HeaderOperation,
        value: u8,
        all: bool,
    }

    impl Arbitrary for Op {
        fn arbitrary(g: &mut Gen) -> Self {
            Op {
                name: g.choose(&NAMES).copied().unwrap_or("X-A"),
                operation: g
                    .choose(&OPERATIONS)
                    .copied()
                    .unwrap_or(HeaderOperation::Set),
                value: u8::arbitrary(g),
                all: bool::arbitrary(g),
            }
        }
    }

    fn apply(manager: &mut HeadersManager, op: &Op) {
        let value = op.value.to_string();
        match op.operation {
            HeaderOperation::Set => manager.set(op.name, value, op.all),
            HeaderOperation::Replace => manager.replace(op.name, value, op.all),
            HeaderOperation::Remove => manager.remove(op.name, op.all),
        }
    }

    fn manager_with(ops: &[Op]) -> HeadersManager {
        let mut manager = HeadersManager::new();
        for op in ops {
            apply(&mut manager, op);
        }
        manager
    }

    fn resolve_once(manager: &mut HeadersManager) -> Vec<(String, String)> {
        let request = ApiRequest::new(Method::Get, Url::parse("http://api.local/").unwrap());
        manager
            .resolve_for_next_request(&request)
            .unwrap()
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect()
    }

    // Reference model: registration guard plus the per-name fold.
    fn model_pending(ops: &[Op]) -> Vec<Op> {
        let mut pending: Vec<Op> = Vec::new();
        for op in ops {
            let known = pending
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(op.name));
            if op.operation == HeaderOperation::Set || known {
                pending.push(op.clone());
            }
        }
        pending
    }

    fn model_resolve(pending: &[Op]) -> Vec<(String, String)> {
        let mut order: Vec<String> = Vec::new();
        for op in pending {
            let key = op.name.to_ascii_lowercase();
            if !order.contains(&key) {
                order.push(key);
            }
        }

        order
            .into_iter()
            .filter_map(|key| {
                let mut current = None;
                for op in pending.iter().filter(|op| op.name.eq_ignore_ascii_case(&key)) {
                    current = match (op.operation, current) {
                        (HeaderOperation::Set, None) | (HeaderOperation::Replace, Some(_)) => {
                            Some(op.value)
                        }
                        (HeaderOperation::Set, Some(winner)) => Some(winner),
                        (HeaderOperation::Replace, None) | (HeaderOperation::Remove, _) => None,
                    };
                }
                current.map(|value| (key, value.to_string()))
            })
            .collect()
    }

    fn all_requests_only(pending: &[Op]) -> Vec<Op> {
        pending.iter().filter(|op| op.all).cloned().collect()
    }

    quickcheck! {
        fn resolution_follows_the_fold(ops: Vec<Op>) -> bool {
            let mut manager = manager_with(&ops);
            let pending = model_pending(&ops);
            let kept = all_requests_only(&pending);

            let first = resolve_once(&mut manager);
            let second = resolve_once(&mut manager);
            let third = resolve_once(&mut manager);

            first == model_resolve(&pending)
                && second == model_resolve(&kept)
                && third == second
        }

        fn next_request_entries_never_survive(ops: Vec<Op>) -> bool {
            let mut manager = manager_with(&ops);
            let kept = all_requests_only(&model_pending(&ops)).len();

            resolve_once(&mut manager);
            let after_one = manager.pending().len();
            let only_all_requests = manager
                .pending()
                .groups()
                .flat_map(PendingGroup::entries)
                .all(|entry| entry.scope().is_all_requests());

            resolve_once(&mut manager);
            only_all_requests && after_one == kept && manager.pending().len() == kept
        }

        fn replace_and_remove_alone_do_nothing(ops: Vec<Op>) -> bool {
            let mut manager = HeadersManager::new();
            for op in ops.iter().filter(|op| op.operation != HeaderOperation::Set) {
                apply(&mut manager, op);
            }

            manager.is_empty() && resolve_once(&mut manager).is_empty() && manager.is_empty()
        }
    }
}
