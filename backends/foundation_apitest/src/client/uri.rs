//! URI construction relative to the API entry point.
//!
//! WHY: Tests name resources by path elements (`users`, `42`) and query
//! parameters, while the entry point comes from configuration.
//!
//! WHAT: `ApiUriBuilder` collects path elements and query parameters and
//! builds the final `Url` against an entry point.
//!
//! HOW: The entry point is parsed with `url::Url` and every trailing empty
//! segment of its path is removed. Each path element is split on `/`, empty
//! pieces are dropped and the rest is appended as percent-encoded segments,
//! so the entry point and the elements are joined with exactly one `/`.
//! Elements are literal text: a `%` is encoded like any other character, so
//! `a%2Fb` names the segment `a%2Fb` and is sent as `a%252Fb`. `.` and `..`
//! pieces are rejected. Query parameters keep insertion order; a repeated
//! name overwrites the earlier value in place.

use crate::client::InvalidUri;
use url::Url;

/// Builder of request URIs relative to an entry point.
///
/// # Examples
///
/// ```rust
/// use foundation_apitest::client::ApiUriBuilder;
///
/// let url = ApiUriBuilder::new()
///     .path("/users/")
///     .path("42")
///     .query_param("expand", "roles")
///     .build("http://api.local/v1/")
///     .unwrap();
///
/// assert_eq!(url.as_str(), "http://api.local/v1/users/42?expand=roles");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiUriBuilder {
    path_elements: Vec<String>,
    query_params: Vec<(String, String)>,
}

impl ApiUriBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path element.
    #[must_use]
    pub fn path(mut self, element: impl Into<String>) -> Self {
        self.path_elements.push(element.into());
        self
    }

    /// Appends several path elements in order.
    #[must_use]
    pub fn paths<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path_elements
            .extend(elements.into_iter().map(Into::into));
        self
    }

    /// Adds a query parameter, overwriting an earlier one of the same name.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();

        match self
            .query_params
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some(param) => param.1 = value,
            None => self.query_params.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn path_elements(&self) -> &[String] {
        &self.path_elements
    }

    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Builds the URI against `entry_point`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUri` if the entry point is empty, cannot be parsed or
    /// cannot carry path elements (e.g. `mailto:`), or if a path element holds
    /// a `.` or `..` segment.
    pub fn build(&self, entry_point: &str) -> Result<Url, InvalidUri> {
        let entry_point = entry_point.trim();
        if entry_point.is_empty() {
            return Err(InvalidUri::new("empty entry point"));
        }

        let mut url = Url::parse(entry_point)
            .map_err(|err| InvalidUri::new(format!("{entry_point}: {err}")))?;

        let trailing_empty = url
            .path_segments()
            .map(|segments| {
                segments
                    .rev()
                    .take_while(|segment| segment.is_empty())
                    .count()
            })
            .ok_or_else(|| {
                InvalidUri::new(format!("{entry_point}: entry point cannot carry a path"))
            })?;
        let pieces = self.path_pieces()?;

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                InvalidUri::new(format!("{entry_point}: entry point cannot carry a path"))
            })?;
            for _ in 0..trailing_empty {
                segments.pop();
            }
            segments.extend(pieces);
        }

        if !self.query_params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &self.query_params {
                query.append_pair(name, value);
            }
        }

        Ok(url)
    }

    fn path_pieces(&self) -> Result<Vec<&str>, InvalidUri> {
        let mut pieces = Vec::new();
        for element in &self.path_elements {
            for piece in element.split('/').filter(|piece| !piece.is_empty()) {
                if piece == "." || piece == ".." {
                    return Err(InvalidUri::new(format!(
                        "{element}: dot segments are not allowed in path elements"
                    )));
                }
                pieces.push(piece);
            }
        }
        Ok(pieces)
    }
}

/// Builder holding one path element.
#[must_use]
pub fn uri(path: impl Into<String>) -> ApiUriBuilder {
    ApiUriBuilder::new().path(path)
}

/// Builder holding the given path elements.
#[must_use]
pub fn uri_from<I, S>(elements: I) -> ApiUriBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ApiUriBuilder::new().paths(elements)
}
