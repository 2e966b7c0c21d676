//! Link-header pagination for provider list endpoints
//!
//! Providers such as GitLab and GitHub page their list endpoints and
//! advertise the continuation through an RFC 8288 `Link` response header:
//!
//! ```text
//! Link: <https://gitlab.example.com/api/v4/groups?page=2>; rel="next",
//!       <https://gitlab.example.com/api/v4/groups?page=5>; rel="last"
//! ```
//!
//! The continuation URL is opaque. The caller never builds page numbers
//! itself; it only follows the `next` relation until it disappears.

use std::future::Future;

use reqwest::header::{HeaderMap, LINK};
use thiserror::Error;
use url::Url;

use crate::error::{GateError, GateResult};

// ---------------------------------------------------------------------------
// Link header parsing (RFC 8288)
// ---------------------------------------------------------------------------

/// A single `<target>; rel="..."` entry of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    /// Target URI reference, exactly as written between `<` and `>`
    pub target: String,
    /// Relation types, lowercased
    pub relations: Vec<String>,
}

impl LinkValue {
    /// Returns true when this link carries the given relation type.
    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations
            .iter()
            .any(|r| r.eq_ignore_ascii_case(relation))
    }
}

/// Error raised for a `Link` header that is present but cannot be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The header value does not follow the `<target>; param` grammar
    #[error("malformed Link header {value:?}: {reason}")]
    Malformed { value: String, reason: String },

    /// The `next` target is not a valid URI reference
    #[error("invalid next link {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
}

/// Parses the value of a `Link` header into its link entries.
///
/// An empty value holds no links. Any entry that does not start with a
/// `<target>` or whose parameters do not follow the target with `;` makes
/// the whole value malformed.
///
/// # Examples
///
/// ```
/// use authgate::pagination::parse_link_header;
///
/// let links = parse_link_header(r#"<https://x/groups?page=2>; rel="next", <https://x/groups?page=9>; rel="last""#).unwrap();
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].target, "https://x/groups?page=2");
/// assert!(links[0].has_relation("next"));
/// assert!(links[1].has_relation("last"));
///
/// assert!(parse_link_header("https://x/groups?page=2; rel=next").is_err());
/// ```
pub fn parse_link_header(value: &str) -> Result<Vec<LinkValue>, LinkError> {
    let malformed = |reason: &str| LinkError::Malformed {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut links = Vec::new();
    let mut rest = value;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let after_open = rest
            .strip_prefix('<')
            .ok_or_else(|| malformed("entry does not start with '<'"))?;
        let close = after_open
            .find('>')
            .ok_or_else(|| malformed("unterminated '<' target"))?;

        let target = after_open[..close].trim().to_string();
        let (params, remainder) = split_link_params(&after_open[close + 1..])
            .ok_or_else(|| malformed("unterminated quoted string"))?;
        let params = params.trim();
        if !params.is_empty() && !params.starts_with(';') {
            return Err(malformed("parameters must follow the target with ';'"));
        }
        rest = remainder;

        links.push(LinkValue {
            target,
            relations: relation_types(params),
        });
    }

    Ok(links)
}

/// Splits off the parameter section of one link entry, up to the next comma
/// that is not inside a quoted string. `None` if a quote is left open.
fn split_link_params(input: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (idx, ch) in input.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some((&input[..idx], &input[idx + 1..])),
            _ => {}
        }
    }
    (!in_quotes).then_some((input, ""))
}

fn relation_types(params: &str) -> Vec<String> {
    params
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            if name.trim().eq_ignore_ascii_case("rel") {
                Some(value.trim().trim_matches('"'))
            } else {
                None
            }
        })
        .flat_map(str::split_whitespace)
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Parses every `Link` header line of a response.
///
/// Header bytes outside ASCII are decoded lossily rather than dropped, so a
/// `title="café"` parameter does not hide the line's `next` relation.
pub fn links_from_headers(headers: &HeaderMap) -> Result<Vec<LinkValue>, LinkError> {
    let mut links = Vec::new();
    for value in headers.get_all(LINK) {
        links.extend(parse_link_header(&String::from_utf8_lossy(
            value.as_bytes(),
        ))?);
    }
    Ok(links)
}

/// Finds the `next` target among a response's `Link` headers.
///
/// # Errors
///
/// Returns [`LinkError::Malformed`] when any `Link` line cannot be parsed.
pub fn try_next_page(headers: &HeaderMap) -> Result<Option<String>, LinkError> {
    Ok(links_from_headers(headers)?
        .into_iter()
        .find(|link| link.has_relation("next"))
        .map(|link| link.target))
}

/// Extracts the `next` page URL from a response's headers.
///
/// Returns `(url, true)` when any `Link` header line carries a `next`
/// relation and `(String::new(), false)` otherwise. Other relations such as
/// `first`, `prev`, or `last` are ignored. A malformed header also reads as
/// `(String::new(), false)`; page walks go through [`Cursor::from_headers`],
/// which reports it instead.
///
/// # Examples
///
/// ```
/// use reqwest::header::{HeaderMap, HeaderValue, LINK};
/// use authgate::pagination::next_page;
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(next_page(&headers), (String::new(), false));
///
/// headers.insert(LINK, HeaderValue::from_static(r#"<https://x/groups?page=2>; rel="next""#));
/// assert_eq!(next_page(&headers), ("https://x/groups?page=2".to_string(), true));
/// ```
pub fn next_page(headers: &HeaderMap) -> (String, bool) {
    match try_next_page(headers) {
        Ok(Some(target)) => (target, true),
        _ => (String::new(), false),
    }
}

// ---------------------------------------------------------------------------
// Cursor and page folding
// ---------------------------------------------------------------------------

/// Continuation state of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// No further pages
    Done,
    /// The next page lives at this URL
    Next(Url),
}

impl Cursor {
    /// Builds the cursor for the page after `current` from its response headers.
    ///
    /// Relative `next` targets are resolved against `current`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] when a `Link` header is present but malformed,
    /// or when the `next` target is not a valid URI reference.
    pub fn from_headers(headers: &HeaderMap, current: &Url) -> Result<Self, LinkError> {
        match try_next_page(headers)? {
            Some(target) => current
                .join(&target)
                .map(Cursor::Next)
                .map_err(|source| LinkError::InvalidTarget { target, source }),
            None => Ok(Cursor::Done),
        }
    }

    pub fn url(&self) -> Option<&Url> {
        match self {
            Cursor::Done => None,
            Cursor::Next(url) => Some(url),
        }
    }
}

/// One fetched page: its decoded items and where to go next
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Cursor,
}

impl<T> Page<T> {
    /// A page with no continuation
    #[cfg(test)]
    pub(crate) fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next: Cursor::Done,
        }
    }
}

/// Follows a paginated listing from `start` until the cursor is exhausted.
///
/// `fetch` is called strictly in sequence with the 1-based page number and
/// the page URL. Items are appended in page-arrival order. The first error
/// aborts the walk and everything gathered so far is discarded.
///
/// # Errors
///
/// Propagates the first error returned by `fetch`. Returns
/// [`GateError::GroupFetchFailed`] when more than `max_pages` pages are
/// announced, or when a page names itself as its own successor.
pub async fn collect_pages<T, F, Fut>(
    start: Url,
    max_pages: usize,
    mut fetch: F,
) -> GateResult<Vec<T>>
where
    F: FnMut(usize, Url) -> Fut,
    Fut: Future<Output = GateResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = Cursor::Next(start);
    let mut page = 0;

    while let Cursor::Next(url) = cursor {
        page += 1;
        if page > max_pages {
            return Err(GateError::GroupFetchFailed {
                page,
                reason: format!("provider announced more than {max_pages} pages"),
            });
        }

        let fetched = fetch(page, url.clone()).await?;
        items.extend(fetched.items);

        if fetched.next.url() == Some(&url) {
            return Err(GateError::GroupFetchFailed {
                page,
                reason: format!("next link points back at {url}"),
            });
        }
        cursor = fetched.next;
    }

    tracing::debug!("Collected {} items over {} pages", items.len(), page);
    Ok(items)
}
