use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::common::errors::{CoreError, CoreResult};

pub const DEFAULT_PAGE_SIZE: u64 = 100;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Opaque list-position token: a JSON envelope (`{"offset": N}`) wrapped in
/// base64. Unknown envelope fields are ignored on decode so that tokens from
/// newer deployments keep decoding here; a missing `offset` is a valid decode
/// meaning "no offset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl Cursor {
    #[must_use]
    pub fn at(offset: u64) -> Self {
        Cursor {
            offset: Some(offset),
        }
    }

    #[must_use]
    pub fn encode(&self) -> String {
        let payload = serde_json::to_vec(self).expect("cursor envelope always serializes");
        BASE64.encode(payload)
    }

    pub fn decode(token: &str) -> CoreResult<Self> {
        let bytes = BASE64
            .decode(token)
            .map_err(|_| CoreError::malformed_cursor(token))?;
        serde_json::from_slice(&bytes).map_err(|_| CoreError::malformed_cursor(token))
    }
}

/// Caller-supplied page request: `first` caps the page length, `after` is a
/// cursor returned by a previous page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub first: Option<u64>,
    pub after: Option<String>,
}

impl Page {
    #[must_use]
    pub fn with_first(first: u64) -> Self {
        Page {
            first: Some(first),
            after: None,
        }
    }

    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Number of items to skip, decoded from the `after` cursor.
    pub fn offset(&self) -> CoreResult<u64> {
        match &self.after {
            Some(token) => Ok(Cursor::decode(token)?.offset.unwrap_or(0)),
            None => Ok(0),
        }
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.first.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

/// One page of an ordered result set with its boundary flags. Each edge's
/// cursor encodes the 1-based absolute position of that item, so paging
/// "after" the cursor of item N resumes at item N+1.
#[derive(Debug, Clone, Serialize)]
pub struct Connection<T> {
    pub items: Vec<T>,
    pub edges: Vec<Edge<T>>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T: Clone> Connection<T> {
    /// Build a page from a window of `limit + 1` rows fetched at `offset`
    /// from an already-totally-ordered query. The extra row only proves that
    /// another page exists; it is not returned.
    ///
    /// Pagination never sorts: the caller is responsible for ordering by a
    /// unique total-order key before slicing the window.
    #[must_use]
    pub fn from_window(window: Vec<T>, offset: u64, limit: u64) -> Self {
        let has_next_page = window.len() as u64 > limit;
        let mut items = window;
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        let edges = items
            .iter()
            .enumerate()
            .map(|(i, node)| Edge {
                cursor: Cursor::at(offset + i as u64 + 1).encode(),
                node: node.clone(),
            })
            .collect();
        Connection {
            items,
            edges,
            has_next_page,
            has_previous_page: offset > 0,
        }
    }
}

/// Paginate an in-memory, already-ordered collection. Listing services
/// normally push `offset`/`limit + 1` down to the database and call
/// [`Connection::from_window`] directly; this is the same computation for
/// callers that hold the full result set.
pub fn paginate<T: Clone>(items: &[T], page: &Page) -> CoreResult<Connection<T>> {
    let offset = page.offset()?;
    let limit = page.limit();
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(items.len());
    let window_len = usize::try_from(limit).unwrap_or(usize::MAX).saturating_add(1);
    let end = start.saturating_add(window_len).min(items.len());
    Ok(Connection::from_window(
        items[start..end].to_vec(),
        offset,
        limit,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(41)]
    #[case(1_000_000)]
    fn cursor_round_trips(#[case] offset: u64) {
        let token = Cursor::at(offset).encode();
        let decoded = Cursor::decode(&token).unwrap();
        assert_eq!(decoded.offset, Some(offset));
    }

    #[rstest]
    #[case("not base64 at all!!")]
    #[case("AAAA")] // valid base64, not JSON
    #[case("")]
    fn malformed_tokens_are_rejected(#[case] token: &str) {
        assert!(matches!(
            Cursor::decode(token),
            Err(CoreError::MalformedCursor { .. })
        ));
    }

    #[test]
    fn wrong_envelope_shape_is_rejected() {
        let token = BASE64.encode(b"[1,2,3]");
        assert!(Cursor::decode(&token).is_err());
        let token = BASE64.encode(br#"{"offset":"three"}"#);
        assert!(Cursor::decode(&token).is_err());
    }

    #[test]
    fn empty_envelope_decodes_as_no_offset() {
        let token = BASE64.encode(b"{}");
        assert_eq!(Cursor::decode(&token).unwrap().offset, None);
    }

    #[test]
    fn unknown_envelope_fields_are_ignored() {
        let token = BASE64.encode(br#"{"offset":3,"shard":"eu-west"}"#);
        assert_eq!(Cursor::decode(&token).unwrap().offset, Some(3));
    }

    #[test]
    fn page_limit_defaults_and_caps() {
        assert_eq!(Page::default().limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Page::with_first(10_000).limit(), MAX_PAGE_SIZE);
        assert_eq!(Page::with_first(2).limit(), 2);
    }

    #[test]
    fn boundary_flags_across_three_pages() {
        let items: Vec<i32> = vec![1, 2, 3, 4, 5];

        let first = paginate(&items, &Page::with_first(2)).unwrap();
        assert_eq!(first.items, vec![1, 2]);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let second = paginate(
            &items,
            &Page::with_first(2).after(first.edges.last().unwrap().cursor.clone()),
        )
        .unwrap();
        assert_eq!(second.items, vec![3, 4]);
        assert!(second.has_next_page);
        assert!(second.has_previous_page);

        let third = paginate(
            &items,
            &Page::with_first(2).after(second.edges.last().unwrap().cursor.clone()),
        )
        .unwrap();
        assert_eq!(third.items, vec![5]);
        assert!(!third.has_next_page);
        assert!(third.has_previous_page);
    }

    #[test]
    fn edge_cursors_encode_one_based_positions() {
        let connection = paginate(&["a", "b", "c"], &Page::with_first(2)).unwrap();
        let positions: Vec<Option<u64>> = connection
            .edges
            .iter()
            .map(|edge| Cursor::decode(&edge.cursor).unwrap().offset)
            .collect();
        assert_eq!(positions, vec![Some(1), Some(2)]);
    }

    #[test]
    fn offset_past_the_end_yields_empty_page() {
        let items = vec![1, 2, 3];
        let page = Page::with_first(2).after(Cursor::at(10).encode());
        let connection = paginate(&items, &page).unwrap();
        assert!(connection.items.is_empty());
        assert!(!connection.has_next_page);
        assert!(connection.has_previous_page);
    }
}
