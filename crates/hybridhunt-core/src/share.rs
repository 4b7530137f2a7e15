//! Shareable deal selections of the form `ids=1,2,3&user=abcd1234`.

use crate::catalog::RecordSource;
use crate::deals::DealId;
use crate::engine::{annotate, QueryResult};
use crate::favorites::UserContext;
use crate::ShareError;

const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub ids: Vec<DealId>,
    /// Short sharer tag shown to the recipient, never the full user id.
    pub sharer: String,
}

impl ShareLink {
    /// Builds a link for `ids` selected by the user in `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::NothingSelected`] if `ids` is empty.
    pub fn new(ctx: &UserContext, ids: &[DealId]) -> Result<Self, ShareError> {
        if ids.is_empty() {
            return Err(ShareError::NothingSelected);
        }
        Ok(Self {
            ids: dedup_preserving_order(ids.iter().copied()),
            sharer: ctx.user_id.short(),
        })
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        let ids = self
            .ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("ids={ids}&user={}", self.sharer)
    }

    /// Parses a query string such as `ids=3,1,2&user=abcd1234`. A leading
    /// `?` is accepted. Values are taken verbatim (no percent-decoding).
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::NoIds`] if no valid id remains.
    pub fn parse(query: &str) -> Result<Self, ShareError> {
        let query = query.trim().trim_start_matches('?');
        let mut ids = None;
        let mut user = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("ids", value)) => ids = Some(value),
                Some(("user", value)) => user = Some(value),
                _ => {}
            }
        }
        Self::from_parts(ids.unwrap_or_default(), user)
    }

    /// Builds a link from already-decoded `ids` and `user` parameters.
    ///
    /// Unparseable id tokens are skipped and repeated ids keep their first
    /// position. A missing or blank user becomes `anonymous`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::NoIds`] if no valid id remains.
    pub fn from_parts(ids: &str, user: Option<&str>) -> Result<Self, ShareError> {
        let parsed = ids
            .split(',')
            .filter_map(|token| token.trim().parse::<DealId>().ok());
        let ids = dedup_preserving_order(parsed);
        if ids.is_empty() {
            return Err(ShareError::NoIds);
        }
        let sharer = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();
        Ok(Self { ids, sharer })
    }
}

fn dedup_preserving_order(ids: impl IntoIterator<Item = DealId>) -> Vec<DealId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Resolves the link's records through `source`, at most `max_ids` of them,
/// and annotates them in link order.
pub fn resolve_shared<S>(source: &S, link: &ShareLink, max_ids: usize) -> QueryResult
where
    S: RecordSource + ?Sized,
{
    if link.ids.len() > max_ids {
        tracing::debug!(
            requested = link.ids.len(),
            max_ids,
            "share link truncated"
        );
    }
    let records = source.by_ids(&link.ids, max_ids);
    annotate(&records)
}
