//! Last-fetched findings and the views derived from them.
//!
//! The cache is replaced wholesale on every successful fetch; views are
//! recomputed from it on demand so typing a search query never hits the
//! network.
//!
//! # Recency buckets
//!
//! Views only show the last two calendar days in the viewer's local time:
//!
//! ```text
//! created_at >= start of today                     → Today
//! start of yesterday <= created_at < start of today → Yesterday
//! created_at < start of yesterday                  → dropped
//! no usable created_at                             → Today (always current)
//! ```
//!
//! Undated findings are never dropped.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use friction_protocol::StatusFilter;

use crate::types::Finding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecencyGroup {
    Today,
    Yesterday,
}

impl RecencyGroup {
    pub fn label(self) -> &'static str {
        match self {
            RecencyGroup::Today => "Today",
            RecencyGroup::Yesterday => "Yesterday",
        }
    }
}

/// What the user is looking at: a status chip plus a free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindingsQuery {
    pub status: StatusFilter,
    pub text: String,
}

impl FindingsQuery {
    pub fn new(status: StatusFilter, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    fn needle(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Findings grouped by recency, each group in cache order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindingsView {
    pub today: Vec<Finding>,
    pub yesterday: Vec<Finding>,
}

impl FindingsView {
    /// The "No findings" state.
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.yesterday.is_empty()
    }

    pub fn len(&self) -> usize {
        self.today.len() + self.yesterday.len()
    }

    /// Non-empty groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = (RecencyGroup, &[Finding])> {
        [
            (RecencyGroup::Today, self.today.as_slice()),
            (RecencyGroup::Yesterday, self.yesterday.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.today.iter().chain(self.yesterday.iter())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.iter().any(|finding| finding.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindingsCache {
    items: Vec<Finding>,
    fetched_for: Option<StatusFilter>,
}

impl FindingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the working set with a fresh fetch made under `filter`.
    pub fn replace(&mut self, filter: StatusFilter, items: Vec<Finding>) {
        self.items = items;
        self.fetched_for = Some(filter);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.fetched_for = None;
    }

    pub fn items(&self) -> &[Finding] {
        &self.items
    }

    pub fn fetched_for(&self) -> Option<StatusFilter> {
        self.fetched_for
    }

    pub fn view(&self, query: &FindingsQuery) -> FindingsView {
        self.view_at(query, &Local::now())
    }

    /// Derives the grouped view as seen at `now`. A cache fetched for a
    /// different status chip yields the empty view rather than stale rows.
    pub fn view_at<Tz: TimeZone>(&self, query: &FindingsQuery, now: &DateTime<Tz>) -> FindingsView {
        if self.fetched_for != Some(query.status) {
            return FindingsView::default();
        }

        let today = now.date_naive();
        let start_today = start_of_day(now, today);
        let start_yesterday = start_of_day(now, today.pred_opt().unwrap_or(today));
        let needle = query.needle();

        let mut view = FindingsView::default();
        for finding in &self.items {
            let group = match finding.created_at {
                None => RecencyGroup::Today,
                Some(ts) if ts >= start_today => RecencyGroup::Today,
                Some(ts) if ts >= start_yesterday => RecencyGroup::Yesterday,
                Some(_) => continue,
            };

            if !needle.is_empty() && !finding.haystack().to_lowercase().contains(&needle) {
                continue;
            }

            match group {
                RecencyGroup::Today => view.today.push(finding.clone()),
                RecencyGroup::Yesterday => view.yesterday.push(finding.clone()),
            }
        }
        view
    }
}

/// Local midnight of `date` in `now`'s time zone, as UTC. Falls forward an
/// hour when midnight does not exist (DST gap).
fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> DateTime<Utc> {
    let tz = now.timezone();
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use friction_protocol::FindingStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn finding(id: &str, created_at: Option<DateTime<Utc>>, topic: &str) -> Finding {
        Finding {
            id: id.to_string(),
            kind: "friction".to_string(),
            topic: Some(topic.to_string()),
            summary: None,
            confidence: None,
            recall_anchor: None,
            created_at,
            status: FindingStatus::Unreviewed,
        }
    }

    fn ids(items: &[Finding]) -> Vec<&str> {
        items.iter().map(|f| f.id.as_str()).collect()
    }

    fn unreviewed(text: &str) -> FindingsQuery {
        FindingsQuery::new(StatusFilter::Unreviewed, text)
    }

    fn cache_with(items: Vec<Finding>) -> FindingsCache {
        let mut cache = FindingsCache::new();
        cache.replace(StatusFilter::Unreviewed, items);
        cache
    }

    #[test]
    fn test_two_today_one_three_days_old() {
        let cache = cache_with(vec![
            finding("a", Some(now() - Duration::hours(1)), "one"),
            finding("b", Some(now() - Duration::days(3)), "two"),
            finding("c", Some(now() - Duration::hours(2)), "three"),
        ]);

        let view = cache.view_at(&unreviewed(""), &now());
        assert_eq!(ids(&view.today), vec!["a", "c"]);
        assert!(view.yesterday.is_empty());
    }

    #[test]
    fn test_yesterday_bucket_boundaries() {
        let start_today = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let cache = cache_with(vec![
            finding("midnight", Some(start_today), "x"),
            finding("late-yesterday", Some(start_today - Duration::seconds(1)), "x"),
            finding("early-yesterday", Some(start_today - Duration::days(1)), "x"),
            finding(
                "too-old",
                Some(start_today - Duration::days(1) - Duration::seconds(1)),
                "x",
            ),
        ]);

        let view = cache.view_at(&unreviewed(""), &now());
        assert_eq!(ids(&view.today), vec!["midnight"]);
        assert_eq!(ids(&view.yesterday), vec!["late-yesterday", "early-yesterday"]);
    }

    #[test]
    fn test_undated_findings_always_retained() {
        let cache = cache_with(vec![
            finding("old", Some(now() - Duration::days(30)), "x"),
            finding("undated", None, "x"),
        ]);

        for status in StatusFilter::ALL {
            let items = cache.items().to_vec();
            let mut cache = cache.clone();
            cache.replace(status, items);
            let view = cache.view_at(&FindingsQuery::new(status, ""), &now());
            assert_eq!(ids(&view.today), vec!["undated"]);
        }
    }

    #[test]
    fn test_buckets_follow_local_time_zone() {
        // 01:00 on Mar 10 in UTC+3 is still Mar 9 in UTC.
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let local_now = tz.with_ymd_and_hms(2026, 3, 10, 1, 0, 0).unwrap();
        let just_after_local_midnight = tz
            .with_ymd_and_hms(2026, 3, 10, 0, 30, 0)
            .unwrap()
            .with_timezone(&Utc);

        let cache = cache_with(vec![finding("a", Some(just_after_local_midnight), "x")]);
        let view = cache.view_at(&unreviewed(""), &local_now);
        assert_eq!(ids(&view.today), vec!["a"]);
    }

    #[test]
    fn test_query_is_case_insensitive_over_all_fields() {
        let mut with_summary = finding("summary", Some(now()), "unrelated");
        with_summary.summary = Some("Checkout FORM is slow".to_string());
        let mut with_anchor = finding("anchor", Some(now()), "unrelated");
        with_anchor.recall_anchor = Some("the checkout page".to_string());
        let cache = cache_with(vec![
            finding("topic", Some(now()), "Checkout flow"),
            with_summary,
            with_anchor,
            finding("miss", Some(now()), "Onboarding"),
        ]);

        let view = cache.view_at(&unreviewed("  CHECKOUT "), &now());
        assert_eq!(ids(&view.today), vec!["topic", "summary", "anchor"]);
    }

    #[test]
    fn test_query_result_is_subset_of_unfiltered_view() {
        let cache = cache_with(vec![
            finding("a", Some(now()), "alpha"),
            finding("b", Some(now() - Duration::days(1)), "beta"),
            finding("c", None, "alphabet"),
            finding("d", Some(now() - Duration::days(5)), "alpha"),
        ]);

        let unfiltered = cache.view_at(&unreviewed(""), &now());
        let filtered = cache.view_at(&unreviewed("alpha"), &now());
        assert!(filtered.iter().all(|f| unfiltered.contains(&f.id)));
        assert_eq!(filtered.len(), 2);
        assert_eq!(cache.view_at(&unreviewed("   "), &now()), unfiltered);
    }

    #[test]
    fn test_no_match_is_empty_state() {
        let cache = cache_with(vec![finding("a", Some(now()), "alpha")]);
        let view = cache.view_at(&unreviewed("zzz"), &now());
        assert!(view.is_empty());
        assert_eq!(view.groups().count(), 0);
    }

    #[test]
    fn test_view_for_other_status_is_empty() {
        let cache = cache_with(vec![finding("a", Some(now()), "alpha")]);
        let view = cache.view_at(&FindingsQuery::new(StatusFilter::Confirmed, ""), &now());
        assert!(view.is_empty());
    }

    #[test]
    fn test_clear_empties_every_view() {
        let mut cache = cache_with(vec![finding("a", None, "alpha")]);
        cache.clear();
        assert!(cache.items().is_empty());
        assert!(cache.view_at(&unreviewed(""), &now()).is_empty());
    }

    #[test]
    fn test_groups_skip_empty_buckets() {
        let cache = cache_with(vec![finding("y", Some(now() - Duration::days(1)), "x")]);
        let view = cache.view_at(&unreviewed(""), &now());
        let groups: Vec<_> = view.groups().map(|(group, _)| group).collect();
        assert_eq!(groups, vec![RecencyGroup::Yesterday]);
    }
}
