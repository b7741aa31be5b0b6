//! End-to-end pipeline tests: feed JSON through the reconciler into a real
//! in-memory SQLite catalog.

use chrono::{TimeZone, Utc};
use marquee_core::{
  catalog::ShowStatus,
  event::{DiscoveredEvent, EventFeed},
  reconcile::{EventDisposition, ImportReconciler},
  registry::VenueRegistry,
  store::CatalogStore as _,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn event(external_id: &str, venue_id: &str, title: &str) -> DiscoveredEvent {
  DiscoveredEvent {
    external_id: external_id.to_string(),
    venue_id:    venue_id.to_string(),
    title:       title.to_string(),
    date:        "2026-01-25".to_string(),
    doors_time:  None,
    show_time:   Some("7:00 pm".to_string()),
    image_url:   None,
    ticket_url:  None,
    artists:     None,
    scraped_at:  None,
  }
}

fn imported_id(disposition: &EventDisposition) -> Uuid {
  match disposition {
    EventDisposition::Imported { show_id } => *show_id,
    other => panic!("expected an import, got {other:?}"),
  }
}

// ─── Idempotence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reimporting_the_same_event_is_a_duplicate() {
  let s = store().await;
  let registry = VenueRegistry::builtin();
  let reconciler = ImportReconciler::new(&s, &registry, false);

  let incoming = event("e1", "valley-bar", "Band A");
  let first = reconciler.reconcile_event(&incoming).await;
  let show_id = imported_id(&first.disposition);

  let second = reconciler.reconcile_event(&incoming).await;
  assert_eq!(
    second.disposition,
    EventDisposition::Duplicate { existing: show_id }
  );

  assert_eq!(s.row_counts().await.unwrap().shows, 1);
}

// ─── Rejection memory ────────────────────────────────────────────────────────

#[tokio::test]
async fn rejected_show_blocks_any_same_day_event_at_that_venue() {
  let s = store().await;
  let registry = VenueRegistry::builtin();
  let reconciler = ImportReconciler::new(&s, &registry, false);

  let first = reconciler
    .reconcile_event(&event("e1", "valley-bar", "Band A"))
    .await;
  let rejected_id = imported_id(&first.disposition);
  s.set_show_status(rejected_id, ShowStatus::Rejected).await.unwrap();

  // Different external id and a completely different title.
  let second = reconciler
    .reconcile_event(&event("e2", "valley-bar", "Some Other Band"))
    .await;
  assert_eq!(
    second.disposition,
    EventDisposition::Rejected { existing: rejected_id }
  );

  // The rejected show stays the only one at that venue.
  assert_eq!(s.row_counts().await.unwrap().shows, 1);
}

// ─── Headliner fuzzy tier ────────────────────────────────────────────────────

#[tokio::test]
async fn same_headliner_same_day_flags_but_still_creates() {
  let s = store().await;
  let registry = VenueRegistry::builtin();
  let reconciler = ImportReconciler::new(&s, &registry, false);

  let mut first = event("e1", "valley-bar", "Band A with Band B");
  first.artists = Some(vec!["Band A".into(), "Band B".into()]);
  let original = imported_id(&reconciler.reconcile_event(&first).await.disposition);

  let mut second = event("e2", "valley-bar", "Band A (second night?)");
  second.artists = Some(vec!["band a".into()]);
  let report = reconciler.reconcile_event(&second).await;

  let EventDisposition::FlaggedForReview { show_id, duplicate_of } =
    report.disposition
  else {
    panic!("expected a review flag, got {:?}", report.disposition);
  };
  assert_eq!(duplicate_of, original);

  let flagged = s.get_show(show_id).await.unwrap().unwrap();
  assert_eq!(flagged.status, ShowStatus::Pending);
  assert_eq!(flagged.duplicate_of_show_id, Some(original));
  assert_eq!(s.row_counts().await.unwrap().shows, 2);
}

// ─── Schedule resolution ─────────────────────────────────────────────────────

#[tokio::test]
async fn arizona_evening_show_lands_on_the_next_utc_day() {
  let s = store().await;
  let registry = VenueRegistry::builtin();
  let reconciler = ImportReconciler::new(&s, &registry, false);

  let report =
    reconciler.reconcile_event(&event("e1", "valley-bar", "Band A")).await;
  let show = s
    .get_show(imported_id(&report.disposition))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(
    show.starts_at,
    Utc.with_ymd_and_hms(2026, 1, 26, 2, 0, 0).unwrap()
  );
}

// ─── Dry run ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dry_run_writes_nothing() {
  let s = store().await;
  let registry = VenueRegistry::builtin();

  // Seed one real show so the dry run has something to classify against.
  let seeder = ImportReconciler::new(&s, &registry, false);
  seeder.reconcile_event(&event("e1", "valley-bar", "Band A")).await;
  let before = s.row_counts().await.unwrap();

  let dry = ImportReconciler::new(&s, &registry, true);
  let summary = dry
    .run(vec![
      event("e1", "valley-bar", "Band A"),
      event("e2", "valley-bar", "Band B"),
      event("e3", "the-echo", "Band C, Band D"),
    ])
    .await;

  assert_eq!(summary.total, 3);
  assert_eq!(summary.duplicates, 1);
  assert_eq!(summary.imported, 2);
  assert!(summary.reports[1].line().starts_with("WOULD IMPORT:"));

  assert_eq!(s.row_counts().await.unwrap(), before);
}

// ─── Feed parsing through the pipeline ───────────────────────────────────────

#[tokio::test]
async fn grouped_feed_imports_every_venue_group() {
  let s = store().await;
  let registry = VenueRegistry::builtin();
  let reconciler = ImportReconciler::new(&s, &registry, false);

  let raw = r#"{
    "the-echo": [
      {"external_id": "a1", "venue_id": "the-echo",
       "title": "Band A, Band B", "date": "2026-01-25",
       "show_time": "8:00 pm"}
    ],
    "valley-bar": [
      {"external_id": "b1", "venue_id": "valley-bar",
       "title": "Band C", "date": "2026-01-25"},
      {"external_id": "b2", "venue_id": "closed-basement",
       "title": "Band D", "date": "2026-01-25"}
    ]
  }"#;

  let events = EventFeed::from_json(raw).unwrap().into_events();
  let summary = reconciler.run(events).await;

  assert_eq!(summary.total, 3);
  assert_eq!(summary.imported, 2);
  assert_eq!(summary.errors, 1);

  let counts = s.row_counts().await.unwrap();
  assert_eq!(counts.shows, 2);
  assert_eq!(counts.venues, 2);
  // Band A + Band B from the title split, plus Band C.
  assert_eq!(counts.artists, 3);
}

// ─── Crawler status query ────────────────────────────────────────────────────

#[tokio::test]
async fn crawler_can_prefilter_with_the_status_query() {
  let s = store().await;
  let registry = VenueRegistry::builtin();
  let reconciler = ImportReconciler::new(&s, &registry, false);

  let report =
    reconciler.reconcile_event(&event("e1", "valley-bar", "Band A")).await;
  let show_id = imported_id(&report.disposition);

  let keys = [
    marquee_core::catalog::SourceKey {
      venue_id: "valley-bar".into(),
      event_id: "e1".into(),
    },
    marquee_core::catalog::SourceKey {
      venue_id: "valley-bar".into(),
      event_id: "e9".into(),
    },
  ];
  let statuses = s.source_event_statuses(&keys).await.unwrap();

  let known = statuses[0].show.unwrap();
  assert_eq!(known.show_id, show_id);
  assert_eq!(known.status, ShowStatus::Approved);
  assert!(statuses[1].show.is_none());
}
