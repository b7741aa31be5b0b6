//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use marquee_core::{
  catalog::{SetType, Show, ShowSource, SourceKey},
  store::{
    CatalogStore, CommitOutcome, DayCandidate, NewShowGraph, ShowRef,
    SourceEventStatus,
  },
};

use crate::{
  Error, Result,
  encode::{
    RawDayCandidate, RawShow, decode_set_type, decode_show_status,
    decode_uuid, encode_dt, encode_set_type, encode_show_source,
    encode_show_status, encode_uuid,
  },
  schema::SCHEMA,
  slug::{show_slug_base, slugify, venue_slug_base},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Marquee catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// One artist's slot on a show's bill, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilledArtist {
  pub name:     String,
  pub position: u32,
  pub set_type: SetType,
}

/// Row counts across catalog tables; used to verify write-free dry runs and
/// commit atomicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
  pub shows:        i64,
  pub venues:       i64,
  pub artists:      i64,
  pub show_venues:  i64,
  pub show_artists: i64,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a full show row. Returns `None` if not found.
  pub async fn get_show(&self, show_id: Uuid) -> Result<Option<Show>> {
    let id_str = encode_uuid(show_id);

    let raw: Option<RawShow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT show_id, title, starts_at, city, state, description,
                      price, age_requirement, ticket_url, image_url, status,
                      source, source_venue_id, source_event_id,
                      duplicate_of_show_id, slug, created_at
               FROM shows WHERE show_id = ?1",
              rusqlite::params![id_str],
              read_show_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawShow::into_show).transpose()
  }

  /// The ordered bill for a show.
  pub async fn billing_for_show(
    &self,
    show_id: Uuid,
  ) -> Result<Vec<BilledArtist>> {
    let id_str = encode_uuid(show_id);

    let raws: Vec<(String, u32, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.name, sa.position, sa.set_type
           FROM show_artists sa
           JOIN artists a ON a.artist_id = sa.artist_id
           WHERE sa.show_id = ?1
           ORDER BY sa.position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(name, position, set_type)| {
        Ok(BilledArtist {
          name,
          position,
          set_type: decode_set_type(&set_type)?,
        })
      })
      .collect()
  }

  /// Set a show's review status. Status transitions happen only through
  /// admin review; the import pipeline itself never calls this.
  pub async fn set_show_status(
    &self,
    show_id: Uuid,
    status: marquee_core::catalog::ShowStatus,
  ) -> Result<()> {
    let id_str = encode_uuid(show_id);
    let status_str = encode_show_status(status);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE shows SET status = ?1 WHERE show_id = ?2",
          rusqlite::params![status_str, id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Current row counts across the catalog tables.
  pub async fn row_counts(&self) -> Result<RowCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<i64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
            r.get(0)
          })
        };
        Ok(RowCounts {
          shows:        count("shows")?,
          venues:       count("venues")?,
          artists:      count("artists")?,
          show_venues:  count("show_venues")?,
          show_artists: count("show_artists")?,
        })
      })
      .await?;
    Ok(counts)
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  async fn find_show_by_source_key(
    &self,
    key: &SourceKey,
  ) -> Result<Option<ShowRef>> {
    let venue_id = key.venue_id.clone();
    let event_id = key.event_id.clone();

    let raw: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(show_for_source_key(conn, &venue_id, &event_id)?)
      })
      .await?;

    raw
      .map(|(id, status)| {
        Ok(ShowRef {
          show_id: decode_uuid(&id)?,
          status:  decode_show_status(&status)?,
        })
      })
      .transpose()
  }

  async fn shows_at_venue_on_day(
    &self,
    venue_name: &str,
    day_start: DateTime<Utc>,
  ) -> Result<Vec<DayCandidate>> {
    let name = venue_name.to_string();
    let start = encode_dt(day_start);
    let end = encode_dt(day_start + Duration::hours(24));

    let raws: Vec<RawDayCandidate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.show_id, s.status, a.name
           FROM shows s
           JOIN show_venues sv ON sv.show_id  = s.show_id
           JOIN venues      v  ON v.venue_id  = sv.venue_id
           LEFT JOIN show_artists sa
             ON sa.show_id = s.show_id AND sa.position = 0
           LEFT JOIN artists a ON a.artist_id = sa.artist_id
           WHERE LOWER(v.name) = LOWER(?1)
             AND s.starts_at >= ?2
             AND s.starts_at <  ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![name, start, end], |row| {
            Ok(RawDayCandidate {
              show_id:   row.get(0)?,
              status:    row.get(1)?,
              headliner: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawDayCandidate::into_candidate)
      .collect()
  }

  async fn create_show_graph(
    &self,
    graph: NewShowGraph,
  ) -> Result<CommitOutcome> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Fast path; the UNIQUE constraint on the insert below is the
        // backstop for anything racing past it.
        if let Some((existing, _)) = show_for_source_key(
          &tx,
          &graph.source_key.venue_id,
          &graph.source_key.event_id,
        )? {
          return Ok(RawCommit { created: false, show_id: existing });
        }

        let now = encode_dt(Utc::now());

        // Venue: resolve by case-insensitive (name, city), create
        // unverified from registry metadata when absent.
        let venue_row_id: String = match tx
          .query_row(
            "SELECT venue_id FROM venues
             WHERE LOWER(name) = LOWER(?1) AND LOWER(city) = LOWER(?2)",
            rusqlite::params![graph.venue.name, graph.venue.city],
            |r| r.get(0),
          )
          .optional()?
        {
          Some(id) => id,
          None => {
            let id = encode_uuid(Uuid::new_v4());
            let base = venue_slug_base(
              &graph.venue.name,
              &graph.venue.city,
              &graph.venue.state,
            );
            let slug = unique_slug(&tx, "venues", &base)?;
            tx.execute(
              "INSERT INTO venues
                 (venue_id, name, city, state, address, verified, slug,
                  created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
              rusqlite::params![
                id,
                graph.venue.name,
                graph.venue.city,
                graph.venue.state,
                graph.venue.address,
                slug,
                now,
              ],
            )?;
            id
          }
        };

        // Show.
        let headliner = graph
          .artists
          .first()
          .cloned()
          .unwrap_or_else(|| graph.title.clone());
        let show_id = encode_uuid(Uuid::new_v4());
        let show_slug = unique_slug(
          &tx,
          "shows",
          &show_slug_base(
            graph.starts_at.date_naive(),
            &headliner,
            &graph.venue.name,
          ),
        )?;

        let inserted = tx.execute(
          "INSERT INTO shows
             (show_id, title, starts_at, city, state, ticket_url, image_url,
              status, source, source_venue_id, source_event_id,
              duplicate_of_show_id, slug, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                   ?14)",
          rusqlite::params![
            show_id,
            graph.title,
            encode_dt(graph.starts_at),
            graph.venue.city,
            graph.venue.state,
            graph.ticket_url,
            graph.image_url,
            encode_show_status(graph.status),
            encode_show_source(ShowSource::DiscoveryImported),
            graph.source_key.venue_id,
            graph.source_key.event_id,
            graph.duplicate_of_show_id.map(encode_uuid),
            show_slug,
            now,
          ],
        );

        match inserted {
          Ok(_) => {}
          Err(rusqlite::Error::SqliteFailure(e, msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            // A concurrent import won the natural key. Report the existing
            // show; dropping the transaction rolls back the venue work.
            match show_for_source_key(
              &tx,
              &graph.source_key.venue_id,
              &graph.source_key.event_id,
            )? {
              Some((existing, _)) => {
                return Ok(RawCommit { created: false, show_id: existing });
              }
              None => {
                return Err(rusqlite::Error::SqliteFailure(e, msg).into());
              }
            }
          }
          Err(e) => return Err(e.into()),
        }

        tx.execute(
          "INSERT INTO show_venues (show_id, venue_id) VALUES (?1, ?2)",
          rusqlite::params![show_id, venue_row_id],
        )?;

        // Artists: resolve or create per name; position 0 is the
        // headliner. Duplicate names on one bill are dropped.
        let mut seen: HashSet<String> = HashSet::new();
        let mut position: u32 = 0;
        for name in &graph.artists {
          if !seen.insert(name.to_lowercase()) {
            continue;
          }

          let artist_id: String = match tx
            .query_row(
              "SELECT artist_id FROM artists WHERE LOWER(name) = LOWER(?1)",
              rusqlite::params![name],
              |r| r.get(0),
            )
            .optional()?
          {
            Some(id) => id,
            None => {
              let id = encode_uuid(Uuid::new_v4());
              let slug = unique_slug(&tx, "artists", &slugify(name))?;
              tx.execute(
                "INSERT INTO artists (artist_id, name, slug, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, name, slug, now],
              )?;
              id
            }
          };

          let set_type = if position == 0 {
            SetType::Headliner
          } else {
            SetType::Opener
          };
          tx.execute(
            "INSERT INTO show_artists (show_id, artist_id, position, set_type)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              show_id,
              artist_id,
              position,
              encode_set_type(set_type),
            ],
          )?;
          position += 1;
        }

        tx.commit()?;
        Ok(RawCommit { created: true, show_id })
      })
      .await?;

    let show_id = decode_uuid(&raw.show_id)?;
    Ok(if raw.created {
      CommitOutcome::Created(show_id)
    } else {
      CommitOutcome::SourceKeyExists(show_id)
    })
  }

  async fn source_event_statuses(
    &self,
    keys: &[SourceKey],
  ) -> Result<Vec<SourceEventStatus>> {
    let owned: Vec<SourceKey> = keys.to_vec();

    let raws: Vec<(SourceKey, Option<(String, String)>)> = self
      .conn
      .call(move |conn| {
        let mut out = Vec::with_capacity(owned.len());
        for key in owned {
          let found = show_for_source_key(conn, &key.venue_id, &key.event_id)?;
          out.push((key, found));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(key, found)| {
        let show = found
          .map(|(id, status)| {
            Ok::<_, Error>(ShowRef {
              show_id: decode_uuid(&id)?,
              status:  decode_show_status(&status)?,
            })
          })
          .transpose()?;
        Ok(SourceEventStatus { key, show })
      })
      .collect()
  }
}

// ─── Sync helpers (run on the connection thread) ─────────────────────────────

struct RawCommit {
  created: bool,
  show_id: String,
}

fn show_for_source_key(
  conn: &rusqlite::Connection,
  venue_id: &str,
  event_id: &str,
) -> rusqlite::Result<Option<(String, String)>> {
  conn
    .query_row(
      "SELECT show_id, status FROM shows
       WHERE source_venue_id = ?1 AND source_event_id = ?2",
      rusqlite::params![venue_id, event_id],
      |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()
}

/// Resolve `base` against existing slugs in `table`, suffixing `-2`, `-3`, …
/// until unique. Runs inside the caller's transaction so the chosen slug
/// cannot be taken before the commit.
fn unique_slug(
  conn: &rusqlite::Connection,
  table: &str,
  base: &str,
) -> rusqlite::Result<String> {
  let mut stmt = conn.prepare(&format!("SELECT 1 FROM {table} WHERE slug = ?1"))?;
  let mut candidate = base.to_string();
  let mut n = 1u32;
  while stmt.exists(rusqlite::params![candidate])? {
    n += 1;
    candidate = format!("{base}-{n}");
  }
  Ok(candidate)
}

fn read_show_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawShow> {
  Ok(RawShow {
    show_id:              row.get(0)?,
    title:                row.get(1)?,
    starts_at:            row.get(2)?,
    city:                 row.get(3)?,
    state:                row.get(4)?,
    description:          row.get(5)?,
    price:                row.get(6)?,
    age_requirement:      row.get(7)?,
    ticket_url:           row.get(8)?,
    image_url:            row.get(9)?,
    status:               row.get(10)?,
    source:               row.get(11)?,
    source_venue_id:      row.get(12)?,
    source_event_id:      row.get(13)?,
    duplicate_of_show_id: row.get(14)?,
    slug:                 row.get(15)?,
    created_at:           row.get(16)?,
  })
}
