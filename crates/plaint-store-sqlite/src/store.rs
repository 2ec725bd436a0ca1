//! [`SqliteStore`]: the SQLite implementation of [`ComplaintStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use plaint_core::{
  complaint::{Complaint, NewComplaint, format_file_number},
  response::{Response, Timeline},
  stats::{ComplaintSummary, TypeCounts},
  store::{CommitOutcome, ComplaintPage, ComplaintQuery, ComplaintStore},
};

use crate::{
  Result,
  encode::{
    COMPLAINT_COLUMNS, ComplaintStateParams, RESPONSE_COLUMNS, RawComplaint, RawResponse,
    RawSummary, ResponseParams, decode_u64, encode_dt, encode_uuid, encode_version,
  },
  schema::SCHEMA,
};

/// Compare-and-swap on the mutable complaint columns.
const UPDATE_COMPLAINT_STATE: &str = "
  UPDATE complaints
     SET status = ?2, payment_status = ?3, payment_ref = ?4, paid_at = ?5,
         version = ?6, updated_at = ?7
   WHERE complaint_id = ?1 AND version = ?8";

/// Shared filter for complaint listings; parameters ?1..?6.
const COMPLAINT_FILTER: &str = "
  WHERE (?1 IS NULL OR owner_user_id = ?1)
    AND (?2 IS NULL OR complainant_type = ?2)
    AND (?3 IS NULL OR status = ?3)
    AND (?4 IS NULL OR created_at >= ?4)
    AND (?5 IS NULL OR created_at <= ?5)
    AND (?6 IS NULL
         OR file_number      LIKE ?6 ESCAPE '\\'
         OR complainant_name LIKE ?6 ESCAPE '\\'
         OR opponent_name    LIKE ?6 ESCAPE '\\')";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Plaint complaint store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
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
    tracing::debug!("sqlite schema ready");
    Ok(())
  }
}

/// Turn free text into a `LIKE` pattern, escaping wildcards.
fn like_pattern(text: &str) -> Option<String> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }
  let escaped = text
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  Some(format!("%{escaped}%"))
}

// ─── ComplaintStore impl ─────────────────────────────────────────────────────

impl ComplaintStore for SqliteStore {
  type Error = crate::Error;

  // ── Complaints ────────────────────────────────────────────────────────────

  async fn insert_complaint(
    &self,
    input: NewComplaint,
    owner_user_id: Uuid,
    fee: i64,
  ) -> Result<Complaint> {
    let now = plaint_core::now();
    let mut complaint =
      Complaint::filed(Uuid::new_v4(), String::new(), owner_user_id, input, fee, now);

    let id_str           = encode_uuid(complaint.id);
    let kind_str         = complaint.complainant_type.to_string();
    let complainant_json = serde_json::to_string(&complaint.complainant)?;
    let complainant_name = complaint.complainant.display_name().to_owned();
    let opponent_json    = serde_json::to_string(&complaint.opponent)?;
    let opponent_name    = complaint.opponent.name_or_institution.clone();
    let details_json     = serde_json::to_string(&complaint.complaint_details)?;
    let attachments_json = serde_json::to_string(&complaint.attachments)?;
    let status_str       = complaint.status.to_string();
    let payment_str      = complaint.payment.status.to_string();
    let amount           = complaint.payment.amount;
    let owner_str        = encode_uuid(owner_user_id);
    let now_str          = encode_dt(now);

    let file_number = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let seq: i64 = tx.query_row(
          "SELECT COALESCE(MAX(file_seq), 0) + 1 FROM complaints",
          [],
          |r| r.get(0),
        )?;
        let file_number = format_file_number(now, seq as u64);
        tx.execute(
          "INSERT INTO complaints (
             complaint_id, file_seq, file_number, complainant_type,
             complainant_json, complainant_name, opponent_json, opponent_name,
             details_json, attachments_json, status, payment_status,
             payment_amount, owner_user_id, version, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 0, ?15, ?15)",
          rusqlite::params![
            id_str,
            seq,
            file_number,
            kind_str,
            complainant_json,
            complainant_name,
            opponent_json,
            opponent_name,
            details_json,
            attachments_json,
            status_str,
            payment_str,
            amount,
            owner_str,
            now_str,
          ],
        )?;
        tx.commit()?;
        Ok(file_number)
      })
      .await?;

    complaint.file_number = file_number;
    Ok(complaint)
  }

  async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawComplaint> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE complaint_id = ?1"),
              rusqlite::params![id_str],
              RawComplaint::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComplaint::into_complaint).transpose()
  }

  async fn list_complaints(&self, query: &ComplaintQuery) -> Result<ComplaintPage> {
    let owner_str   = query.owner.map(encode_uuid);
    let kind_str    = query.complainant_type.map(|k| k.to_string());
    let status_str  = query.status.map(|s| s.to_string());
    let after_str   = query.created_after.map(encode_dt);
    let before_str  = query.created_before.map(encode_dt);
    let pattern     = query.text.as_deref().and_then(like_pattern);
    let (limit, offset) = query.page();
    let limit_val   = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset_val  = i64::try_from(offset).unwrap_or(i64::MAX);

    let ((total, individual, institutional), raws) = self
      .conn
      .call(move |conn| {
        let filter = rusqlite::params![
          owner_str.as_deref(),
          kind_str.as_deref(),
          status_str.as_deref(),
          after_str.as_deref(),
          before_str.as_deref(),
          pattern.as_deref(),
        ];

        let counts: (i64, i64, i64) = conn.query_row(
          &format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(complainant_type = 'individual'), 0),
                    COALESCE(SUM(complainant_type = 'institutional'), 0)
               FROM complaints {COMPLAINT_FILTER}"
          ),
          filter,
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {COMPLAINT_COLUMNS} FROM complaints {COMPLAINT_FILTER}
            ORDER BY created_at DESC, file_seq DESC
            LIMIT ?7 OFFSET ?8"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              owner_str.as_deref(),
              kind_str.as_deref(),
              status_str.as_deref(),
              after_str.as_deref(),
              before_str.as_deref(),
              pattern.as_deref(),
              limit_val,
              offset_val,
            ],
            RawComplaint::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((counts, rows))
      })
      .await?;

    Ok(ComplaintPage {
      total:   decode_u64("count", total)?,
      by_type: TypeCounts {
        individual:    decode_u64("count", individual)?,
        institutional: decode_u64("count", institutional)?,
      },
      items:   raws
        .into_iter()
        .map(RawComplaint::into_complaint)
        .collect::<Result<_>>()?,
    })
  }

  async fn commit_complaint(
    &self,
    complaint: Complaint,
    expected_version: u64,
  ) -> Result<CommitOutcome> {
    let p = ComplaintStateParams::new(&complaint)?;
    let expected = encode_version(expected_version)?;

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          UPDATE_COMPLAINT_STATE,
          rusqlite::params![
            p.complaint_id,
            p.status,
            p.payment_status,
            p.payment_ref,
            p.paid_at,
            p.version,
            p.updated_at,
            expected,
          ],
        )?)
      })
      .await?;

    Ok(if updated == 1 {
      CommitOutcome::Committed
    } else {
      CommitOutcome::VersionMismatch
    })
  }

  async fn commit_response(
    &self,
    complaint: Complaint,
    expected_version: u64,
    response: Response,
  ) -> Result<CommitOutcome> {
    let p = ComplaintStateParams::new(&complaint)?;
    let r = ResponseParams::from(&response);
    let expected = encode_version(expected_version)?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = tx.execute(
          UPDATE_COMPLAINT_STATE,
          rusqlite::params![
            p.complaint_id,
            p.status,
            p.payment_status,
            p.payment_ref,
            p.paid_at,
            p.version,
            p.updated_at,
            expected,
          ],
        )?;
        if updated != 1 {
          // Dropping the transaction rolls it back.
          return Ok(CommitOutcome::VersionMismatch);
        }
        tx.execute(
          &format!(
            "INSERT INTO responses ({RESPONSE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
          ),
          rusqlite::params![
            r.response_id,
            r.complaint_id,
            r.response_type,
            r.message,
            r.action_taken,
            r.status,
            r.next_hearing_date,
            r.hearing_venue,
            r.remarks,
            r.responded_by,
            r.created_at,
            r.updated_at,
          ],
        )?;
        tx.commit()?;
        Ok(CommitOutcome::Committed)
      })
      .await
      .map_err(Into::into)
  }

  // ── Responses ─────────────────────────────────────────────────────────────

  async fn get_response(&self, id: Uuid) -> Result<Option<Response>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawResponse> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RESPONSE_COLUMNS} FROM responses WHERE response_id = ?1"),
              rusqlite::params![id_str],
              RawResponse::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawResponse::into_response).transpose()
  }

  async fn update_response(&self, response: Response) -> Result<bool> {
    let r = ResponseParams::from(&response);

    let updated = self
      .conn
      .call(move |conn| {
        // `status` and `created_at` are never rewritten.
        Ok(conn.execute(
          "UPDATE responses
              SET response_type = ?2, message = ?3, action_taken = ?4,
                  next_hearing_date = ?5, hearing_venue = ?6, remarks = ?7,
                  updated_at = ?8
            WHERE response_id = ?1",
          rusqlite::params![
            r.response_id,
            r.response_type,
            r.message,
            r.action_taken,
            r.next_hearing_date,
            r.hearing_venue,
            r.remarks,
            r.updated_at,
          ],
        )?)
      })
      .await?;

    Ok(updated == 1)
  }

  async fn list_responses(
    &self,
    complaint_id: Uuid,
    limit: usize,
    offset: usize,
  ) -> Result<Timeline> {
    let id_str     = encode_uuid(complaint_id);
    let limit_val  = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(offset).unwrap_or(i64::MAX);

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM responses WHERE complaint_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(&format!(
          "SELECT {RESPONSE_COLUMNS} FROM responses
            WHERE complaint_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![id_str, limit_val, offset_val],
            RawResponse::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    Ok(Timeline {
      total_responses: decode_u64("count", total)?,
      responses:       raws
        .into_iter()
        .map(RawResponse::into_response)
        .collect::<Result<_>>()?,
    })
  }

  // ── Projections ───────────────────────────────────────────────────────────

  async fn complaint_summaries(&self, owner: Option<Uuid>) -> Result<Vec<ComplaintSummary>> {
    let owner_str = owner.map(encode_uuid);

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT complainant_type, status, created_at FROM complaints
            WHERE (?1 IS NULL OR owner_user_id = ?1)",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str.as_deref()], |row| {
            Ok(RawSummary {
              complainant_type: row.get(0)?,
              status:           row.get(1)?,
              created_at:       row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn count_responses(&self, owner: Option<Uuid>) -> Result<u64> {
    let owner_str = owner.map(encode_uuid);

    let total: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM responses r
             JOIN complaints c ON c.complaint_id = r.complaint_id
            WHERE (?1 IS NULL OR c.owner_user_id = ?1)",
          rusqlite::params![owner_str.as_deref()],
          |r| r.get(0),
        )?)
      })
      .await?;

    decode_u64("count", total)
  }
}
