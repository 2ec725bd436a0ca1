//! The lifecycle engine: the single entry point for every read and write.
//!
//! Each operation takes the acting [`Actor`], checks it against the
//! authorization rules, validates the move with [`crate::lifecycle`], and
//! commits through the [`ComplaintStore`] with a version check. A lost race
//! surfaces as [`Error::Conflict`]; the engine never retries.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::{Actor, Role},
  complaint::{Complaint, ComplaintStatus, FeeSchedule, NewComplaint, PaymentStatus},
  lifecycle,
  payment::{Checkout, CheckoutRequest, PaymentCallback, PaymentGateway},
  response::{NewResponse, Response, ResponseUpdate, Timeline},
  stats::{Statistics, StatsScope},
  store::{CommitOutcome, ComplaintPage, ComplaintQuery, ComplaintStore, PageRequest},
};

/// A complaint together with one page of its response timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetail {
  pub complaint: Complaint,
  pub timeline:  Timeline,
}

/// The outcome of a response append: the new entry and the complaint as
/// committed alongside it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceipt {
  pub response:  Response,
  pub complaint: Complaint,
}

pub struct Engine<S> {
  store: S,
  fees:  FeeSchedule,
}

impl<S: ComplaintStore> Engine<S> {
  pub fn new(store: S, fees: FeeSchedule) -> Self { Self { store, fees } }

  pub fn store(&self) -> &S { &self.store }

  pub fn fees(&self) -> FeeSchedule { self.fees }

  // ── Complaint records ─────────────────────────────────────────────────────

  /// File a new complaint owned by `actor`.
  pub async fn create(&self, actor: &Actor, input: NewComplaint) -> Result<Complaint> {
    if actor.role != Role::Citizen {
      return Err(deny(actor, "only citizens file complaints"));
    }
    input.validate()?;

    let fee = self.fees.fee_for(input.complainant.complainant_type());
    let complaint = self
      .store
      .insert_complaint(input, actor.user_id, fee)
      .await
      .map_err(Error::store)?;

    info!(
      complaint_id = %complaint.id,
      file_number = %complaint.file_number,
      kind = %complaint.complainant_type,
      "complaint filed"
    );
    Ok(complaint)
  }

  pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Complaint> {
    let complaint = self.load(id).await?;
    authorize_read(actor, &complaint)?;
    Ok(complaint)
  }

  /// [`get`](Self::get) plus the first page of the response timeline.
  pub async fn detail(&self, actor: &Actor, id: Uuid, page: PageRequest) -> Result<ComplaintDetail> {
    let complaint = self.get(actor, id).await?;
    let (limit, offset) = page.resolve();
    let timeline = self
      .store
      .list_responses(id, limit, offset)
      .await
      .map_err(Error::store)?;
    Ok(ComplaintDetail { complaint, timeline })
  }

  /// Complaints filed by `owner`. Citizens may only list their own.
  pub async fn list_for_user(
    &self,
    actor: &Actor,
    owner: Uuid,
    mut query: ComplaintQuery,
  ) -> Result<ComplaintPage> {
    if !actor.is_admin() && !actor.owns(owner) {
      return Err(deny(actor, "cannot list another citizen's complaints"));
    }
    query.owner = Some(owner);
    self.query(&query).await
  }

  /// Every complaint matching `query`. Admins only.
  pub async fn list_all(&self, actor: &Actor, query: ComplaintQuery) -> Result<ComplaintPage> {
    require_admin(actor, "list all complaints")?;
    self.query(&query).await
  }

  async fn query(&self, query: &ComplaintQuery) -> Result<ComplaintPage> {
    let page = self
      .store
      .list_complaints(query)
      .await
      .map_err(Error::store)?;
    debug!(total = page.total, returned = page.items.len(), "listed complaints");
    Ok(page)
  }

  // ── Status ────────────────────────────────────────────────────────────────

  /// Move a complaint to `to`. Admins only.
  ///
  /// `expected_version`, when given, is the version the caller based its
  /// decision on; a stale value fails with [`Error::Conflict`].
  pub async fn apply_transition(
    &self,
    actor: &Actor,
    id: Uuid,
    to: ComplaintStatus,
    expected_version: Option<u64>,
  ) -> Result<Complaint> {
    require_admin(actor, "change complaint status")?;
    let mut complaint = self.load(id).await?;
    check_version(&complaint, expected_version)?;

    let base = complaint.version;
    let from = complaint.status;
    let now = crate::now();
    if !lifecycle::apply_transition(&mut complaint, to, now)? {
      return Ok(complaint);
    }
    complaint.touch(now);
    let complaint = self.commit(complaint, base).await?;
    info!(complaint_id = %id, %from, %to, "status changed");
    Ok(complaint)
  }

  // ── Payment ───────────────────────────────────────────────────────────────

  /// Move the payment sub-record. Allowed for the filing citizen and for
  /// admins.
  pub async fn apply_payment(
    &self,
    actor: &Actor,
    id: Uuid,
    to: PaymentStatus,
    transaction_ref: Option<String>,
    expected_version: Option<u64>,
  ) -> Result<Complaint> {
    let mut complaint = self.load(id).await?;
    if !actor.is_admin() && !actor.owns(complaint.owner_user_id) {
      return Err(deny(actor, "cannot pay for another citizen's complaint"));
    }
    check_version(&complaint, expected_version)?;
    if complaint.status.is_terminal() {
      return Err(Error::TerminalState { status: complaint.status });
    }

    let base = complaint.version;
    let from = complaint.payment.status;
    let now = crate::now();
    if !lifecycle::apply_payment(&mut complaint, to, transaction_ref, now)? {
      return Ok(complaint);
    }
    complaint.touch(now);
    let complaint = self.commit(complaint, base).await?;
    info!(complaint_id = %id, %from, %to, "payment updated");
    Ok(complaint)
  }

  /// Start (or retry) paying the filing fee and return the gateway redirect.
  ///
  /// A `FAILED` payment is moved back to `PENDING` first.
  pub async fn begin_payment(
    &self,
    actor: &Actor,
    id: Uuid,
    gateway: &dyn PaymentGateway,
  ) -> Result<Checkout> {
    let mut complaint = self.load(id).await?;
    if !actor.owns(complaint.owner_user_id) {
      return Err(deny(actor, "only the filer can pay for a complaint"));
    }
    if complaint.status.is_terminal() {
      return Err(Error::TerminalState { status: complaint.status });
    }

    match complaint.payment.status {
      PaymentStatus::Pending => {}
      PaymentStatus::Paid => {
        return Err(Error::IllegalPaymentTransition {
          from: PaymentStatus::Paid,
          to:   PaymentStatus::Pending,
        });
      }
      PaymentStatus::Failed => {
        let base = complaint.version;
        let now = crate::now();
        lifecycle::apply_payment(&mut complaint, PaymentStatus::Pending, None, now)?;
        complaint.touch(now);
        complaint = self.commit(complaint, base).await?;
        info!(complaint_id = %id, "payment retry opened");
      }
    }

    let redirect_url = gateway.checkout_url(&CheckoutRequest::from(&complaint))?;
    debug!(complaint_id = %id, "checkout started");
    Ok(Checkout { redirect_url, complaint })
  }

  /// Apply a gateway completion notice after verifying it.
  pub async fn complete_payment(
    &self,
    actor: &Actor,
    callback: PaymentCallback,
    gateway: &dyn PaymentGateway,
  ) -> Result<Complaint> {
    if !gateway.verify_callback(&callback) {
      return Err(deny(actor, "payment callback signature did not verify"));
    }
    self
      .apply_payment(
        actor,
        callback.complaint_id,
        callback.status,
        callback.transaction_ref,
        None,
      )
      .await
  }

  // ── Response ledger ───────────────────────────────────────────────────────

  /// Append an administrative response and apply the status it asserts, as
  /// one atomic commit. Admins only.
  pub async fn append_response(
    &self,
    actor: &Actor,
    complaint_id: Uuid,
    input: NewResponse,
    expected_version: Option<u64>,
  ) -> Result<ResponseReceipt> {
    require_admin(actor, "respond to complaints")?;
    let now = crate::now();
    let response = input.into_response(complaint_id, actor.user_id, now)?;

    let mut complaint = self.load(complaint_id).await?;
    check_version(&complaint, expected_version)?;
    lifecycle::ensure_open_for(&complaint, response.status)?;

    let base = complaint.version;
    let from = complaint.status;
    lifecycle::apply_transition(&mut complaint, response.status, now)?;
    complaint.touch(now);

    let outcome = self
      .store
      .commit_response(complaint.clone(), base, response.clone())
      .await
      .map_err(Error::store)?;
    if outcome == CommitOutcome::VersionMismatch {
      warn!(%complaint_id, "response append lost a concurrent write");
      return Err(Error::Conflict(complaint_id));
    }

    info!(
      %complaint_id,
      response_id = %response.id,
      kind = %response.response_type,
      %from,
      to = %complaint.status,
      "response appended"
    );
    Ok(ResponseReceipt { response, complaint })
  }

  /// Edit a response in place. Never changes the complaint's status.
  pub async fn update_response(
    &self,
    actor: &Actor,
    response_id: Uuid,
    update: ResponseUpdate,
  ) -> Result<Response> {
    require_admin(actor, "edit responses")?;
    let mut response = self
      .store
      .get_response(response_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ResponseNotFound(response_id))?;

    response.apply_update(update, crate::now())?;
    let found = self
      .store
      .update_response(response.clone())
      .await
      .map_err(Error::store)?;
    if !found {
      return Err(Error::ResponseNotFound(response_id));
    }
    info!(%response_id, complaint_id = %response.complaint_id, "response edited");
    Ok(response)
  }

  pub async fn list_responses(
    &self,
    actor: &Actor,
    complaint_id: Uuid,
    page: PageRequest,
  ) -> Result<Timeline> {
    let complaint = self.load(complaint_id).await?;
    authorize_read(actor, &complaint)?;
    let (limit, offset) = page.resolve();
    self
      .store
      .list_responses(complaint_id, limit, offset)
      .await
      .map_err(Error::store)
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  pub async fn statistics(&self, actor: &Actor, scope: StatsScope) -> Result<Statistics> {
    let owner = match scope {
      StatsScope::Own => Some(actor.user_id),
      StatsScope::System => {
        require_admin(actor, "view system-wide statistics")?;
        None
      }
    };
    let summaries = self
      .store
      .complaint_summaries(owner)
      .await
      .map_err(Error::store)?;
    let responses = self
      .store
      .count_responses(owner)
      .await
      .map_err(Error::store)?;
    Ok(Statistics::project(scope, &summaries, responses))
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn load(&self, id: Uuid) -> Result<Complaint> {
    self
      .store
      .get_complaint(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ComplaintNotFound(id))
  }

  async fn commit(&self, complaint: Complaint, base: u64) -> Result<Complaint> {
    let outcome = self
      .store
      .commit_complaint(complaint.clone(), base)
      .await
      .map_err(Error::store)?;
    match outcome {
      CommitOutcome::Committed => Ok(complaint),
      CommitOutcome::VersionMismatch => {
        warn!(complaint_id = %complaint.id, "write lost a concurrent update");
        Err(Error::Conflict(complaint.id))
      }
    }
  }
}

// ─── Authorization gate ──────────────────────────────────────────────────────

fn deny(actor: &Actor, reason: &str) -> Error {
  warn!(user_id = %actor.user_id, role = %actor.role, reason, "authorization denied");
  Error::Authorization(reason.to_owned())
}

fn require_admin(actor: &Actor, action: &str) -> Result<()> {
  if actor.is_admin() {
    Ok(())
  } else {
    Err(deny(actor, &format!("only admins may {action}")))
  }
}

fn authorize_read(actor: &Actor, complaint: &Complaint) -> Result<()> {
  if actor.is_admin() || actor.owns(complaint.owner_user_id) {
    Ok(())
  } else {
    Err(deny(actor, "complaint belongs to another citizen"))
  }
}

fn check_version(complaint: &Complaint, expected: Option<u64>) -> Result<()> {
  match expected {
    Some(v) if v != complaint.version => {
      warn!(
        complaint_id = %complaint.id,
        expected = v,
        current = complaint.version,
        "stale version"
      );
      Err(Error::Conflict(complaint.id))
    }
    _ => Ok(()),
  }
}
