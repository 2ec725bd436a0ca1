//! Integration tests for `SqliteStore` driven through the lifecycle engine
//! against an in-memory database.

use chrono::{Duration, NaiveDate};
use plaint_core::{
  Engine, Error,
  actor::Actor,
  complaint::{
    ComplainantType, Complainant, Complaint, ComplaintDetails, ComplaintStatus, ContactInfo,
    FeeSchedule, IndividualComplainant, InstitutionalComplainant, NewComplaint, Opponent,
    PaymentStatus, Representative,
  },
  payment::{CheckoutRequest, PaymentCallback, PaymentGateway},
  response::{NewResponse, ResponseType, ResponseUpdate},
  stats::StatsScope,
  store::{CommitOutcome, ComplaintQuery, ComplaintStore, PageRequest},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn engine() -> Engine<SqliteStore> {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  Engine::new(store, FeeSchedule::default())
}

fn individual(name: &str, opponent: &str) -> NewComplaint {
  NewComplaint {
    complainant:       Complainant::Individual(IndividualComplainant {
      name: name.into(),
      contact_info: ContactInfo {
        mobile: Some("01711000000".into()),
        ..Default::default()
      },
      ..Default::default()
    }),
    opponent:          Opponent {
      name_or_institution: opponent.into(),
      contact_address:     "Station Road, Mymensingh".into(),
      ..Default::default()
    },
    complaint_details: ComplaintDetails {
      description: "Deposit not refunded after contract ended".into(),
      ..Default::default()
    },
    attachments:       vec![],
  }
}

fn institutional(institution: &str) -> NewComplaint {
  NewComplaint {
    complainant: Complainant::Institutional(InstitutionalComplainant {
      institution_name: institution.into(),
      representative: Representative {
        name:        "Nasrin Akter".into(),
        designation: None,
      },
      ..Default::default()
    }),
    ..individual("unused", "City Water Authority")
  }
}

fn note(status: ComplaintStatus) -> NewResponse {
  NewResponse::new(ResponseType::General, "Reviewed the file", status)
}

/// File a complaint, pay for it and move it into review.
async fn paid_in_review(
  engine: &Engine<SqliteStore>,
  citizen: &Actor,
  admin: &Actor,
) -> Complaint {
  let c = engine
    .create(citizen, individual("Rahim Uddin", "Shapla Motors"))
    .await
    .unwrap();
  engine
    .apply_payment(citizen, c.id, PaymentStatus::Paid, Some("txn-1".into()), None)
    .await
    .unwrap();
  engine
    .apply_transition(admin, c.id, ComplaintStatus::InReview, None)
    .await
    .unwrap()
}

struct TestGateway;

impl PaymentGateway for TestGateway {
  fn checkout_url(&self, request: &CheckoutRequest) -> plaint_core::Result<String> {
    Ok(format!(
      "https://pay.test/checkout?complaint={}&type={}&amount={}",
      request.complaint_id, request.complaint_type, request.amount
    ))
  }

  fn verify_callback(&self, callback: &PaymentCallback) -> bool {
    callback.signature == "good"
  }
}

fn callback(complaint_id: Uuid, status: PaymentStatus, signature: &str) -> PaymentCallback {
  PaymentCallback {
    complaint_id,
    status,
    transaction_ref: Some("gw-42".into()),
    signature: signature.into(),
  }
}

// ─── Filing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_initialises_pending_complaint() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());

  let c = e
    .create(&citizen, individual("Rahim Uddin", "Shapla Motors"))
    .await
    .unwrap();
  assert_eq!(c.status, ComplaintStatus::Pending);
  assert_eq!(c.payment.status, PaymentStatus::Pending);
  assert_eq!(c.payment.amount, 500);
  assert_eq!(c.owner_user_id, citizen.user_id);
  assert_eq!(c.version, 0);
  assert!(c.file_number.starts_with("COM-"));

  let fetched = e.get(&citizen, c.id).await.unwrap();
  assert_eq!(fetched.file_number, c.file_number);
  assert_eq!(fetched.complainant, c.complainant);
  assert_eq!(fetched.created_at, c.created_at);
}

#[tokio::test]
async fn institutional_fee_and_variant() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());

  let c = e.create(&citizen, institutional("Green Field Traders")).await.unwrap();
  assert_eq!(c.complainant_type, ComplainantType::Institutional);
  assert_eq!(c.payment.amount, 1000);
  assert_eq!(c.complainant.display_name(), "Green Field Traders");
}

#[tokio::test]
async fn file_numbers_are_unique_and_sequential() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());

  let mut numbers = Vec::new();
  for _ in 0..5 {
    let c = e
      .create(&citizen, individual("Rahim Uddin", "Shapla Motors"))
      .await
      .unwrap();
    numbers.push(c.file_number);
  }
  let mut deduped = numbers.clone();
  deduped.sort();
  deduped.dedup();
  assert_eq!(deduped.len(), 5);
  assert!(numbers[0].ends_with("-000001"));
  assert!(numbers[4].ends_with("-000005"));
}

#[tokio::test]
async fn create_rejects_missing_opponent_address() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());

  let mut input = individual("Rahim Uddin", "Shapla Motors");
  input.opponent.contact_address = String::new();
  let err = e.create(&citizen, input).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  let page = e.list_for_user(&citizen, citizen.user_id, ComplaintQuery::default()).await.unwrap();
  assert_eq!(page.total, 0);
}

#[tokio::test]
async fn admins_do_not_file_complaints() {
  let e = engine().await;
  let admin = Actor::admin(Uuid::new_v4());
  let err = e
    .create(&admin, individual("Rahim Uddin", "Shapla Motors"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Authorization(_)));
}

#[tokio::test]
async fn get_missing_complaint_is_not_found() {
  let e = engine().await;
  let admin = Actor::admin(Uuid::new_v4());
  let id = Uuid::new_v4();
  let err = e.get(&admin, id).await.unwrap_err();
  assert!(matches!(err, Error::ComplaintNotFound(x) if x == id));
}

#[tokio::test]
async fn citizens_cannot_read_each_others_complaints() {
  let e = engine().await;
  let alice = Actor::citizen(Uuid::new_v4());
  let bob = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());

  let c = e.create(&alice, individual("Alice", "Shapla Motors")).await.unwrap();
  assert!(matches!(e.get(&bob, c.id).await, Err(Error::Authorization(_))));
  assert!(e.get(&admin, c.id).await.is_ok());
  assert!(matches!(
    e.list_for_user(&bob, alice.user_id, ComplaintQuery::default()).await,
    Err(Error::Authorization(_))
  ));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_is_newest_first_and_scoped_to_owner() {
  let e = engine().await;
  let alice = Actor::citizen(Uuid::new_v4());
  let bob = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());

  let first = e.create(&alice, individual("Alice", "Shapla Motors")).await.unwrap();
  let second = e.create(&alice, institutional("Alice Traders")).await.unwrap();
  e.create(&bob, individual("Bob", "Meghna Builders")).await.unwrap();

  let own = e.list_for_user(&alice, alice.user_id, ComplaintQuery::default()).await.unwrap();
  assert_eq!(own.total, 2);
  assert_eq!(own.by_type.individual, 1);
  assert_eq!(own.by_type.institutional, 1);
  let ids: Vec<_> = own.items.iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![second.id, first.id]);

  let all = e.list_all(&admin, ComplaintQuery::default()).await.unwrap();
  assert_eq!(all.total, 3);

  assert!(matches!(
    e.list_all(&alice, ComplaintQuery::default()).await,
    Err(Error::Authorization(_))
  ));
}

#[tokio::test]
async fn listing_filters_by_text_type_and_status() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());

  let a = e.create(&citizen, individual("Rahim Uddin", "Shapla Motors")).await.unwrap();
  e.create(&citizen, individual("Karim Sheikh", "Meghna Builders")).await.unwrap();
  e.create(&citizen, institutional("Padma Foods")).await.unwrap();
  e.apply_transition(&admin, a.id, ComplaintStatus::Rejected, None).await.unwrap();

  let by_opponent = e
    .list_all(&admin, ComplaintQuery { text: Some("shapla".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_opponent.total, 1);
  assert_eq!(by_opponent.items[0].id, a.id);

  let by_institution = e
    .list_all(&admin, ComplaintQuery { text: Some("Padma".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_institution.total, 1);

  let by_file_number = e
    .list_all(&admin, ComplaintQuery { text: Some(a.file_number.clone()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_file_number.items.len(), 1);

  let wildcard = e
    .list_all(&admin, ComplaintQuery { text: Some("%".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(wildcard.total, 0);

  let institutional_only = e
    .list_all(
      &admin,
      ComplaintQuery {
        complainant_type: Some(ComplainantType::Institutional),
        ..Default::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(institutional_only.total, 1);
  assert_eq!(institutional_only.by_type.individual, 0);

  let rejected = e
    .list_all(&admin, ComplaintQuery { status: Some(ComplaintStatus::Rejected), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(rejected.total, 1);
  assert_eq!(rejected.items[0].status, ComplaintStatus::Rejected);
}

#[tokio::test]
async fn listing_filters_by_date_range_and_pages() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());

  let first = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();
  for _ in 0..4 {
    e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();
  }

  let future = ComplaintQuery {
    created_after: Some(first.created_at + Duration::days(1)),
    ..Default::default()
  };
  assert_eq!(e.list_for_user(&citizen, citizen.user_id, future).await.unwrap().total, 0);

  let window = ComplaintQuery {
    created_after: Some(first.created_at),
    created_before: Some(first.created_at + Duration::days(1)),
    ..Default::default()
  };
  assert_eq!(e.list_for_user(&citizen, citizen.user_id, window).await.unwrap().total, 5);

  let page = ComplaintQuery { limit: Some(2), offset: Some(4), ..Default::default() };
  let page = e.list_for_user(&citizen, citizen.user_id, page).await.unwrap();
  assert_eq!(page.total, 5);
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].id, first.id);

  let beyond = ComplaintQuery { offset: Some(usize::MAX), ..Default::default() };
  let beyond = e.list_for_user(&citizen, citizen.user_id, beyond).await.unwrap();
  assert_eq!(beyond.total, 5);
  assert!(beyond.items.is_empty());

  let beyond = PageRequest { limit: None, offset: Some(usize::MAX) };
  let timeline = e.list_responses(&citizen, first.id, beyond).await.unwrap();
  assert!(timeline.responses.is_empty());
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_fee_gate_blocks_unpaid_processing() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());

  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();
  let err = e
    .apply_transition(&admin, c.id, ComplaintStatus::InProgress, None)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::PaymentRequired { target: ComplaintStatus::InProgress, payment: PaymentStatus::Pending }
  ));
  assert_eq!(e.get(&admin, c.id).await.unwrap().status, ComplaintStatus::Pending);
}

#[tokio::test]
async fn scenario_paid_complaint_progresses_forward_only() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());

  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();
  let paid = e
    .apply_payment(&citizen, c.id, PaymentStatus::Paid, Some("txn-123".into()), None)
    .await
    .unwrap();
  assert_eq!(paid.payment.status, PaymentStatus::Paid);
  assert_eq!(paid.payment.transaction_ref.as_deref(), Some("txn-123"));
  assert!(paid.payment.paid_at.is_some());

  e.apply_transition(&admin, c.id, ComplaintStatus::InReview, None).await.unwrap();
  let progressed = e
    .apply_transition(&admin, c.id, ComplaintStatus::InProgress, None)
    .await
    .unwrap();
  assert_eq!(progressed.status, ComplaintStatus::InProgress);

  let err = e
    .apply_transition(&admin, c.id, ComplaintStatus::Pending, None)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::IllegalTransition { from: ComplaintStatus::InProgress, to: ComplaintStatus::Pending }
  ));

  let stored = e.get(&admin, c.id).await.unwrap();
  assert_eq!(stored.status, ComplaintStatus::InProgress);
  assert_eq!(stored.payment.transaction_ref.as_deref(), Some("txn-123"));
}

#[tokio::test]
async fn scenario_final_decision_closes_the_file() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let mut decision = NewResponse::new(
    ResponseType::FinalDecision,
    "Refund ordered within 30 days",
    ComplaintStatus::Resolved,
  );
  decision.action_taken = "Order issued".into();
  let receipt = e.append_response(&admin, c.id, decision, None).await.unwrap();
  assert_eq!(receipt.complaint.status, ComplaintStatus::Resolved);
  assert_eq!(e.get(&citizen, c.id).await.unwrap().status, ComplaintStatus::Resolved);

  let err = e
    .apply_payment(&citizen, c.id, PaymentStatus::Failed, None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TerminalState { status: ComplaintStatus::Resolved }));

  let err = e
    .append_response(&citizen, c.id, note(ComplaintStatus::Resolved), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Authorization(_)));

  let err = e
    .apply_transition(&admin, c.id, ComplaintStatus::Rejected, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TerminalState { .. }));

  let err = e
    .append_response(&admin, c.id, note(ComplaintStatus::InProgress), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TerminalState { .. }));

  // Closed files still take annotations that restate the final status.
  let closed = receipt.complaint;
  let annotation = e
    .append_response(&admin, c.id, note(ComplaintStatus::Resolved), Some(closed.version))
    .await
    .unwrap();
  assert_eq!(annotation.complaint.status, ComplaintStatus::Resolved);
  assert_eq!(annotation.complaint.version, closed.version + 1);
  assert_eq!(annotation.response.status, ComplaintStatus::Resolved);

  let timeline = e.list_responses(&citizen, c.id, PageRequest::default()).await.unwrap();
  assert_eq!(timeline.total_responses, 2);
  assert_eq!(timeline.responses[0].id, annotation.response.id);
  assert_eq!(e.get(&citizen, c.id).await.unwrap().status, ComplaintStatus::Resolved);
}

#[tokio::test]
async fn scenario_concurrent_appends_exactly_one_wins() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let other_admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let mut hearing = NewResponse::new(
    ResponseType::HearingNotice,
    "Hearing fixed",
    ComplaintStatus::HearingScheduled,
  );
  hearing.next_hearing_date = NaiveDate::from_ymd_opt(2026, 11, 2);
  let dismissal = NewResponse::new(
    ResponseType::FinalDecision,
    "Outside jurisdiction",
    ComplaintStatus::Rejected,
  );

  let (a, b) = tokio::join!(
    e.append_response(&admin, c.id, hearing, Some(c.version)),
    e.append_response(&other_admin, c.id, dismissal, Some(c.version)),
  );

  let (winner, loser) = match (a, b) {
    (Ok(w), Err(l)) | (Err(l), Ok(w)) => (w, l),
    other => panic!("expected exactly one winner, got {other:?}"),
  };
  assert!(matches!(loser, Error::Conflict(id) if id == c.id));

  let stored = e.get(&admin, c.id).await.unwrap();
  assert_eq!(stored.status, winner.complaint.status);
  assert_eq!(stored.version, winner.complaint.version);

  let timeline = e.list_responses(&admin, c.id, PageRequest::default()).await.unwrap();
  assert_eq!(timeline.total_responses, 1);
  assert_eq!(timeline.responses[0].id, winner.response.id);
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let err = e
    .apply_transition(&admin, c.id, ComplaintStatus::Resolved, Some(c.version - 1))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert_eq!(e.get(&admin, c.id).await.unwrap().status, ComplaintStatus::InReview);
}

#[tokio::test]
async fn store_commit_is_compare_and_swap() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();

  let mut next = c.clone();
  next.status = ComplaintStatus::InReview;
  next.touch(plaint_core::now());
  let store = e.store();
  assert_eq!(store.commit_complaint(next.clone(), 0).await.unwrap(), CommitOutcome::Committed);
  assert_eq!(
    store.commit_complaint(next, 0).await.unwrap(),
    CommitOutcome::VersionMismatch
  );
  assert_eq!(store.get_complaint(c.id).await.unwrap().unwrap().version, 1);
}

#[tokio::test]
async fn same_status_transition_is_a_no_op() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let same = e
    .apply_transition(&admin, c.id, ComplaintStatus::InReview, None)
    .await
    .unwrap();
  assert_eq!(same.version, c.version);
  assert_eq!(same.updated_at, c.updated_at);
}

#[tokio::test]
async fn only_admins_change_status() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();
  let err = e
    .apply_transition(&citizen, c.id, ComplaintStatus::InReview, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Authorization(_)));
}

#[tokio::test]
async fn early_dismissal_needs_no_payment() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();

  let receipt = e
    .append_response(&admin, c.id, note(ComplaintStatus::Rejected), None)
    .await
    .unwrap();
  assert_eq!(receipt.complaint.status, ComplaintStatus::Rejected);
  assert_eq!(receipt.complaint.payment.status, PaymentStatus::Pending);
}

// ─── Payment ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn paid_is_absorbing() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();
  e.apply_payment(&citizen, c.id, PaymentStatus::Paid, None, None).await.unwrap();

  for to in [PaymentStatus::Failed, PaymentStatus::Pending] {
    let err = e.apply_payment(&admin, c.id, to, None, None).await.unwrap_err();
    assert!(matches!(err, Error::IllegalPaymentTransition { from: PaymentStatus::Paid, .. }));
  }
  // Duplicate completion notices are harmless.
  let again = e.apply_payment(&citizen, c.id, PaymentStatus::Paid, None, None).await.unwrap();
  assert_eq!(again.payment.status, PaymentStatus::Paid);
}

#[tokio::test]
async fn citizens_pay_only_their_own_complaints() {
  let e = engine().await;
  let alice = Actor::citizen(Uuid::new_v4());
  let bob = Actor::citizen(Uuid::new_v4());
  let c = e.create(&alice, individual("Alice", "Shapla Motors")).await.unwrap();

  let err = e
    .apply_payment(&bob, c.id, PaymentStatus::Paid, None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Authorization(_)));
  assert_eq!(e.get(&alice, c.id).await.unwrap().payment.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn checkout_and_verified_callback() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let c = e.create(&citizen, institutional("Padma Foods")).await.unwrap();

  let checkout = e.begin_payment(&citizen, c.id, &TestGateway).await.unwrap();
  assert!(checkout.redirect_url.contains(&c.id.to_string()));
  assert!(checkout.redirect_url.contains("type=institutional"));
  assert!(checkout.redirect_url.contains("amount=1000"));

  let err = e
    .complete_payment(&citizen, callback(c.id, PaymentStatus::Paid, "forged"), &TestGateway)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Authorization(_)));
  assert_eq!(e.get(&citizen, c.id).await.unwrap().payment.status, PaymentStatus::Pending);

  let paid = e
    .complete_payment(&citizen, callback(c.id, PaymentStatus::Paid, "good"), &TestGateway)
    .await
    .unwrap();
  assert_eq!(paid.payment.status, PaymentStatus::Paid);
  assert_eq!(paid.payment.transaction_ref.as_deref(), Some("gw-42"));

  let err = e.begin_payment(&citizen, c.id, &TestGateway).await.unwrap_err();
  assert!(matches!(err, Error::IllegalPaymentTransition { .. }));
}

#[tokio::test]
async fn failed_payment_can_be_retried() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();

  let failed = e
    .complete_payment(&citizen, callback(c.id, PaymentStatus::Failed, "good"), &TestGateway)
    .await
    .unwrap();
  assert_eq!(failed.payment.status, PaymentStatus::Failed);

  let checkout = e.begin_payment(&citizen, c.id, &TestGateway).await.unwrap();
  assert_eq!(checkout.complaint.payment.status, PaymentStatus::Pending);
  assert_eq!(checkout.complaint.version, failed.version + 1);

  let paid = e
    .complete_payment(&citizen, callback(c.id, PaymentStatus::Paid, "good"), &TestGateway)
    .await
    .unwrap();
  assert_eq!(paid.payment.status, PaymentStatus::Paid);
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_then_list_returns_newest_first() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let before = e.list_responses(&citizen, c.id, PageRequest::default()).await.unwrap();
  assert_eq!(before.total_responses, 0);

  e.append_response(&admin, c.id, note(ComplaintStatus::InReview), None).await.unwrap();
  let mut update = NewResponse::new(
    ResponseType::InvestigationUpdate,
    "Site visit done",
    ComplaintStatus::InReview,
  );
  update.remarks = Some("Photos on file".into());
  let second = e.append_response(&admin, c.id, update, None).await.unwrap();

  let after = e.list_responses(&citizen, c.id, PageRequest::default()).await.unwrap();
  assert_eq!(after.total_responses, 2);
  assert_eq!(after.responses[0].id, second.response.id);
  assert_eq!(after.responses[0].remarks.as_deref(), Some("Photos on file"));
  assert_eq!(after.responses[0].responded_by_user_id, admin.user_id);

  let detail = e
    .detail(&citizen, c.id, PageRequest { limit: Some(1), offset: None })
    .await
    .unwrap();
  assert_eq!(detail.timeline.total_responses, 2);
  assert_eq!(detail.timeline.responses.len(), 1);
}

#[tokio::test]
async fn informational_append_bumps_version_not_status() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let receipt = e
    .append_response(&admin, c.id, note(ComplaintStatus::InReview), Some(c.version))
    .await
    .unwrap();
  assert_eq!(receipt.complaint.status, ComplaintStatus::InReview);
  assert_eq!(receipt.complaint.version, c.version + 1);
}

#[tokio::test]
async fn append_with_illegal_status_records_nothing() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = e.create(&citizen, individual("Rahim", "Shapla Motors")).await.unwrap();

  let err = e
    .append_response(&admin, c.id, note(ComplaintStatus::HearingScheduled), None)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PaymentRequired { .. }));

  let timeline = e.list_responses(&admin, c.id, PageRequest::default()).await.unwrap();
  assert_eq!(timeline.total_responses, 0);
  assert_eq!(e.get(&admin, c.id).await.unwrap().version, 0);
}

#[tokio::test]
async fn hearing_notice_requires_a_date() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let notice = NewResponse::new(
    ResponseType::HearingNotice,
    "Hearing fixed",
    ComplaintStatus::HearingScheduled,
  );
  let err = e.append_response(&admin, c.id, notice, None).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn editing_a_response_never_changes_status() {
  let e = engine().await;
  let citizen = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());
  let c = paid_in_review(&e, &citizen, &admin).await;

  let receipt = e
    .append_response(&admin, c.id, note(ComplaintStatus::InProgress), None)
    .await
    .unwrap();
  let edited = e
    .update_response(
      &admin,
      receipt.response.id,
      ResponseUpdate {
        message: Some("Reviewed the file and the contract".into()),
        ..Default::default()
      },
    )
    .await
    .unwrap();
  assert_eq!(edited.message, "Reviewed the file and the contract");
  assert_eq!(edited.status, ComplaintStatus::InProgress);
  assert_eq!(edited.created_at, receipt.response.created_at);

  let stored = e.get(&admin, c.id).await.unwrap();
  assert_eq!(stored.status, ComplaintStatus::InProgress);
  assert_eq!(stored.version, receipt.complaint.version);

  let listed = e.list_responses(&admin, c.id, PageRequest::default()).await.unwrap();
  assert_eq!(listed.responses[0].message, "Reviewed the file and the contract");

  let err = e
    .update_response(&citizen, receipt.response.id, ResponseUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Authorization(_)));

  let missing = Uuid::new_v4();
  let err = e
    .update_response(&admin, missing, ResponseUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ResponseNotFound(id) if id == missing));
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn statistics_per_scope() {
  let e = engine().await;
  let alice = Actor::citizen(Uuid::new_v4());
  let bob = Actor::citizen(Uuid::new_v4());
  let admin = Actor::admin(Uuid::new_v4());

  let a = paid_in_review(&e, &alice, &admin).await;
  e.append_response(&admin, a.id, note(ComplaintStatus::Resolved), None).await.unwrap();
  e.create(&alice, institutional("Alice Traders")).await.unwrap();
  let b = e.create(&bob, individual("Bob", "Meghna Builders")).await.unwrap();
  e.apply_transition(&admin, b.id, ComplaintStatus::Rejected, None).await.unwrap();

  let own = e.statistics(&alice, StatsScope::Own).await.unwrap();
  assert_eq!(own.overview.total_complaints, 2);
  assert_eq!(own.overview.resolved_complaints, 1);
  assert_eq!(own.overview.pending_complaints, 1);
  assert_eq!(own.overview.resolved_percentage, 50.0);
  assert_eq!(own.by_type.institutional, 1);
  assert_eq!(own.total_responses, 1);
  assert_eq!(own.monthly.len(), 1);

  let system = e.statistics(&admin, StatsScope::System).await.unwrap();
  assert_eq!(system.overview.total_complaints, 3);
  assert_eq!(system.overview.rejected_complaints, 1);
  assert_eq!(system.status_distribution[&ComplaintStatus::Rejected], 1);
  assert_eq!(system.status_distribution[&ComplaintStatus::HearingScheduled], 0);

  assert!(matches!(
    e.statistics(&alice, StatsScope::System).await,
    Err(Error::Authorization(_))
  ));
}
