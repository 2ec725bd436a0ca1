//! Read-only statistics projected from complaint summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::complaint::{ComplainantType, ComplaintStatus};

/// The fields of a complaint the projection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplaintSummary {
  pub complainant_type: ComplainantType,
  pub status:           ComplaintStatus,
  pub created_at:       DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
  pub individual:    u64,
  pub institutional: u64,
}

impl TypeCounts {
  pub fn add(&mut self, kind: ComplainantType) {
    match kind {
      ComplainantType::Individual => self.individual += 1,
      ComplainantType::Institutional => self.institutional += 1,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  pub total_complaints:      u64,
  pub resolved_complaints:   u64,
  pub pending_complaints:    u64,
  pub processing_complaints: u64,
  pub rejected_complaints:   u64,
  pub resolved_percentage:   f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
  /// `YYYY-MM`.
  pub month:         String,
  pub individual:    u64,
  pub institutional: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsScope {
  /// The actor's own complaints.
  #[default]
  Own,
  /// Every complaint; admins only.
  System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  pub scope:               StatsScope,
  pub overview:            Overview,
  /// Every status appears, with zero when unused.
  pub status_distribution: BTreeMap<ComplaintStatus, u64>,
  pub by_type:             TypeCounts,
  /// Ascending by month; only months with at least one filing.
  pub monthly:             Vec<MonthlyCount>,
  pub total_responses:     u64,
}

impl Statistics {
  pub fn project(
    scope: StatsScope,
    summaries: &[ComplaintSummary],
    total_responses: u64,
  ) -> Self {
    let mut status_distribution: BTreeMap<ComplaintStatus, u64> =
      ComplaintStatus::iter().map(|s| (s, 0)).collect();
    let mut by_type = TypeCounts::default();
    let mut months: BTreeMap<String, TypeCounts> = BTreeMap::new();

    for s in summaries {
      *status_distribution.entry(s.status).or_default() += 1;
      by_type.add(s.complainant_type);
      months
        .entry(s.created_at.format("%Y-%m").to_string())
        .or_default()
        .add(s.complainant_type);
    }

    let count = |pred: fn(ComplaintStatus) -> bool| -> u64 {
      status_distribution
        .iter()
        .filter(|(s, _)| pred(**s))
        .map(|(_, n)| n)
        .sum()
    };

    let total = summaries.len() as u64;
    let resolved = count(|s| s == ComplaintStatus::Resolved);
    let overview = Overview {
      total_complaints: total,
      resolved_complaints: resolved,
      pending_complaints: count(|s| s == ComplaintStatus::Pending),
      processing_complaints: count(ComplaintStatus::is_processing),
      rejected_complaints: count(|s| s == ComplaintStatus::Rejected),
      resolved_percentage: if total == 0 {
        0.0
      } else {
        resolved as f64 * 100.0 / total as f64
      },
    };

    let monthly = months
      .into_iter()
      .map(|(month, c)| MonthlyCount {
        month,
        individual: c.individual,
        institutional: c.institutional,
      })
      .collect();

    Self {
      scope,
      overview,
      status_distribution,
      by_type,
      monthly,
      total_responses,
    }
  }
}
