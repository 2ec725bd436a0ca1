//! SQL schema for the Plaint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per complaint. Only status, payment_*, version and updated_at are
-- ever updated; everything else is fixed at filing time.
CREATE TABLE IF NOT EXISTS complaints (
    complaint_id      TEXT PRIMARY KEY,
    file_seq          INTEGER NOT NULL UNIQUE,  -- store-wide filing sequence
    file_number       TEXT NOT NULL,
    complainant_type  TEXT NOT NULL,            -- 'individual' | 'institutional'
    complainant_json  TEXT NOT NULL,
    complainant_name  TEXT NOT NULL,            -- person or institution; for search
    opponent_json     TEXT NOT NULL,
    opponent_name     TEXT NOT NULL,            -- for search
    details_json      TEXT NOT NULL,
    attachments_json  TEXT NOT NULL DEFAULT '[]',
    status            TEXT NOT NULL DEFAULT 'PENDING',
    payment_status    TEXT NOT NULL DEFAULT 'PENDING',
    payment_amount    INTEGER NOT NULL,
    payment_ref       TEXT,
    paid_at           TEXT,
    owner_user_id     TEXT NOT NULL,
    version           INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,            -- RFC 3339 UTC, fixed-width micros
    updated_at        TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS complaints_file_number_idx ON complaints(file_number);
CREATE INDEX IF NOT EXISTS complaints_owner_idx   ON complaints(owner_user_id);
CREATE INDEX IF NOT EXISTS complaints_created_idx ON complaints(created_at);

-- Responses are never deleted on their own; they go with their complaint.
CREATE TABLE IF NOT EXISTS responses (
    response_id       TEXT PRIMARY KEY,
    complaint_id      TEXT NOT NULL
                      REFERENCES complaints(complaint_id) ON DELETE CASCADE,
    response_type     TEXT NOT NULL,
    message           TEXT NOT NULL,
    action_taken      TEXT NOT NULL DEFAULT '',
    status            TEXT NOT NULL,            -- status asserted at append time
    next_hearing_date TEXT,                     -- YYYY-MM-DD
    hearing_venue     TEXT,
    remarks           TEXT,
    responded_by      TEXT NOT NULL,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS responses_complaint_idx ON responses(complaint_id);
CREATE INDEX IF NOT EXISTS responses_created_idx   ON responses(created_at);

PRAGMA user_version = 1;
";
