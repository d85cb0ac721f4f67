// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Apply ledger writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler::NewLedgerEntry;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::diesel_schema::apply_ledger;
use crate::error::PersistenceError;

/// Records an applied request under its idempotency key.
///
/// The `(account_id, idempotency_key)` unique index makes this insert the
/// claim of the key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `entry` - The entry to record
///
/// # Errors
///
/// Returns `PersistenceError::LedgerKeyTaken` if the key is already
/// recorded for the account, or a database error if the insert fails.
pub fn record_ledger_entry(
    conn: &mut SqliteConnection,
    entry: &NewLedgerEntry,
) -> Result<(), PersistenceError> {
    let result_json: String = serde_json::to_string(&entry.result)?;
    let applied_at: String = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

    let inserted: Result<usize, PersistenceError> = diesel::insert_into(apply_ledger::table)
        .values((
            apply_ledger::account_id.eq(entry.account_id.value()),
            apply_ledger::season_id.eq(entry.season_id.value()),
            apply_ledger::idempotency_key.eq(entry.idempotency_key.as_str()),
            apply_ledger::run_id.eq(entry.run_id.as_str()),
            apply_ledger::request_fingerprint.eq(&entry.request_fingerprint),
            apply_ledger::result_json.eq(&result_json),
            apply_ledger::applied_at.eq(&applied_at),
        ))
        .execute(conn)
        .map_err(PersistenceError::from);

    match inserted {
        Ok(_) => {
            info!(
                idempotency_key = %entry.idempotency_key,
                run_id = %entry.run_id,
                "Recorded ledger entry"
            );
            Ok(())
        }
        Err(PersistenceError::UniqueViolation(_)) => {
            warn!(idempotency_key = %entry.idempotency_key, "Ledger key already recorded");
            Err(PersistenceError::LedgerKeyTaken(
                entry.idempotency_key.to_string(),
            ))
        }
        Err(e) => Err(e),
    }
}
