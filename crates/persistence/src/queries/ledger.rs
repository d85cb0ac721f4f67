// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Apply ledger lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;
use league_scheduler::{ApplyResult, LedgerEntry};
use league_scheduler_domain::{AccountId, IdempotencyKey, RunId, SeasonId};
use tracing::debug;

use crate::data_models::LedgerRow;
use crate::diesel_schema::apply_ledger;
use crate::error::PersistenceError;

/// Finds the ledger entry recorded under a key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `account_id` - The account the key belongs to
/// * `key` - The idempotency key
///
/// # Errors
///
/// Returns an error if the database query fails or the stored result does
/// not deserialize.
pub fn find_ledger_entry(
    conn: &mut SqliteConnection,
    account_id: AccountId,
    key: &IdempotencyKey,
) -> Result<Option<LedgerEntry>, PersistenceError> {
    let result: Result<LedgerRow, diesel::result::Error> = apply_ledger::table
        .filter(apply_ledger::account_id.eq(account_id.value()))
        .filter(apply_ledger::idempotency_key.eq(key.as_str()))
        .select(LedgerRow::as_select())
        .first(conn);

    match result {
        Ok(row) => {
            debug!(idempotency_key = %key, "Ledger entry found");
            Ok(Some(decode_ledger_row(row)?))
        }
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

fn decode_ledger_row(row: LedgerRow) -> Result<LedgerEntry, PersistenceError> {
    let idempotency_key: IdempotencyKey = IdempotencyKey::new(&row.idempotency_key)
        .map_err(|e| PersistenceError::corrupt("apply_ledger", e))?;
    let run_id: RunId =
        RunId::new(&row.run_id).map_err(|e| PersistenceError::corrupt("apply_ledger", e))?;
    let result: ApplyResult = serde_json::from_str(&row.result_json)?;

    Ok(LedgerEntry {
        account_id: AccountId::new(row.account_id),
        season_id: SeasonId::new(row.season_id),
        idempotency_key,
        run_id,
        request_fingerprint: row.request_fingerprint,
        result,
        applied_at: row.applied_at,
    })
}
