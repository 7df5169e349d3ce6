use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{custom_range, Cents, Period, TransactionRecord};

/// One row of a running-balance statement: the record plus the balance
/// immediately after applying it, walking the ledger oldest-first.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerLine {
    pub record: TransactionRecord,
    pub balance_after: Cents,
}

/// Compute the owed balance for one customer from their records.
/// Send adds, receive subtracts, anything else contributes zero.
/// Order-independent; an empty ledger yields 0.
pub fn current_balance(records: &[TransactionRecord]) -> Cents {
    records
        .iter()
        .fold(0, |balance, record| balance + record.signed_amount())
}

/// Sort records into ascending chronological order: undated records first,
/// then by `created_at`, with the repository-assigned sequence as the stable
/// tie-break. `Option` ordering puts `None` before any `Some`.
pub fn sort_chronological(records: &mut [TransactionRecord]) {
    records.sort_by_key(|record| (record.created_at, record.sequence));
}

/// Walk the ledger oldest-first and emit the balance after each record.
///
/// The last line's `balance_after` always equals `current_balance` of the
/// same set. Callers that display newest-first must reverse this output
/// rather than folding in reverse, or every intermediate balance is wrong.
pub fn running_balance_series(records: &[TransactionRecord]) -> Vec<LedgerLine> {
    let mut ordered = records.to_vec();
    sort_chronological(&mut ordered);

    let mut balance: Cents = 0;
    ordered
        .into_iter()
        .map(|record| {
            balance += record.signed_amount();
            LedgerLine {
                record,
                balance_after: balance,
            }
        })
        .collect()
}

/// Select the records falling inside a reporting window, evaluated against
/// `now`. The input is never mutated.
///
/// `All` is the identity filter and keeps undated records; every other
/// period drops records without a parsable `created_at`. A `Custom` window
/// missing either bound is a pass-through, not an error.
pub fn filter_by_period(
    records: &[TransactionRecord],
    period: Period,
    custom_from: Option<NaiveDate>,
    custom_to: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Vec<TransactionRecord> {
    match period {
        Period::All => records.to_vec(),
        Period::Custom => {
            let (Some(from), Some(to)) = (custom_from, custom_to) else {
                return records.to_vec();
            };
            let (start, end) = custom_range(from, to);
            records
                .iter()
                .filter(|record| {
                    record
                        .created_at
                        .is_some_and(|at| at >= start && at <= end)
                })
                .cloned()
                .collect()
        }
        _ => records
            .iter()
            .filter(|record| {
                record
                    .created_at
                    .is_some_and(|at| period.contains(at, now))
            })
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{PaymentMethod, RecordKind};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn send(customer: Uuid, owner: Uuid, amount: Cents, at: &str, sequence: i64) -> TransactionRecord {
        let mut record = TransactionRecord::send(
            customer,
            owner,
            Uuid::new_v4(),
            "Widget",
            1,
            amount,
            ts(at),
        );
        record.sequence = sequence;
        record
    }

    fn receive(
        customer: Uuid,
        owner: Uuid,
        amount: Cents,
        at: &str,
        sequence: i64,
    ) -> TransactionRecord {
        let mut record =
            TransactionRecord::receive(customer, owner, amount, PaymentMethod::Cash, ts(at));
        record.sequence = sequence;
        record
    }

    fn sample_ledger() -> Vec<TransactionRecord> {
        let customer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        vec![
            send(customer, owner, 500_00, "2024-01-01T10:00:00Z", 1),
            receive(customer, owner, 200_00, "2024-01-05T10:00:00Z", 2),
            send(customer, owner, 100_00, "2024-01-10T10:00:00Z", 3),
        ]
    }

    #[test]
    fn test_current_balance_empty() {
        assert_eq!(current_balance(&[]), 0);
    }

    #[test]
    fn test_current_balance_sample() {
        // 500 - 200 + 100 = 400
        assert_eq!(current_balance(&sample_ledger()), 400_00);
    }

    #[test]
    fn test_current_balance_order_independent() {
        let records = sample_ledger();
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(current_balance(&records), current_balance(&reversed));

        let mut swapped = records.clone();
        swapped.swap(0, 2);
        assert_eq!(current_balance(&swapped), 400_00);
    }

    #[test]
    fn test_current_balance_is_idempotent() {
        let records = sample_ledger();
        let first = current_balance(&records);
        let second = current_balance(&records);
        assert_eq!(first, second);
        assert_eq!(records.len(), 3, "input must not be consumed or mutated");
    }

    #[test]
    fn test_running_series_ascending() {
        let series = running_balance_series(&sample_ledger());
        let balances: Vec<Cents> = series.iter().map(|line| line.balance_after).collect();
        assert_eq!(balances, vec![500_00, 300_00, 400_00]);
    }

    #[test]
    fn test_series_last_equals_current_balance() {
        let records = sample_ledger();
        let series = running_balance_series(&records);
        assert_eq!(
            series.last().map(|line| line.balance_after),
            Some(current_balance(&records))
        );

        // Holds for any input order of the same set
        let mut reversed = records.clone();
        reversed.reverse();
        let series = running_balance_series(&reversed);
        assert_eq!(
            series.last().map(|line| line.balance_after),
            Some(current_balance(&records))
        );
    }

    #[test]
    fn test_series_sorts_by_timestamp_before_folding() {
        let customer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        // Presented newest-first; the walk must still be oldest-first
        let records = vec![
            send(customer, owner, 100_00, "2024-01-10T10:00:00Z", 3),
            receive(customer, owner, 200_00, "2024-01-05T10:00:00Z", 2),
            send(customer, owner, 500_00, "2024-01-01T10:00:00Z", 1),
        ];
        let balances: Vec<Cents> = running_balance_series(&records)
            .iter()
            .map(|line| line.balance_after)
            .collect();
        assert_eq!(balances, vec![500_00, 300_00, 400_00]);
    }

    #[test]
    fn test_series_ties_break_by_sequence() {
        let customer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let records = vec![
            receive(customer, owner, 200_00, "2024-01-01T10:00:00Z", 2),
            send(customer, owner, 500_00, "2024-01-01T10:00:00Z", 1),
        ];
        let series = running_balance_series(&records);
        assert_eq!(series[0].record.sequence, 1);
        assert_eq!(series[0].balance_after, 500_00);
        assert_eq!(series[1].balance_after, 300_00);
    }

    #[test]
    fn test_undated_records_sort_first_and_still_count() {
        let customer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut undated = send(customer, owner, 50_00, "2024-01-05T10:00:00Z", 5);
        undated.created_at = None;
        let records = vec![send(customer, owner, 100_00, "2024-01-01T10:00:00Z", 1), undated];

        let series = running_balance_series(&records);
        assert!(series[0].record.created_at.is_none());
        assert_eq!(series[0].balance_after, 50_00);
        assert_eq!(series[1].balance_after, 150_00);
        assert_eq!(current_balance(&records), 150_00);
    }

    #[test]
    fn test_malformed_amount_contributes_zero_not_poison() {
        let mut records = sample_ledger();
        records[1].amount = None; // The 200.00 payment lost its amount
        assert_eq!(current_balance(&records), 600_00);
        let series = running_balance_series(&records);
        assert_eq!(series[1].balance_after, 500_00);
        assert_eq!(series[2].balance_after, 600_00);
    }

    #[test]
    fn test_unrecognized_kind_contributes_zero() {
        let mut records = sample_ledger();
        records[2].kind = RecordKind::parse("writeoff");
        assert_eq!(current_balance(&records), 300_00);
    }

    #[test]
    fn test_filter_all_is_identity() {
        let mut records = sample_ledger();
        records[0].created_at = None; // Undated records survive `all`
        let filtered = filter_by_period(&records, Period::All, None, None, Utc::now());
        assert_eq!(filtered.len(), records.len());
        assert_eq!(records.len(), 3, "input left untouched");
    }

    #[test]
    fn test_filter_last_month_calendar_semantics() {
        let customer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let records = vec![
            send(customer, owner, 100_00, "2024-03-01T09:00:00Z", 1),
            send(customer, owner, 100_00, "2024-02-28T09:00:00Z", 2),
        ];
        let now = ts("2024-03-15T12:00:00Z");
        let filtered = filter_by_period(&records, Period::LastMonth, None, None, now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sequence, 1);
    }

    #[test]
    fn test_filter_excludes_undated_records() {
        let mut records = sample_ledger();
        records[0].created_at = None;
        let now = ts("2024-01-15T12:00:00Z");
        let filtered = filter_by_period(&records, Period::LastMonth, None, None, now);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|record| record.created_at.is_some()));
    }

    #[test]
    fn test_filter_custom_inclusive_days() {
        let records = sample_ledger();
        let from = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let filtered = filter_by_period(&records, Period::Custom, Some(from), Some(to), Utc::now());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_custom_missing_bound_passes_through() {
        let records = sample_ledger();
        let from = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        for (custom_from, custom_to) in [(None, None), (Some(from), None), (None, Some(from))] {
            let filtered =
                filter_by_period(&records, Period::Custom, custom_from, custom_to, Utc::now());
            assert_eq!(filtered.len(), records.len());
        }
    }
}
