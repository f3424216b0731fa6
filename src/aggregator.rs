//! Streaming aggregation of decoded records.
//!
//! Records are folded in one at a time and never retained. The running
//! totals are purely additive, so a snapshot taken at any point is final for
//! the records seen so far.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::record::{Record, RecordKind};
use csv::Writer;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// Aggregate statistics over a sequence of records.
///
/// Owned by the caller; produced by [`Aggregator::snapshot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    /// Sum of all debit amounts.
    pub total_debits: Amount,

    /// Sum of all credit amounts.
    pub total_credits: Amount,

    pub autopay_starts: u64,

    pub autopay_ends: u64,

    /// Number of records accepted.
    pub records: u64,

    /// Credits minus debits for every user that appeared in a debit or credit.
    pub balance_by_user: HashMap<u64, Amount>,
}

/// One `metric,value` row of the CSV report.
#[derive(Serialize)]
struct ReportRow<'a> {
    metric: &'a str,
    value: String,
}

impl AggregateResult {
    /// Balance for a user, or `None` if the user never had a debit or credit.
    pub fn balance_for(&self, user_id: u64) -> Option<Amount> {
        self.balance_by_user.get(&user_id).copied()
    }

    /// Writes a `metric,value` CSV report.
    ///
    /// Amounts are rendered with two decimal places. The balance row reads
    /// `unknown` when `user_id` is absent from the ledger.
    pub fn write_report<W: Write>(&self, writer: W, user_id: u64) -> Result<()> {
        let mut csv_writer = Writer::from_writer(writer);

        let balance = self
            .balance_for(user_id)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let balance_metric = format!("balance:{}", user_id);

        let rows = [
            ReportRow {
                metric: "records",
                value: self.records.to_string(),
            },
            ReportRow {
                metric: "total_debits",
                value: self.total_debits.to_string(),
            },
            ReportRow {
                metric: "total_credits",
                value: self.total_credits.to_string(),
            },
            ReportRow {
                metric: "autopay_starts",
                value: self.autopay_starts.to_string(),
            },
            ReportRow {
                metric: "autopay_ends",
                value: self.autopay_ends.to_string(),
            },
            ReportRow {
                metric: &balance_metric,
                value: balance,
            },
        ];

        for row in &rows {
            csv_writer.serialize(row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Running totals plus a per-user ledger.
///
/// Accumulation happens in strict stream order. Amounts are exact decimals,
/// so the result does not depend on that order.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: AggregateResult,
}

impl Aggregator {
    /// Creates an aggregator with zero totals and an empty ledger.
    pub fn new() -> Self {
        Aggregator {
            state: AggregateResult::default(),
        }
    }

    /// Folds one record into the totals.
    ///
    /// Fails without touching any state if a debit or credit has no amount,
    /// an amount that cannot be represented as a decimal, or would push a
    /// total or balance outside the decimal range.
    pub fn accept(&mut self, record: &Record) -> Result<()> {
        let user_id = record.user_id;
        let overflow = || LedgerError::AmountOverflow { user_id };

        match record.kind {
            RecordKind::Debit => {
                let amount = Self::amount_of(record)?;
                let total = self
                    .state
                    .total_debits
                    .checked_add(amount)
                    .ok_or_else(overflow)?;
                let balance = self
                    .current_balance(user_id)
                    .checked_sub(amount)
                    .ok_or_else(overflow)?;

                self.state.total_debits = total;
                self.state.balance_by_user.insert(user_id, balance);
                debug!("Debit {} from user {}", amount, user_id);
            }
            RecordKind::Credit => {
                let amount = Self::amount_of(record)?;
                let total = self
                    .state
                    .total_credits
                    .checked_add(amount)
                    .ok_or_else(overflow)?;
                let balance = self
                    .current_balance(user_id)
                    .checked_add(amount)
                    .ok_or_else(overflow)?;

                self.state.total_credits = total;
                self.state.balance_by_user.insert(user_id, balance);
                debug!("Credit {} to user {}", amount, user_id);
            }
            RecordKind::StartAutopay => {
                self.state.autopay_starts += 1;
                debug!("Autopay started for user {}", record.user_id);
            }
            RecordKind::EndAutopay => {
                self.state.autopay_ends += 1;
                debug!("Autopay ended for user {}", record.user_id);
            }
        }

        self.state.records += 1;
        Ok(())
    }

    /// Copy of the current totals.
    pub fn snapshot(&self) -> AggregateResult {
        self.state.clone()
    }

    /// Balance for a user, or `None` if the user is not in the ledger.
    ///
    /// A user whose credits and debits cancel out has `Some(0)`.
    pub fn balance_for(&self, user_id: u64) -> Option<Amount> {
        self.state.balance_for(user_id)
    }

    /// Consumes the aggregator, returning the final totals without copying.
    pub fn into_result(self) -> AggregateResult {
        self.state
    }

    fn current_balance(&self, user_id: u64) -> Amount {
        self.balance_for(user_id).unwrap_or(Amount::ZERO)
    }

    fn amount_of(record: &Record) -> Result<Amount> {
        let value = record.amount.ok_or(LedgerError::MissingAmount {
            kind: record.kind,
            user_id: record.user_id,
        })?;
        Amount::from_f64(value).ok_or(LedgerError::InvalidAmount {
            value,
            user_id: record.user_id,
        })
    }
}
