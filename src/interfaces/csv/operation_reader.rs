use crate::domain::account::AccountId;
use crate::error::{EscrowError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    /// Credit `amount` to `caller` (value entering the ledger).
    Fund,
    /// Register `account` as a loss account (owner only).
    Register,
    /// Set the rake rate to `amount` basis points (owner only).
    Rake,
    Create,
    Checkin,
    Finalize,
    Claim,
}

/// One row of a replay script. Which optional columns are required depends
/// on the operation; the engine reports violations per row.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OpType,
    /// Sets the clock to this instant before dispatching, when present.
    pub at: Option<i64>,
    pub caller: AccountId,
    pub id: Option<u64>,
    pub days: Option<u32>,
    pub account: Option<AccountId>,
    pub start: Option<i64>,
    pub title: Option<String>,
    pub amount: Option<Decimal>,
}

/// Reads replay operations from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Operation>`,
/// with whitespace trimming and flexible record lengths.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(EscrowError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "op, at, caller, id, days, account, start, title, amount";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\nfund, 0, 20, , , , , , 10.0\ncreate, 100, 20, , 7, 10, 86400, Morning run, 1.0"
        );
        let reader = OperationReader::new(data.as_bytes());
        let results: Vec<Result<Operation>> = reader.operations().collect();

        assert_eq!(results.len(), 2);
        let fund = results[0].as_ref().unwrap();
        assert_eq!(fund.op, OpType::Fund);
        assert_eq!(fund.caller, 20);
        assert_eq!(fund.amount, Some(dec!(10.0)));

        let create = results[1].as_ref().unwrap();
        assert_eq!(create.op, OpType::Create);
        assert_eq!(create.days, Some(7));
        assert_eq!(create.title.as_deref(), Some("Morning run"));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\nexplode, 0, 1, , , , , , ");
        let reader = OperationReader::new(data.as_bytes());
        let results: Vec<Result<Operation>> = reader.operations().collect();

        assert!(results[0].is_err());
    }

    #[test]
    fn test_reader_optional_columns_empty() {
        let data = format!("{HEADER}\ncheckin, 86400, 20, 0, , , , , ");
        let reader = OperationReader::new(data.as_bytes());
        let op = reader.operations().next().unwrap().unwrap();
        assert_eq!(op.op, OpType::Checkin);
        assert_eq!(op.id, Some(0));
        assert_eq!(op.amount, None);
    }
}
