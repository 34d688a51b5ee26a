//! Coin ledger over the stored balance record.

use crate::records::{MalformedRecord, RecordStore};
use eyre::{Context, Result};

/// Record holding the coin balance as a single integer.
pub const COINS_FILE: &str = "Coins.txt";

/// Errors for balance mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinError {
    /// Debit larger than the current balance.
    InsufficientFunds { balance: u32, cost: u32 },
}

impl std::fmt::Display for CoinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinError::InsufficientFunds { balance, cost } => {
                write!(f, "not enough coins: have {}, need {}", balance, cost)
            }
        }
    }
}

impl std::error::Error for CoinError {}

/// Persistent coin balance. Every mutation reads the stored balance,
/// applies the change, and writes the result back.
pub struct CoinLedger {
    records: RecordStore,
}

impl CoinLedger {
    pub fn new(records: RecordStore) -> Self {
        CoinLedger { records }
    }

    /// Create the balance record at zero if absent. Returns true when a
    /// fresh record was written.
    pub fn initialize(&self) -> Result<bool> {
        self.records.create_if_missing(COINS_FILE, "0")
    }

    /// Current balance. The record must exist; `initialize` creates it.
    pub fn balance(&self) -> Result<u32> {
        let raw = self
            .records
            .read_scalar(COINS_FILE)?
            .ok_or_else(|| eyre::eyre!("coin record missing; initialize the store first"))?;
        raw.parse().map_err(|_| {
            eyre::eyre!(MalformedRecord {
                record: COINS_FILE.to_string(),
                detail: format!("expected a non-negative integer, found {:?}", raw),
            })
        })
    }

    /// Add coins and return the new balance.
    pub fn credit(&self, amount: u32) -> Result<u32> {
        let updated = self.balance()?.saturating_add(amount);
        self.write(updated)?;
        Ok(updated)
    }

    /// Remove coins and return the new balance. The stored balance is left
    /// untouched when it cannot cover the debit.
    pub fn debit(&self, amount: u32) -> Result<u32> {
        let balance = self.balance()?;
        let Some(updated) = balance.checked_sub(amount) else {
            return Err(eyre::eyre!(CoinError::InsufficientFunds {
                balance,
                cost: amount,
            }));
        };
        self.write(updated)?;
        Ok(updated)
    }

    fn write(&self, balance: u32) -> Result<()> {
        self.records
            .write_scalar(COINS_FILE, &balance.to_string())
            .context("Failed to write coin balance")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CoinLedger) {
        let temp = TempDir::new().unwrap();
        let records = RecordStore::open(temp.path()).unwrap();
        let ledger = CoinLedger::new(records);
        ledger.initialize().unwrap();
        (temp, ledger)
    }

    #[test]
    fn test_initialize_starts_at_zero() {
        let (_temp, ledger) = setup();
        assert_eq!(ledger.balance().unwrap(), 0);
    }

    #[test]
    fn test_initialize_preserves_existing_balance() {
        let (_temp, ledger) = setup();
        ledger.credit(25).unwrap();
        assert!(!ledger.initialize().unwrap());
        assert_eq!(ledger.balance().unwrap(), 25);
    }

    #[test]
    fn test_credit_and_debit() {
        let (_temp, ledger) = setup();
        assert_eq!(ledger.credit(30).unwrap(), 30);
        assert_eq!(ledger.debit(10).unwrap(), 20);
        assert_eq!(ledger.balance().unwrap(), 20);
    }

    #[test]
    fn test_debit_insufficient_leaves_balance_untouched() {
        let (_temp, ledger) = setup();
        ledger.credit(5).unwrap();
        let err = ledger.debit(10).unwrap_err();
        let coin_err = err.downcast_ref::<CoinError>().unwrap();
        assert_eq!(
            *coin_err,
            CoinError::InsufficientFunds {
                balance: 5,
                cost: 10
            }
        );
        assert_eq!(ledger.balance().unwrap(), 5);
    }

    #[test]
    fn test_missing_record_is_an_error() {
        let temp = TempDir::new().unwrap();
        let records = RecordStore::open(temp.path()).unwrap();
        let ledger = CoinLedger::new(records);
        assert!(ledger.balance().is_err());
    }

    #[test]
    fn test_malformed_balance_is_an_error() {
        let (temp, ledger) = setup();
        std::fs::write(temp.path().join(COINS_FILE), "lots\n").unwrap();
        let err = ledger.balance().unwrap_err();
        assert!(err.downcast_ref::<MalformedRecord>().is_some());
    }
}
