//! # Account Balances
//!
//! A user's token and point balances behind a single lock.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHY ONE MUTEX FOR BOTH BALANCES                                        │
//! │                                                                         │
//! │  Two independent atomics cannot make "check, then debit" atomic:       │
//! │                                                                         │
//! │    thread A: tokens >= 100? yes          thread B: tokens >= 100? yes  │
//! │    thread A: tokens -= 100               thread B: tokens -= 100       │
//! │                          → tokens = -100                                │
//! │                                                                         │
//! │  Here every check and its write happen inside one critical section,    │
//! │  and blended purchases debit points AND tokens under the same guard.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{BalanceKind, CashierError, CashierResult, StoreError};

/// A point-in-time view of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub tokens: u64,
    pub points: u64,
}

/// Token and point balances of one user.
#[derive(Debug, Default)]
pub struct Account {
    balance: Mutex<Balance>,
}

impl Account {
    /// Creates an account with zero balances.
    pub fn new() -> Self {
        Account::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Balance>, StoreError> {
        self.balance
            .lock()
            .map_err(|_| StoreError::Poisoned("account"))
    }

    /// Reads both balances atomically.
    pub fn balance(&self) -> Result<Balance, StoreError> {
        Ok(*self.lock()?)
    }

    /// Adds tokens and returns the new token balance.
    pub fn credit_tokens(&self, amount: u64) -> CashierResult<u64> {
        let mut balance = self.lock()?;
        balance.tokens = balance
            .tokens
            .checked_add(amount)
            .ok_or(CashierError::BalanceOverflow {
                kind: BalanceKind::Token,
            })?;
        Ok(balance.tokens)
    }

    /// Adds points and returns the new point balance.
    pub fn credit_points(&self, amount: u64) -> CashierResult<u64> {
        let mut balance = self.lock()?;
        balance.points = balance
            .points
            .checked_add(amount)
            .ok_or(CashierError::BalanceOverflow {
                kind: BalanceKind::Point,
            })?;
        Ok(balance.points)
    }

    /// Removes tokens and returns the new token balance.
    pub fn debit_tokens(&self, amount: u64) -> CashierResult<u64> {
        let mut balance = self.lock()?;
        if balance.tokens < amount {
            return Err(CashierError::insufficient_tokens(balance.tokens, amount));
        }
        balance.tokens -= amount;
        Ok(balance.tokens)
    }

    /// Removes points and returns the new point balance.
    pub fn debit_points(&self, amount: u64) -> CashierResult<u64> {
        let mut balance = self.lock()?;
        if balance.points < amount {
            return Err(CashierError::insufficient_points(balance.points, amount));
        }
        balance.points -= amount;
        Ok(balance.points)
    }

    /// Removes points and tokens as one unit.
    ///
    /// Points are checked first, then tokens; if either check fails nothing
    /// is written.
    pub fn debit_both(&self, points: u64, tokens: u64) -> CashierResult<Balance> {
        let mut balance = self.lock()?;
        if balance.points < points {
            return Err(CashierError::insufficient_points(balance.points, points));
        }
        if balance.tokens < tokens {
            return Err(CashierError::insufficient_tokens(balance.tokens, tokens));
        }
        balance.points -= points;
        balance.tokens -= tokens;
        Ok(*balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_account_is_empty() {
        let account = Account::new();
        assert_eq!(account.balance().unwrap(), Balance::default());
    }

    #[test]
    fn test_credit_and_debit() {
        let account = Account::new();
        assert_eq!(account.credit_tokens(100).unwrap(), 100);
        assert_eq!(account.debit_tokens(30).unwrap(), 70);
        assert_eq!(account.credit_points(50).unwrap(), 50);
        assert_eq!(account.debit_points(50).unwrap(), 0);
    }

    #[test]
    fn test_debit_rejects_overdraft_without_mutation() {
        let account = Account::new();
        account.credit_tokens(10).unwrap();

        let err = account.debit_tokens(11).unwrap_err();
        assert!(matches!(
            err,
            CashierError::InsufficientBalance {
                kind: BalanceKind::Token,
                available: 10,
                required: 11
            }
        ));
        assert_eq!(account.balance().unwrap().tokens, 10);
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let account = Account::new();
        account.credit_points(u64::MAX).unwrap();
        assert!(matches!(
            account.credit_points(1),
            Err(CashierError::BalanceOverflow {
                kind: BalanceKind::Point
            })
        ));
        assert_eq!(account.balance().unwrap().points, u64::MAX);
    }

    #[test]
    fn test_debit_both_is_all_or_nothing() {
        let account = Account::new();
        account.credit_points(100).unwrap();
        account.credit_tokens(5).unwrap();

        // points pass, tokens fail: nothing written
        let err = account.debit_both(40, 10).unwrap_err();
        assert!(matches!(
            err,
            CashierError::InsufficientBalance {
                kind: BalanceKind::Token,
                ..
            }
        ));
        assert_eq!(
            account.balance().unwrap(),
            Balance {
                tokens: 5,
                points: 100
            }
        );

        let after = account.debit_both(40, 5).unwrap();
        assert_eq!(after, Balance { tokens: 0, points: 60 });
    }

    #[test]
    fn test_concurrent_debits_never_overdraw() {
        let account = Arc::new(Account::new());
        account.credit_tokens(1_000).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let account = Arc::clone(&account);
                thread::spawn(move || {
                    let mut succeeded = 0u64;
                    for _ in 0..50 {
                        if account.debit_tokens(7).is_ok() {
                            succeeded += 1;
                        }
                    }
                    succeeded
                })
            })
            .collect();

        let succeeded: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        let remaining = account.balance().unwrap().tokens;

        assert_eq!(succeeded, 1_000 / 7);
        assert_eq!(remaining, 1_000 - succeeded * 7);
    }
}
