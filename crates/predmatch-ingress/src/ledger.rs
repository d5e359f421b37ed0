//! Account balance operations outside of trading.

use predmatch_types::{AccountFundedEvent, AccountId, MarketEvent, PredmatchError, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::context::EngineContext;

/// Credit the configured starter grant to an account whose balance is
/// exactly zero and publish `AccountFunded`. Returns the new balance.
///
/// # Errors
/// - `AccountNotFound` if the account does not exist
/// - `GrantUnavailable` if the balance is not zero (also when a concurrent
///   change lands between the read and the credit)
pub fn claim_starter_grant(ctx: &EngineContext<'_>, account_id: AccountId) -> Result<Decimal> {
    let account = ctx.store.account(account_id)?;
    if !account.balance.is_zero() {
        warn!(%account_id, balance = %account.balance, "Starter grant refused");
        return Err(PredmatchError::GrantUnavailable {
            balance: account.balance,
        });
    }

    let grant = ctx.config.starter_grant;
    let balance = match ctx
        .store
        .apply_balance_delta_if(account_id, Decimal::ZERO, grant)
    {
        Ok(balance) => balance,
        Err(PredmatchError::WriteConflict { .. }) => {
            let current = ctx.store.account(account_id)?.balance;
            warn!(%account_id, balance = %current, "Starter grant lost race");
            return Err(PredmatchError::GrantUnavailable { balance: current });
        }
        Err(e) => return Err(e),
    };

    info!(%account_id, %grant, %balance, "Starter grant credited");
    ctx.publish([MarketEvent::AccountFunded(AccountFundedEvent {
        account_id,
        amount: grant,
        new_balance: balance,
    })]);
    Ok(balance)
}
