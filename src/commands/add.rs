use crate::commands::Out;
use crate::model::{Amount, Transaction};
use crate::{auth, Config, Ledger, Result};

/// Records a transaction for a child. Password-gated.
///
/// A positive amount adds funds, a negative amount spends; zero is rejected. The
/// child's name is normalized before it is stored.
pub async fn add(
    config: &Config,
    password: Option<&str>,
    child: &str,
    amount: Amount,
    reason: &str,
) -> Result<Out<Transaction>> {
    auth::unlock(config, password)?;
    let mut ledger = Ledger::load(config.ledger_path()).await?;
    let entry = ledger.append(child, amount, reason).await?;
    let message = format!(
        "Transaction added for {}: R {}",
        entry.child(),
        entry.amount()
    );
    Ok(Out::new(message, entry))
}
