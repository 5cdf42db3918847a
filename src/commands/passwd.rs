use crate::commands::Out;
use crate::{auth, Config, Result};

/// Changes the shared password. The current password is required first; the new one
/// is prompted for (typed twice) and its digest is persisted immediately.
pub async fn passwd(config: &mut Config, password: Option<&str>) -> Result<Out<()>> {
    auth::unlock(config, password)?;
    let new_password = auth::prompt_new_password()?;
    config.set_password_hash(auth::hash_password(&new_password));
    config.save().await?;
    Ok("The password has been updated.".into())
}
