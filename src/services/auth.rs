use std::time::Duration;

use crate::error::SessionError;
use crate::repositories::session::SessionStore;

/// Clears the server-side session for `token`, bounded by `timeout`.
///
/// A request without a token has nothing to clear and succeeds. A backend
/// that does not answer within `timeout` yields [`SessionError::Timeout`].
///
/// # Arguments
///
/// * `sessions` - The session store.
/// * `token` - The credential carried by the request, if any.
/// * `timeout` - Upper bound on the clear call.
///
/// # Returns
///
/// A `Result<()>`.
pub async fn end_session(
    sessions: &dyn SessionStore,
    token: Option<&str>,
    timeout: Duration,
) -> Result<(), SessionError> {
    let Some(token) = token else {
        tracing::debug!("No credential on request, nothing to clear");
        return Ok(());
    };

    match tokio::time::timeout(timeout, sessions.clear(token)).await {
        Ok(result) => result?,
        Err(_) => return Err(SessionError::Timeout(timeout.as_millis())),
    }

    tracing::info!("✅ Session cleared from {} store", sessions.name());
    Ok(())
}
