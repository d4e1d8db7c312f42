//! Caller resolution for HTTP handlers.
//!
//! Turns the account id held in the session cookie into the [`Actor`] that
//! every authorised domain call receives.

use crate::domain::{Actor, Error};

use super::session::SessionContext;
use super::state::HttpState;

/// Resolve the signed-in caller or fail with `401 Unauthorized`.
pub(crate) async fn require_actor(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Actor, Error> {
    let user = session.require_user_id()?;
    state.accounts_query.resolve_actor(user).await
}
