//! Account service: sign-in, actor resolution and password changes.
//!
//! Passwords live with the identity provider; this service only records
//! whether an account still carries the temporary password it was issued.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{AccountCommand, AccountQuery, AccountRepository, IdentityProvider};
use crate::domain::{AccountView, Actor, Credentials, Error, NewPassword, UserId};

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R, I> {
    accounts: Arc<R>,
    identity: Arc<I>,
}

impl<R, I> AccountService<R, I> {
    /// Create a new service over the account store and identity provider.
    pub fn new(accounts: Arc<R>, identity: Arc<I>) -> Self {
        Self { accounts, identity }
    }
}

#[async_trait]
impl<R, I> AccountCommand for AccountService<R, I>
where
    R: AccountRepository,
    I: IdentityProvider,
{
    async fn sign_in(&self, credentials: Credentials) -> Result<UserId, Error> {
        match self.identity.sign_in(&credentials).await {
            Ok(user) => {
                info!(user_id = %user, "signed in");
                Ok(user)
            }
            Err(error) => {
                warn!(%error, "sign-in failed");
                Err(error.into())
            }
        }
    }

    async fn change_password(&self, actor: &Actor, password: NewPassword) -> Result<(), Error> {
        self.identity
            .update_password(actor.user_id(), &password)
            .await?;
        self.accounts
            .clear_temporary_password(actor.user_id())
            .await?;
        info!(user_id = %actor.user_id(), "password changed");
        Ok(())
    }
}

#[async_trait]
impl<R, I> AccountQuery for AccountService<R, I>
where
    R: AccountRepository,
    I: IdentityProvider,
{
    async fn resolve_actor(&self, user: UserId) -> Result<Actor, Error> {
        let assignment = self
            .accounts
            .find_role(user)
            .await?
            .ok_or_else(|| Error::forbidden("account has no role"))?;
        Ok(Actor::new(
            assignment.user_id,
            assignment.role,
            assignment.mess_id,
        ))
    }

    async fn current_account(&self, actor: &Actor) -> Result<AccountView, Error> {
        let profile = self
            .accounts
            .find_profile(actor.user_id())
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        Ok(AccountView {
            profile,
            role: actor.role(),
            mess_id: actor.mess_id(),
        })
    }
}
