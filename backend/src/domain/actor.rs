//! The authenticated caller of a domain operation.
//!
//! An [`Actor`] is resolved once per request from the stored role assignment
//! and handed to each service call; services never consult ambient state to
//! decide who is acting.

use super::{Error, MarkedBy, MessId, UserId};

vocabulary!(
    /// Role granted to an account.
    Role, "role" {
        /// Manages every mess and owner.
        SuperAdmin => "super_admin",
        /// Runs a single mess.
        Owner => "owner",
        /// Subscribes to a mess.
        Member => "member",
    }
);

/// Caller identity passed into every authorised operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    role: Role,
    mess_id: Option<MessId>,
}

impl Actor {
    /// Build an actor from a role assignment.
    pub const fn new(user_id: UserId, role: Role, mess_id: Option<MessId>) -> Self {
        Self {
            user_id,
            role,
            mess_id,
        }
    }

    /// Account acting.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Role of the account.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Mess assigned to an owner, if any.
    pub const fn mess_id(&self) -> Option<MessId> {
        self.mess_id
    }

    /// Whether the actor may administer `mess`.
    ///
    /// Super-admins manage every mess; owners only the mess they are
    /// assigned to; members none.
    ///
    /// # Examples
    /// ```
    /// use mess_backend::domain::{Actor, MessId, Role, UserId};
    ///
    /// let mess = MessId::random();
    /// let owner = Actor::new(UserId::random(), Role::Owner, Some(mess));
    /// assert!(owner.manages(mess));
    /// assert!(!owner.manages(MessId::random()));
    /// ```
    pub fn manages(&self, mess: MessId) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::Owner => self.mess_id == Some(mess),
            Role::Member => false,
        }
    }

    /// Fail with `forbidden` unless the actor manages `mess`.
    pub fn ensure_manages(&self, mess: MessId) -> Result<(), Error> {
        if self.manages(mess) {
            Ok(())
        } else {
            Err(Error::forbidden("not permitted to manage this mess"))
        }
    }

    /// Fail with `forbidden` unless the actor is a super-admin.
    pub fn ensure_super_admin(&self) -> Result<(), Error> {
        if self.role == Role::SuperAdmin {
            Ok(())
        } else {
            Err(Error::forbidden("super-admin role required"))
        }
    }

    /// Attribution recorded when this actor marks attendance.
    pub const fn marked_by(&self) -> MarkedBy {
        match self.role {
            Role::Member => MarkedBy::Member,
            Role::Owner | Role::SuperAdmin => MarkedBy::Owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn super_admin_manages_any_mess() {
        let actor = Actor::new(UserId::random(), Role::SuperAdmin, None);
        assert!(actor.manages(MessId::random()));
        assert!(actor.ensure_super_admin().is_ok());
    }

    #[rstest]
    fn unassigned_owner_manages_nothing() {
        let actor = Actor::new(UserId::random(), Role::Owner, None);
        let err = actor
            .ensure_manages(MessId::random())
            .expect_err("owner without a mess");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn member_cannot_manage_own_mess() {
        let mess = MessId::random();
        let actor = Actor::new(UserId::random(), Role::Member, Some(mess));
        assert!(!actor.manages(mess));
    }

    #[rstest]
    #[case(Role::Member, MarkedBy::Member)]
    #[case(Role::Owner, MarkedBy::Owner)]
    #[case(Role::SuperAdmin, MarkedBy::Owner)]
    fn marked_by_follows_role(#[case] role: Role, #[case] expected: MarkedBy) {
        let actor = Actor::new(UserId::random(), role, None);
        assert_eq!(actor.marked_by(), expected);
    }
}
