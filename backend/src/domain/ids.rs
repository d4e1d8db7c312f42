//! Strongly typed identifiers for domain records.
//!
//! Every record is keyed by a UUID; wrapping each key in its own newtype keeps
//! a poll id from being passed where a membership id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Borrow the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(
    /// Account identifier shared with the identity provider.
    UserId
);
uuid_id!(
    /// Mess (meal subscription business) identifier.
    MessId
);
uuid_id!(
    /// Neighbourhood area identifier.
    AreaId
);
uuid_id!(
    /// Membership identifier.
    MembershipId
);
uuid_id!(
    /// Attendance record identifier.
    AttendanceId
);
uuid_id!(
    /// Menu post identifier.
    MenuPostId
);
uuid_id!(
    /// Poll identifier.
    PollId
);
uuid_id!(
    /// Poll vote identifier.
    VoteId
);
