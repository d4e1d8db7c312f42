//! In-memory implementations of the driven ports.
//!
//! These back the behaviour suites and enforce the same uniqueness rules as
//! the database schema: one attendance record per slot, one vote per user
//! per poll and one mess per owner.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::ports::{
    AccountRepository, AttendanceRepository, IdentityProvider, IdentityProviderError,
    MembershipRepository, MenuPostRepository, MessRepository, PollRepository, StoreError,
};
use crate::domain::{
    Area, AreaId, AttendanceRecord, AttendanceSlot, Credentials, FeedEntry, MealType, Membership,
    MembershipId, MenuPost, Mess, MessId, NewPassword, Poll, PollId, PollStatus, PollVote,
    Profile, Role, RoleAssignment, StoredMembershipStatus, UserId,
};

fn to_count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("in-memory store mutex poisoned"),
    }
}

/// Membership store keyed by id.
#[derive(Default)]
pub struct InMemoryMemberships {
    records: Mutex<Vec<Membership>>,
}

impl InMemoryMemberships {
    /// Seed a membership directly.
    pub fn seed(&self, membership: Membership) {
        lock(&self.records).push(membership);
    }

    fn mess_of(&self, id: MembershipId) -> Option<MessId> {
        lock(&self.records)
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.mess_id)
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMemberships {
    async fn insert(&self, membership: &Membership) -> Result<(), StoreError> {
        let mut records = lock(&self.records);
        if records.iter().any(|m| m.id == membership.id) {
            return Err(StoreError::conflict("memberships_pkey"));
        }
        records.push(membership.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MembershipId) -> Result<Option<Membership>, StoreError> {
        Ok(lock(&self.records).iter().find(|m| m.id == id).cloned())
    }

    async fn find_latest_for_user(
        &self,
        user: UserId,
        mess: Option<MessId>,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .filter(|m| m.user_id == user)
            .filter(|m| mess.is_none_or(|wanted| m.mess_id == wanted))
            .max_by_key(|m| m.start_date)
            .cloned())
    }

    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<Membership>, StoreError> {
        let mut found: Vec<Membership> = lock(&self.records)
            .iter()
            .filter(|m| m.mess_id == mess)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(found)
    }

    async fn list_ending_between(
        &self,
        mess: MessId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Membership>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .filter(|m| m.mess_id == mess && m.end_date >= from && m.end_date <= to)
            .cloned()
            .collect())
    }

    async fn list_ending_from(&self, from: NaiveDate) -> Result<Vec<Membership>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .filter(|m| m.stored_status != StoredMembershipStatus::Expired && m.end_date >= from)
            .cloned()
            .collect())
    }

    async fn update_term(
        &self,
        id: MembershipId,
        end_date: NaiveDate,
        status: StoredMembershipStatus,
    ) -> Result<(), StoreError> {
        if let Some(record) = lock(&self.records).iter_mut().find(|m| m.id == id) {
            record.end_date = end_date;
            record.stored_status = status;
        }
        Ok(())
    }
}

/// Attendance store with one record per slot.
pub struct InMemoryAttendance {
    memberships: Arc<InMemoryMemberships>,
    records: Mutex<Vec<AttendanceRecord>>,
}

impl InMemoryAttendance {
    /// Create a store that resolves messes through `memberships`.
    pub fn new(memberships: Arc<InMemoryMemberships>) -> Self {
        Self {
            memberships,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored rows for a slot.
    pub fn records_for(&self, slot: AttendanceSlot) -> usize {
        lock(&self.records)
            .iter()
            .filter(|r| r.slot() == slot)
            .count()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendance {
    async fn find_slot(&self, slot: AttendanceSlot) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(lock(&self.records).iter().find(|r| r.slot() == slot).cloned())
    }

    async fn upsert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let mut records = lock(&self.records);
        let slot = record.slot();
        if let Some(existing) = records.iter_mut().find(|r| r.slot() == slot) {
            *existing = AttendanceRecord {
                id: existing.id,
                ..record.clone()
            };
            return Ok(existing.clone());
        }
        records.push(record.clone());
        Ok(record.clone())
    }

    async fn list_for_membership(
        &self,
        membership: MembershipId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .filter(|r| r.membership_id == membership && r.date >= from && r.date <= to)
            .cloned()
            .collect())
    }

    async fn list_for_mess_slot(
        &self,
        mess: MessId,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let candidates: Vec<AttendanceRecord> = lock(&self.records)
            .iter()
            .filter(|r| r.date == date && r.meal_type == meal)
            .cloned()
            .collect();
        Ok(candidates
            .into_iter()
            .filter(|r| self.memberships.mess_of(r.membership_id) == Some(mess))
            .collect())
    }
}

/// Poll and vote store.
#[derive(Default)]
pub struct InMemoryPolls {
    polls: Mutex<Vec<Poll>>,
    votes: Mutex<Vec<PollVote>>,
}

#[async_trait]
impl PollRepository for InMemoryPolls {
    async fn insert(&self, poll: &Poll) -> Result<(), StoreError> {
        lock(&self.polls).push(poll.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PollId) -> Result<Option<Poll>, StoreError> {
        Ok(lock(&self.polls).iter().find(|p| p.id == id).cloned())
    }

    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<Poll>, StoreError> {
        Ok(lock(&self.polls)
            .iter()
            .filter(|p| p.mess_id == mess)
            .cloned()
            .collect())
    }

    async fn close(&self, id: PollId, winning_option: Option<usize>) -> Result<bool, StoreError> {
        let mut polls = lock(&self.polls);
        let Some(poll) = polls
            .iter_mut()
            .find(|p| p.id == id && p.status == PollStatus::Active)
        else {
            return Ok(false);
        };
        poll.status = PollStatus::Closed;
        poll.winning_option = winning_option;
        Ok(true)
    }

    async fn find_vote(&self, poll: PollId, user: UserId) -> Result<Option<PollVote>, StoreError> {
        Ok(lock(&self.votes)
            .iter()
            .find(|v| v.poll_id == poll && v.user_id == user)
            .cloned())
    }

    async fn insert_vote(&self, vote: &PollVote) -> Result<(), StoreError> {
        let mut votes = lock(&self.votes);
        if votes
            .iter()
            .any(|v| v.poll_id == vote.poll_id && v.user_id == vote.user_id)
        {
            return Err(StoreError::conflict("poll_votes_poll_id_user_id_key"));
        }
        votes.push(vote.clone());
        Ok(())
    }

    async fn list_votes(&self, poll: PollId) -> Result<Vec<PollVote>, StoreError> {
        Ok(lock(&self.votes)
            .iter()
            .filter(|v| v.poll_id == poll)
            .cloned()
            .collect())
    }

    async fn count_votes(&self, poll: PollId) -> Result<u64, StoreError> {
        let count = lock(&self.votes)
            .iter()
            .filter(|v| v.poll_id == poll)
            .count();
        Ok(to_count(count))
    }
}

/// Mess and area store linking owners through an [`InMemoryAccounts`].
pub struct InMemoryMesses {
    accounts: Arc<InMemoryAccounts>,
    areas: Mutex<Vec<Area>>,
    messes: Mutex<Vec<Mess>>,
}

impl InMemoryMesses {
    /// Create a store whose inserts link owners in `accounts`.
    pub fn new(accounts: Arc<InMemoryAccounts>) -> Self {
        Self {
            accounts,
            areas: Mutex::new(Vec::new()),
            messes: Mutex::new(Vec::new()),
        }
    }

    /// Seed an area.
    pub fn seed_area(&self, area: Area) {
        lock(&self.areas).push(area);
    }

    /// Seed a mess.
    pub fn seed_mess(&self, mess: Mess) {
        lock(&self.messes).push(mess);
    }

    /// Mess and area names for the feed; `None` for unknown or unlisted messes.
    fn feed_names_for(&self, mess: MessId) -> Option<(String, Option<String>)> {
        let record = lock(&self.messes)
            .iter()
            .find(|m| m.id == mess && m.is_active)
            .cloned()?;
        let area_name = record.area_id.and_then(|area| {
            lock(&self.areas)
                .iter()
                .find(|a| a.id == area)
                .map(|a| a.name.clone())
        });
        Some((record.name, area_name))
    }
}

#[async_trait]
impl MessRepository for InMemoryMesses {
    async fn list_areas(&self) -> Result<Vec<Area>, StoreError> {
        Ok(lock(&self.areas).clone())
    }

    async fn list_messes(&self, area: Option<AreaId>) -> Result<Vec<Mess>, StoreError> {
        Ok(lock(&self.messes)
            .iter()
            .filter(|m| area.is_none() || m.area_id == area)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: MessId) -> Result<Option<Mess>, StoreError> {
        Ok(lock(&self.messes).iter().find(|m| m.id == id).cloned())
    }

    async fn insert(&self, mess: &Mess) -> Result<(), StoreError> {
        let mut messes = lock(&self.messes);
        if messes.iter().any(|m| m.id == mess.id) {
            return Err(StoreError::conflict("messes_pkey"));
        }
        if let Some(owner) = mess.owner_id {
            self.accounts.link_owner(owner, mess.id)?;
        }
        messes.push(mess.clone());
        Ok(())
    }

    async fn count_messes(&self) -> Result<u64, StoreError> {
        Ok(to_count(lock(&self.messes).len()))
    }

    async fn update_profile(&self, mess: &Mess) -> Result<(), StoreError> {
        if let Some(record) = lock(&self.messes).iter_mut().find(|m| m.id == mess.id) {
            *record = mess.clone();
        }
        Ok(())
    }

    async fn set_active(&self, id: MessId, active: bool) -> Result<(), StoreError> {
        if let Some(record) = lock(&self.messes).iter_mut().find(|m| m.id == id) {
            record.is_active = active;
        }
        Ok(())
    }
}

/// Menu post store joined against an [`InMemoryMesses`] for the feed.
pub struct InMemoryMenuPosts {
    messes: Arc<InMemoryMesses>,
    posts: Mutex<Vec<MenuPost>>,
}

impl InMemoryMenuPosts {
    /// Create a store that resolves mess and area names through `messes`.
    pub fn new(messes: Arc<InMemoryMesses>) -> Self {
        Self {
            messes,
            posts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MenuPostRepository for InMemoryMenuPosts {
    async fn insert(&self, post: &MenuPost) -> Result<(), StoreError> {
        lock(&self.posts).push(post.clone());
        Ok(())
    }

    async fn list_live_for_mess(
        &self,
        mess: MessId,
        now: DateTime<Utc>,
    ) -> Result<Vec<MenuPost>, StoreError> {
        Ok(lock(&self.posts)
            .iter()
            .filter(|p| p.mess_id == mess && p.expiry_time > now)
            .cloned()
            .collect())
    }

    async fn list_live_feed(
        &self,
        meal: Option<MealType>,
        veg_only: bool,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<FeedEntry>, StoreError> {
        let mut posts: Vec<MenuPost> = lock(&self.posts)
            .iter()
            .filter(|p| p.expiry_time > now)
            .filter(|p| meal.is_none_or(|wanted| p.meal_type == wanted))
            .filter(|p| !veg_only || p.is_veg)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .filter_map(|post| {
                let (mess_name, area_name) = self.messes.feed_names_for(post.mess_id)?;
                Some(FeedEntry {
                    post,
                    mess_name,
                    area_name,
                })
            })
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn list_for_mess(&self, mess: MessId) -> Result<Vec<MenuPost>, StoreError> {
        Ok(lock(&self.posts)
            .iter()
            .filter(|p| p.mess_id == mess)
            .cloned()
            .collect())
    }
}

/// Profiles, roles and passwords in one place; doubles as the identity
/// provider.
#[derive(Default)]
pub struct InMemoryAccounts {
    profiles: Mutex<HashMap<UserId, Profile>>,
    roles: Mutex<HashMap<UserId, RoleAssignment>>,
    passwords: Mutex<HashMap<String, (UserId, String)>>,
}

impl InMemoryAccounts {
    /// Register an account with its role and password.
    pub fn seed(&self, profile: Profile, assignment: RoleAssignment, password: &str) {
        lock(&self.passwords).insert(
            profile.email.clone(),
            (profile.id, password.to_owned()),
        );
        lock(&self.roles).insert(assignment.user_id, assignment);
        lock(&self.profiles).insert(profile.id, profile);
    }

    /// Assign `mess` to an owner without one; anything else conflicts.
    fn link_owner(&self, owner: UserId, mess: MessId) -> Result<(), StoreError> {
        let mut roles = lock(&self.roles);
        match roles.get_mut(&owner) {
            Some(assignment) if assignment.role == Role::Owner && assignment.mess_id.is_none() => {
                assignment.mess_id = Some(mess);
                Ok(())
            }
            _ => Err(StoreError::conflict("user_roles_owner_unassigned")),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_profile(&self, user: UserId) -> Result<Option<Profile>, StoreError> {
        Ok(lock(&self.profiles).get(&user).cloned())
    }

    async fn find_role(&self, user: UserId) -> Result<Option<RoleAssignment>, StoreError> {
        Ok(lock(&self.roles).get(&user).copied())
    }

    async fn clear_temporary_password(&self, user: UserId) -> Result<(), StoreError> {
        if let Some(profile) = lock(&self.profiles).get_mut(&user) {
            profile.has_temporary_password = false;
        }
        Ok(())
    }

    async fn list_unassigned_owners(&self) -> Result<Vec<Profile>, StoreError> {
        let unassigned: Vec<UserId> = lock(&self.roles)
            .values()
            .filter(|a| a.role == Role::Owner && a.mess_id.is_none())
            .map(|a| a.user_id)
            .collect();
        let profiles = lock(&self.profiles);
        let mut owners: Vec<Profile> = unassigned
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect();
        owners.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(owners)
    }

    async fn count_with_role(&self, role: Role) -> Result<u64, StoreError> {
        let count = lock(&self.roles).values().filter(|a| a.role == role).count();
        Ok(to_count(count))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryAccounts {
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, IdentityProviderError> {
        match lock(&self.passwords).get(credentials.email()) {
            Some((user, password)) if password == credentials.password() => Ok(*user),
            _ => Err(IdentityProviderError::InvalidCredentials),
        }
    }

    async fn update_password(
        &self,
        user: UserId,
        password: &NewPassword,
    ) -> Result<(), IdentityProviderError> {
        let mut passwords = lock(&self.passwords);
        let Some(entry) = passwords.values_mut().find(|(id, _)| *id == user) else {
            return Err(IdentityProviderError::rejected(404, "user not found"));
        };
        entry.1 = password.expose().to_owned();
        Ok(())
    }
}
