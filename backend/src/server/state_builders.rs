//! Builders wiring Diesel repositories and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use mess_backend::domain::{
    AccountService, AttendanceService, DashboardService, LocalCalendar, MembershipService,
    MenuService, MessDirectoryService, PlatformService, PollService,
};
use mess_backend::inbound::http::state::HttpState;
use mess_backend::outbound::identity::HttpIdentityProvider;
use mess_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselAttendanceRepository, DieselMembershipRepository,
    DieselMenuPostRepository, DieselMessRepository, DieselPollRepository,
};

/// Repositories shared between services.
struct Repositories {
    accounts: Arc<DieselAccountRepository>,
    messes: Arc<DieselMessRepository>,
    memberships: Arc<DieselMembershipRepository>,
    attendance: Arc<DieselAttendanceRepository>,
    menus: Arc<DieselMenuPostRepository>,
    polls: Arc<DieselPollRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            messes: Arc::new(DieselMessRepository::new(pool.clone())),
            memberships: Arc::new(DieselMembershipRepository::new(pool.clone())),
            attendance: Arc::new(DieselAttendanceRepository::new(pool.clone())),
            menus: Arc::new(DieselMenuPostRepository::new(pool.clone())),
            polls: Arc::new(DieselPollRepository::new(pool.clone())),
        }
    }
}

/// Build the handler state from a pool and identity adapter.
///
/// Services implementing both a command and a query port are shared
/// between the two slots.
pub(super) fn build_http_state(
    pool: &DbPool,
    identity: Arc<HttpIdentityProvider>,
    expiring_window_days: i64,
    calendar: LocalCalendar,
) -> web::Data<HttpState> {
    let repos = Repositories::new(pool);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let accounts = Arc::new(AccountService::new(repos.accounts.clone(), identity));
    let platform = PlatformService::new(
        repos.accounts,
        repos.messes.clone(),
        repos.memberships.clone(),
        clock.clone(),
    )
    .with_calendar(calendar);
    let memberships = Arc::new(
        MembershipService::new(repos.memberships.clone(), clock.clone()).with_calendar(calendar),
    );
    let attendance = Arc::new(
        AttendanceService::new(
            repos.attendance.clone(),
            repos.memberships.clone(),
            clock.clone(),
        )
        .with_calendar(calendar),
    );
    let menus = Arc::new(MenuService::new(repos.menus, clock.clone()));
    let polls = Arc::new(
        PollService::new(repos.polls, repos.memberships.clone(), clock.clone())
            .with_calendar(calendar),
    );
    let dashboard = DashboardService::new(repos.memberships, repos.attendance, clock)
        .with_expiring_window(expiring_window_days)
        .with_calendar(calendar);

    web::Data::new(HttpState {
        accounts: accounts.clone(),
        accounts_query: accounts,
        messes: Arc::new(MessDirectoryService::new(repos.messes)),
        memberships: memberships.clone(),
        memberships_query: memberships,
        attendance: attendance.clone(),
        attendance_query: attendance,
        menus: menus.clone(),
        menus_query: menus,
        polls: polls.clone(),
        polls_query: polls,
        dashboard: Arc::new(dashboard),
        platform: Arc::new(platform),
    })
}
