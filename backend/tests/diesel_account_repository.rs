//! Integration tests for `DieselAccountRepository` against embedded
//! PostgreSQL.

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{PgContext, handle_cluster_setup_failure};
use mess_backend::domain::ports::AccountRepository;
use mess_backend::domain::{Role, UserId};
use mess_backend::outbound::persistence::DieselAccountRepository;
use rstest::{fixture, rstest};
use uuid::Uuid;

const TEST_DB: &str = "diesel_account_repo_test";

struct TestContext {
    pg: PgContext,
    accounts: DieselAccountRepository,
    ravi: Uuid,
    meera: Uuid,
    running: Uuid,
    member: Uuid,
}

fn setup_context() -> Result<TestContext, String> {
    let pg = PgContext::new(TEST_DB)?;
    let mess = Uuid::new_v4();
    let ravi = Uuid::new_v4();
    let meera = Uuid::new_v4();
    let running = Uuid::new_v4();
    let member = Uuid::new_v4();
    pg.seed_mess(mess, "Annapurna");
    pg.seed_account(ravi, "Ravi", "owner", None);
    pg.seed_account(meera, "Meera", "owner", None);
    pg.seed_account(running, "Sunita", "owner", Some(mess));
    pg.seed_account(member, "Asha", "member", None);
    let accounts = DieselAccountRepository::new(pg.pool.clone());
    Ok(TestContext {
        pg,
        accounts,
        ravi,
        meera,
        running,
        member,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn unassigned_owners_are_sorted_by_name(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unassigned_owners_are_sorted_by_name skipped");
        return;
    };

    let owners = context
        .pg
        .runtime
        .block_on(context.accounts.list_unassigned_owners())
        .expect("owners listed");

    let ids: Vec<Uuid> = owners.iter().map(|profile| *profile.id.as_uuid()).collect();
    assert_eq!(ids, vec![context.meera, context.ravi]);
    assert!(!ids.contains(&context.running));
}

#[rstest]
fn counts_accounts_per_role(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: counts_accounts_per_role skipped");
        return;
    };
    let runtime = &context.pg.runtime;

    let owners = runtime
        .block_on(context.accounts.count_with_role(Role::Owner))
        .expect("owners counted");
    let members = runtime
        .block_on(context.accounts.count_with_role(Role::Member))
        .expect("members counted");
    let admins = runtime
        .block_on(context.accounts.count_with_role(Role::SuperAdmin))
        .expect("admins counted");

    assert_eq!((owners, members, admins), (3, 1, 0));
}

#[rstest]
fn clearing_the_temporary_password_sticks(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: clearing_the_temporary_password_sticks skipped");
        return;
    };
    let member = UserId::from_uuid(context.member);
    let runtime = &context.pg.runtime;

    let before = runtime
        .block_on(context.accounts.find_profile(member))
        .expect("profile read")
        .expect("profile exists");
    runtime
        .block_on(context.accounts.clear_temporary_password(member))
        .expect("password cleared");
    let after = runtime
        .block_on(context.accounts.find_profile(member))
        .expect("profile read")
        .expect("profile exists");
    let role = runtime
        .block_on(context.accounts.find_role(member))
        .expect("role read")
        .expect("role exists");

    assert!(before.has_temporary_password);
    assert!(!after.has_temporary_password);
    assert_eq!(role.role, Role::Member);
    assert_eq!(
        context
            .pg
            .count_where("profiles", "id = $1 AND temp_password IS NULL", &context.member),
        1
    );
}
