//! Integration tests for `DieselMessRepository` against embedded PostgreSQL.
//!
//! Covers the transactional owner link on insert and the profile changeset,
//! which must leave the owner and listing flag untouched.

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;

use embedded_postgres::{PgContext, handle_cluster_setup_failure};
use mess_backend::domain::ports::{AccountRepository, MessRepository, StoreError};
use mess_backend::domain::{Mess, MessId, Role, UserId};
use mess_backend::outbound::persistence::{DieselAccountRepository, DieselMessRepository};
use rstest::{fixture, rstest};
use uuid::Uuid;

const TEST_DB: &str = "diesel_mess_repo_test";

struct TestContext {
    pg: PgContext,
    messes: DieselMessRepository,
    accounts: DieselAccountRepository,
    owner: UserId,
}

fn setup_context() -> Result<TestContext, String> {
    let pg = PgContext::new(TEST_DB)?;
    let owner = Uuid::new_v4();
    pg.seed_account(owner, "Meera", "owner", None);
    let messes = DieselMessRepository::new(pg.pool.clone());
    let accounts = DieselAccountRepository::new(pg.pool.clone());
    Ok(TestContext {
        pg,
        messes,
        accounts,
        owner: UserId::from_uuid(owner),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn mess(name: &str, owner: Option<UserId>) -> Mess {
    Mess {
        id: MessId::random(),
        name: name.to_owned(),
        tagline: Some("Ghar jaisa khana".into()),
        speciality: Some("Maharashtrian thali".into()),
        address: Some("FC Road".into()),
        latitude: Some(18.52),
        longitude: Some(73.84),
        contact_number: None,
        owner_id: owner,
        area_id: None,
        is_active: true,
    }
}

#[rstest]
fn insert_links_the_unassigned_owner(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: insert_links_the_unassigned_owner skipped");
        return;
    };
    let created = mess("Annapurna", Some(context.owner));
    let runtime = &context.pg.runtime;

    runtime
        .block_on(context.messes.insert(&created))
        .expect("mess inserted");
    let stored = runtime
        .block_on(context.messes.find_by_id(created.id))
        .expect("mess read");
    let role = runtime
        .block_on(context.accounts.find_role(context.owner))
        .expect("role read")
        .expect("role exists");
    let unassigned = runtime
        .block_on(context.accounts.list_unassigned_owners())
        .expect("owners listed");

    assert_eq!(stored, Some(created.clone()));
    assert_eq!(role.role, Role::Owner);
    assert_eq!(role.mess_id, Some(created.id));
    assert!(unassigned.is_empty());
}

#[rstest]
fn insert_for_assigned_owner_rolls_back(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: insert_for_assigned_owner_rolls_back skipped");
        return;
    };
    let first = mess("Annapurna", Some(context.owner));
    let second = mess("Sugran", Some(context.owner));
    let runtime = &context.pg.runtime;

    runtime
        .block_on(context.messes.insert(&first))
        .expect("first mess inserted");
    let error = runtime
        .block_on(context.messes.insert(&second))
        .expect_err("owner already runs a mess");
    let rolled_back = runtime
        .block_on(context.messes.find_by_id(second.id))
        .expect("mess read");
    let count = runtime
        .block_on(context.messes.count_messes())
        .expect("messes counted");

    assert!(matches!(error, StoreError::Conflict { .. }), "{error:?}");
    assert_eq!(rolled_back, None, "the mess row is rolled back");
    assert_eq!(count, 1);
}

#[rstest]
fn insert_with_unknown_area_is_a_missing_reference(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: insert_with_unknown_area_is_a_missing_reference skipped");
        return;
    };
    let mut orphan = mess("Annapurna", None);
    orphan.area_id = Some(mess_backend::domain::AreaId::random());

    let error = context
        .pg
        .runtime
        .block_on(context.messes.insert(&orphan))
        .expect_err("area must exist");

    assert!(matches!(error, StoreError::MissingReference { .. }), "{error:?}");
}

#[rstest]
fn profile_changeset_skips_owner_and_listing(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: profile_changeset_skips_owner_and_listing skipped");
        return;
    };
    let created = mess("Annapurna", Some(context.owner));
    let runtime = &context.pg.runtime;
    runtime
        .block_on(context.messes.insert(&created))
        .expect("mess inserted");

    let edited = Mess {
        name: "Annapurna Bhojanalay".into(),
        tagline: None,
        contact_number: Some("+91 98220 00000".into()),
        owner_id: None,
        is_active: false,
        ..created.clone()
    };
    runtime
        .block_on(context.messes.update_profile(&edited))
        .expect("profile updated");
    let stored = runtime
        .block_on(context.messes.find_by_id(created.id))
        .expect("mess read")
        .expect("mess exists");

    assert_eq!(stored.name, "Annapurna Bhojanalay");
    assert_eq!(stored.tagline, None, "None clears the column");
    assert_eq!(stored.contact_number.as_deref(), Some("+91 98220 00000"));
    assert_eq!(stored.owner_id, Some(context.owner));
    assert!(stored.is_active);
}

#[rstest]
fn unlisted_messes_leave_the_directory(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unlisted_messes_leave_the_directory skipped");
        return;
    };
    let listed = mess("Annapurna", None);
    let hidden = mess("Sugran", None);
    let runtime = &context.pg.runtime;
    for record in [&listed, &hidden] {
        runtime
            .block_on(context.messes.insert(record))
            .expect("mess inserted");
    }

    runtime
        .block_on(context.messes.set_active(hidden.id, false))
        .expect("mess unlisted");
    let directory = runtime
        .block_on(context.messes.list_messes(None))
        .expect("messes listed");
    let unknown = runtime.block_on(context.messes.set_active(MessId::random(), false));

    assert_eq!(directory, vec![listed]);
    assert!(matches!(unknown, Err(StoreError::Query { .. })));
    assert_eq!(
        context
            .pg
            .count_where("messes", "id = $1", hidden.id.as_uuid()),
        1
    );
}
