//! Account store persistence round-trips.

use chrono::{TimeZone, Utc};

use riftswitch::models::account::{Account, GameAffinity};
use riftswitch::orchestrator::LastLoginSink;
use riftswitch::store::AccountStore;
use riftswitch::AppError;

fn sample_account(name: &str) -> Account {
    Account::new(
        name.to_owned(),
        format!("{name}-login"),
        "hunter2".to_owned(),
        "mains".to_owned(),
        GameAffinity::Both,
    )
}

#[test]
fn missing_file_is_an_empty_store() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = AccountStore::load(temp.path().join("accounts.json")).expect("loads");

    assert!(store.list().expect("lists").is_empty());
}

#[test]
fn upsert_persists_across_reloads() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("accounts.json");

    let account = sample_account("Main");
    let id = account.id.clone();
    {
        let store = AccountStore::load(&path).expect("loads");
        store.upsert(account).expect("saves");
    }

    let reloaded = AccountStore::load(&path).expect("reloads");
    let fetched = reloaded.get(&id).expect("record survives");
    assert_eq!(fetched.name, "Main");
    assert_eq!(fetched.category, "mains");
}

#[test]
fn store_creates_missing_data_dir() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("dir").join("accounts.json");

    let store = AccountStore::load(&path).expect("loads");
    store.upsert(sample_account("Main")).expect("saves");

    assert!(path.exists());
}

#[test]
fn get_unknown_id_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = AccountStore::load(temp.path().join("accounts.json")).expect("loads");

    let err = store.get("no-such-id").expect_err("must fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[test]
fn remove_deletes_the_record() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("accounts.json");
    let store = AccountStore::load(&path).expect("loads");

    let account = sample_account("Main");
    let id = account.id.clone();
    store.upsert(account).expect("saves");
    store.remove(&id).expect("removes");

    assert!(matches!(store.get(&id), Err(AppError::NotFound(_))));
    let err = store.remove(&id).expect_err("second removal fails");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[test]
fn list_orders_by_display_name() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = AccountStore::load(temp.path().join("accounts.json")).expect("loads");

    store.upsert(sample_account("zoe")).expect("saves");
    store.upsert(sample_account("annie")).expect("saves");
    store.upsert(sample_account("milio")).expect("saves");

    let names: Vec<String> = store
        .list()
        .expect("lists")
        .into_iter()
        .map(|account| account.name)
        .collect();
    assert_eq!(names, vec!["annie", "milio", "zoe"]);
}

#[test]
fn last_login_stamp_persists() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("accounts.json");
    let store = AccountStore::load(&path).expect("loads");

    let account = sample_account("Main");
    let id = account.id.clone();
    store.upsert(account).expect("saves");

    let stamp = Utc.with_ymd_and_hms(2026, 8, 7, 20, 15, 0).single().expect("valid ts");
    store.set_last_login(&id, stamp).expect("stamps");

    let reloaded = AccountStore::load(&path).expect("reloads");
    assert_eq!(reloaded.get(&id).expect("record").last_login, Some(stamp));
}

#[tokio::test]
async fn sink_stamps_through_the_trait() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = AccountStore::load(temp.path().join("accounts.json")).expect("loads");

    let account = sample_account("Main");
    let id = account.id.clone();
    store.upsert(account).expect("saves");

    let stamp = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().expect("valid ts");
    store
        .update_last_login(&id, stamp)
        .await
        .expect("stamps through the sink");

    assert_eq!(store.get(&id).expect("record").last_login, Some(stamp));
}

#[tokio::test]
async fn sink_reports_unknown_accounts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = AccountStore::load(temp.path().join("accounts.json")).expect("loads");

    let err = store
        .update_last_login("ghost", Utc::now())
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}
