use super::*;

#[tokio::test]
async fn missing_file_means_logged_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CredentialStore::in_dir(dir.path());

    let credentials = store.load().await.expect("load");
    assert_eq!(credentials, Credentials::default());
    assert!(!credentials.is_logged_in());
}

#[tokio::test]
async fn saved_credentials_are_loaded_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CredentialStore::in_dir(&dir.path().join("nested"));

    store
        .save(&Credentials::logged_in("tok-123", "marta"))
        .await
        .expect("save");
    store
        .remember_game(GameId::new("77"))
        .await
        .expect("remember");

    let credentials = store.load().await.expect("load");
    assert_eq!(credentials.bearer(), Some("tok-123"));
    assert_eq!(credentials.user_name.as_deref(), Some("marta"));
    assert_eq!(credentials.current_game_id, Some(GameId::new("77")));
}

#[tokio::test]
async fn clear_logs_out_and_tolerates_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CredentialStore::in_dir(dir.path());

    store.clear().await.expect("clear without file");
    store
        .save(&Credentials::logged_in("tok", "marta"))
        .await
        .expect("save");
    store.clear().await.expect("clear");

    assert!(!store.path().exists());
    assert!(!store.load().await.expect("load").is_logged_in());
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CredentialStore::in_dir(dir.path());
    std::fs::write(store.path(), b"{not json").expect("write");

    let err = store.load().await.expect_err("corrupt");
    assert!(matches!(err, CredentialError::Corrupt { .. }), "{err}");
}

#[test]
fn empty_token_is_not_a_login() {
    let credentials = Credentials::logged_in("", "marta");
    assert_eq!(credentials.bearer(), None);
    assert!(!credentials.is_logged_in());
}
