//! Regression coverage for token key loading.

use std::collections::HashMap;
use std::io::Write;

use mockable::{DefaultEnv, MockEnv};
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn env_with(vars: &[(&str, String)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn missing_path() -> String {
    std::env::temp_dir()
        .join("complaint-desk-missing-token-key")
        .to_string_lossy()
        .into_owned()
}

#[rstest]
#[case("1", Some(true))]
#[case("YES", Some(true))]
#[case("y", Some(true))]
#[case("False", Some(false))]
#[case("0", Some(false))]
#[case("n", Some(false))]
#[case("maybe", None)]
#[case("", None)]
fn parse_bool_accepts_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}

#[rstest]
fn release_accepts_valid_key() {
    let key = key_file(TOKEN_KEY_MIN_LEN);
    let env = env_with(&[(KEY_FILE_ENV, path_of(&key))]);

    let keyring = keyring_from_env(&env, BuildMode::Release).expect("keyring");
    assert_eq!(keyring.active().id(), SigningKey::new(vec![b'k'; TOKEN_KEY_MIN_LEN]).id());
    assert!(keyring.previous().is_none());
}

#[rstest]
fn release_rejects_ephemeral_opt_in() {
    let key = key_file(TOKEN_KEY_MIN_LEN);
    let env = env_with(&[
        (KEY_FILE_ENV, path_of(&key)),
        (ALLOW_EPHEMERAL_ENV, "1".to_owned()),
    ]);

    let err = keyring_from_env(&env, BuildMode::Release).expect_err("ephemeral rejected");
    assert!(matches!(err, TokenConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_invalid_toggle() {
    let env = env_with(&[(ALLOW_EPHEMERAL_ENV, "sometimes".to_owned())]);

    let err = keyring_from_env(&env, BuildMode::Release).expect_err("invalid toggle");
    assert!(matches!(
        err,
        TokenConfigError::InvalidEnv { name: ALLOW_EPHEMERAL_ENV, .. }
    ));
}

#[rstest]
fn release_rejects_missing_key_file() {
    let env = env_with(&[(KEY_FILE_ENV, missing_path())]);

    let err = keyring_from_env(&env, BuildMode::Release).expect_err("missing key");
    assert!(matches!(err, TokenConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_key() {
    let key = key_file(TOKEN_KEY_MIN_LEN - 1);
    let env = env_with(&[(KEY_FILE_ENV, path_of(&key))]);

    let err = keyring_from_env(&env, BuildMode::Release).expect_err("short key");
    match err {
        TokenConfigError::KeyTooShort { length, min_len, .. } => {
            assert_eq!(length, TOKEN_KEY_MIN_LEN - 1);
            assert_eq!(min_len, TOKEN_KEY_MIN_LEN);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn empty_key_is_rejected(#[case] mode: BuildMode) {
    let key = key_file(0);
    let env = env_with(&[(KEY_FILE_ENV, path_of(&key))]);

    let err = keyring_from_env(&env, mode).expect_err("empty key");
    assert!(matches!(err, TokenConfigError::EmptyKey { .. }));
}

#[rstest]
fn debug_defaults_allow_ephemeral_key() {
    let env = env_with(&[(KEY_FILE_ENV, missing_path())]);

    let keyring = keyring_from_env(&env, BuildMode::Debug).expect("ephemeral keyring");
    assert!(keyring.previous().is_none());
}

#[rstest]
fn debug_honours_ephemeral_opt_out() {
    let env = env_with(&[
        (KEY_FILE_ENV, missing_path()),
        (ALLOW_EPHEMERAL_ENV, "no".to_owned()),
    ]);

    let err = keyring_from_env(&env, BuildMode::Debug).expect_err("opt-out enforced");
    assert!(matches!(err, TokenConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_accepts_short_key() {
    let key = key_file(8);
    let env = env_with(&[(KEY_FILE_ENV, path_of(&key))]);

    assert!(keyring_from_env(&env, BuildMode::Debug).is_ok());
}

#[rstest]
fn previous_key_is_loaded_for_rotation() {
    let active = key_file(TOKEN_KEY_MIN_LEN);
    let previous = key_file(TOKEN_KEY_MIN_LEN + 8);
    let env = env_with(&[
        (KEY_FILE_ENV, path_of(&active)),
        (PREVIOUS_KEY_FILE_ENV, path_of(&previous)),
    ]);

    let keyring = keyring_from_env(&env, BuildMode::Release).expect("keyring");
    let previous = keyring.previous().expect("previous key loaded");
    assert_ne!(previous.id(), keyring.active().id());
}

#[rstest]
#[case(BuildMode::Debug, true)]
#[case(BuildMode::Release, false)]
fn unreadable_previous_key_depends_on_mode(#[case] mode: BuildMode, #[case] tolerated: bool) {
    let active = key_file(TOKEN_KEY_MIN_LEN);
    let env = env_with(&[
        (KEY_FILE_ENV, path_of(&active)),
        (PREVIOUS_KEY_FILE_ENV, missing_path()),
    ]);

    let result = keyring_from_env(&env, mode);
    assert_eq!(result.is_ok(), tolerated);
    if let Ok(keyring) = result {
        assert!(keyring.previous().is_none());
    }
}

#[rstest]
fn process_environment_supplies_key_file() {
    let key = key_file(TOKEN_KEY_MIN_LEN);
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(path_of(&key))),
        (PREVIOUS_KEY_FILE_ENV, None),
        (ALLOW_EPHEMERAL_ENV, None),
    ]);

    let keyring =
        keyring_from_env(&DefaultEnv::new(), BuildMode::Release).expect("keyring from process env");
    assert_eq!(keyring.active().id(), SigningKey::new(vec![b'k'; TOKEN_KEY_MIN_LEN]).id());
}
