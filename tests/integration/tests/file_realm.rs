//! File-backed realm tests against resources on disk.

use idr_core::config::{ROLES_RESOURCE_KEY, USERS_RESOURCE_KEY};
use idr_crypto::DigestAlgorithm;
use idr_model::{Credential, CredentialKind};
use idr_realm::{FileRealm, FileRealmSettings, RealmError, RealmState, SecurityRealm};

use idr_integration_tests::{digest_value, TestEnv};

#[test]
fn plain_text_realm_from_disk() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.write(
        "users.properties",
        "# test users\nalice = secret1\nbob: secret2\ncarol secret\\=3\n",
    )?;
    env.write("roles.properties", "alice=admin,user\nbob=user\n")?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    let summary = realm.load("users.properties", "roles.properties", &env.resolver())?;

    assert_eq!(summary.identities, 3);
    assert_eq!(summary.with_roles, 2);
    assert!(realm.verify_password("alice", "secret1")?.is_some());
    assert!(realm.verify_password("bob", "secret2")?.is_some());
    assert!(realm.verify_password("carol", "secret=3")?.is_some());

    let carol = realm.lookup("carol")?.expect("carol exists");
    assert!(carol.roles().is_empty());
    assert_eq!(carol.password().map(Credential::kind), Some(CredentialKind::ClearPassword));
    Ok(())
}

#[test]
fn digest_realm_with_declared_name() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.write(
        "conf/users.properties",
        format!(
            "#$REALM_NAME=Corp$\nalice={}\nbob={}\n",
            digest_value(DigestAlgorithm::Sha256, "alice", "Corp", "secret1"),
            digest_value(DigestAlgorithm::Sha512, "bob", "Corp", "secret2"),
        ),
    )?;
    env.write("conf/roles.properties", "alice=admin\nbob=user\n")?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", false), env.provider.clone());
    realm.load("/conf/users.properties", "/conf/roles.properties", &env.resolver())?;

    assert_eq!(realm.realm_name(), "Corp");
    let alice = realm
        .verify_password("alice", "secret1")?
        .expect("alice should authenticate");
    assert_eq!(alice.realm, "Corp");
    assert!(realm.verify_password("bob", "secret2")?.is_some());
    assert!(realm.verify_password("bob", "secret1")?.is_none());

    let stored = realm.lookup("alice")?.expect("alice exists");
    assert_eq!(stored.password().map(Credential::kind), Some(CredentialKind::DigestPassword));
    Ok(())
}

#[test]
fn missing_resources_name_the_configuration_keys() -> anyhow::Result<()> {
    let env = TestEnv::new()?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    let err = realm
        .load("users.properties", "roles.properties", &env.resolver())
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains(USERS_RESOURCE_KEY), "{message}");
    assert!(message.contains(ROLES_RESOURCE_KEY), "{message}");
    assert_eq!(realm.state(), RealmState::Failed);
    assert!(matches!(realm.lookup("alice"), Err(RealmError::LoadFailed(_))));
    Ok(())
}

#[test]
fn missing_roles_file_is_partial_configuration() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.write("users.properties", "alice=secret1\n")?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    let err = realm
        .load("users.properties", "roles.properties", &env.resolver())
        .unwrap_err();

    assert!(matches!(
        err,
        RealmError::PartialRealmConfiguration { key: ROLES_RESOURCE_KEY, .. }
    ));
    Ok(())
}

#[test]
fn malformed_entry_reports_resource_and_line() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.write("users.properties", "alice=abcdef\n\n# comment\nbob=zz\n")?;
    env.write("roles.properties", "alice=admin\n")?;

    let settings = FileRealmSettings::new("Quarkus", false).with_digest_algorithm(DigestAlgorithm::Sha1);
    let realm = FileRealm::create(settings, env.provider.clone());
    let err = realm
        .load("users.properties", "roles.properties", &env.resolver())
        .unwrap_err();

    assert!(
        matches!(err, RealmError::MalformedRealmEntry { ref resource, line: 1, .. } if resource == "users.properties"),
        "{err}"
    );
    Ok(())
}

#[test]
fn resource_directories_are_not_files() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    std::fs::create_dir(env.path().join("users.properties"))?;
    env.write("roles.properties", "alice=admin\n")?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    let err = realm
        .load("users.properties", "roles.properties", &env.resolver())
        .unwrap_err();

    assert!(matches!(
        err,
        RealmError::PartialRealmConfiguration { key: USERS_RESOURCE_KEY, .. }
    ));
    Ok(())
}

#[test]
fn roles_file_failure_keeps_previous_identities() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.write("users.properties", "alice=secret1\n")?;
    env.write("roles.properties", "alice=admin\n")?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    realm.load("users.properties", "roles.properties", &env.resolver())?;

    env.write("users.properties", "alice=secret1\nbob=secret2\n")?;
    env.write("roles.properties", "alice=admin,user\nbob\n")?;
    let err = realm
        .load("users.properties", "roles.properties", &env.resolver())
        .unwrap_err();

    assert!(
        matches!(err, RealmError::MalformedRealmEntry { ref resource, line: 2, .. } if resource == "roles.properties"),
        "{err}"
    );
    assert_eq!(realm.state(), RealmState::Failed);
    assert!(realm.lookup("bob").unwrap_err().is_fail_closed());
    Ok(())
}
