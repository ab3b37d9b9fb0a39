//! Realm startup from a configuration file.

use std::sync::Arc;

use idr_core::SecurityConfig;
use idr_crypto::DigestAlgorithm;
use idr_realm::{RealmError, RealmKind, RealmRecorder, RealmState, SecurityRealm};

use idr_integration_tests::{digest_value, TestEnv};

#[test]
fn properties_realm_from_config_file() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let config_path = env.write(
        "application.toml",
        r#"
        [users.file]
        enabled = true
        realm-name = "Corp"
        users = "realm/users.properties"
        roles = "realm/roles.properties"
        digest-algorithm = "digest-sha-256"
        "#,
    )?;
    env.write(
        "realm/users.properties",
        format!(
            "alice={}\n",
            digest_value(DigestAlgorithm::Sha256, "alice", "Corp", "secret1")
                .trim_start_matches("digest-sha-256:")
        ),
    )?;
    env.write("realm/roles.properties", "alice=admin\n")?;

    let config = SecurityConfig::load(&config_path)?;
    let recorder = RealmRecorder::new(env.provider.clone());
    let task = recorder.from_security_config(&config, env.shared_resolver())?;
    let realm = Arc::clone(task.realm());

    assert_eq!(realm.kind(), RealmKind::FileBacked);
    assert_eq!(realm.state(), RealmState::Created);
    assert!(matches!(realm.lookup("alice"), Err(RealmError::NotLoaded(_))));

    let summary = task.run()?;
    assert_eq!(summary.identities, 1);
    assert_eq!(realm.state(), RealmState::Loaded);

    let alice = realm
        .verify_password("alice", "secret1")?
        .expect("alice should authenticate");
    assert_eq!(alice.roles, ["admin"]);
    Ok(())
}

#[test]
fn embedded_realm_from_config_file() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let config_path = env.write(
        "application.toml",
        r#"
        [users.embedded]
        enabled = true

        [users.embedded.users]
        alice = "secret1"

        [users.embedded.roles]
        alice = "admin"
        "#,
    )?;

    let config = SecurityConfig::load(&config_path)?;
    let task = RealmRecorder::new(env.provider.clone())
        .from_security_config(&config, env.shared_resolver())?;
    let realm = Arc::clone(task.realm());
    task.run()?;

    assert_eq!(realm.kind(), RealmKind::ConfigBacked);
    assert_eq!(realm.realm_name(), "Quarkus");
    assert!(realm.verify_password("alice", "secret1")?.is_some());
    Ok(())
}

#[test]
fn both_realms_enabled_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let config = SecurityConfig::from_toml_str(
        "[users.file]\nenabled = true\n[users.embedded]\nenabled = true\n",
    )?;

    let err = RealmRecorder::new(env.provider.clone())
        .from_security_config(&config, env.shared_resolver())
        .unwrap_err();
    assert!(err.is_configuration_error());
    Ok(())
}
