//! Config-backed realm tests.

use idr_core::SecurityConfig;
use idr_realm::{ConfigRealm, RealmError, RealmState, SecurityRealm};

use idr_integration_tests::TestEnv;

const EMBEDDED: &str = r#"
[users.embedded]
enabled = true
realm-name = "Corp"

[users.embedded.users]
alice = "secret1"
bob = "secret2"

[users.embedded.roles]
alice = "admin,user"
bob = "user"
"#;

#[test]
fn embedded_configuration_authenticates() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let config = SecurityConfig::from_toml_str(EMBEDDED)?;

    let realm = ConfigRealm::from_config(&config.users.embedded, env.provider.clone());
    let summary = realm.build_from_config(&config.users.embedded)?;

    assert_eq!(summary.identities, 2);
    assert_eq!(summary.realm_name, "Corp");

    let alice = realm
        .verify_password("alice", "secret1")?
        .expect("alice should authenticate");
    assert_eq!(alice.roles, ["admin", "user"]);
    assert_eq!(alice.realm, "Corp");

    assert!(realm.verify_password("alice", "secret2")?.is_none());
    assert!(realm.verify_password("ALICE", "secret1")?.is_none());
    Ok(())
}

#[test]
fn user_without_roles_is_rejected_at_build() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let mut config = SecurityConfig::from_toml_str(EMBEDDED)?;
    config.users.embedded.users.insert("carol".into(), "secret3".into());

    let realm = ConfigRealm::from_config(&config.users.embedded, env.provider.clone());
    let err = realm.build_from_config(&config.users.embedded).unwrap_err();

    assert!(matches!(err, RealmError::MissingRoleMapping { ref user } if user == "carol"));
    assert!(err.is_configuration_error());
    assert_eq!(realm.state(), RealmState::Created);
    Ok(())
}

#[test]
fn role_strings_are_split_literally() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let mut config = SecurityConfig::from_toml_str(EMBEDDED)?;
    config
        .users
        .embedded
        .roles
        .insert("bob".into(), "user, auditor,,".into());

    let realm = ConfigRealm::from_config(&config.users.embedded, env.provider.clone());
    realm.build_from_config(&config.users.embedded)?;

    let bob = realm.lookup("bob")?.expect("bob exists");
    assert_eq!(bob.roles(), ["user", " auditor"]);
    Ok(())
}
