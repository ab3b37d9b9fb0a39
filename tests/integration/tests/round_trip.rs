//! The same users and roles loaded through either realm variant yield the
//! same identities.

use std::collections::BTreeMap;

use idr_realm::{ConfigRealm, FileRealm, FileRealmSettings, SecurityRealm};

use idr_integration_tests::TestEnv;

#[test]
fn config_and_files_agree() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let users: BTreeMap<String, String> = [("alice", "secret1"), ("bob", "p@ss:word"), ("carol", "x")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let roles: BTreeMap<String, String> = [("alice", "admin,user"), ("bob", "user, ops"), ("carol", "")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let config_realm = ConfigRealm::new("Quarkus", env.provider.clone());
    config_realm.build(&users, &roles)?;

    let users_file: String = users.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
    let roles_file: String = roles.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
    env.write("users.properties", users_file)?;
    env.write("roles.properties", roles_file)?;

    let file_realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    file_realm.load("users.properties", "roles.properties", &env.resolver())?;

    assert_eq!(config_realm.identity_count()?, file_realm.identity_count()?);
    for name in users.keys() {
        let from_config = config_realm.lookup(name)?.expect("present in config realm");
        let from_files = file_realm.lookup(name)?.expect("present in file realm");
        assert_eq!(from_config, from_files, "{name}");
    }
    Ok(())
}
