//! Publication and reload behaviour under concurrent readers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use idr_realm::{FileRealm, FileRealmSettings, SecurityRealm};

use idr_integration_tests::TestEnv;

fn write_generation(env: &TestEnv, generation: usize) -> anyhow::Result<()> {
    let mut users = String::new();
    let mut roles = String::new();
    for i in 0..50 {
        users.push_str(&format!("user{i}=gen{generation}\n"));
        roles.push_str(&format!("user{i}=role{generation}\n"));
    }
    env.write("users.properties", users)?;
    env.write("roles.properties", roles)?;
    Ok(())
}

#[test]
fn readers_see_whole_generations() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    write_generation(&env, 0)?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    realm.load("users.properties", "roles.properties", &env.resolver())?;

    let done = AtomicBool::new(false);
    thread::scope(|scope| -> anyhow::Result<()> {
        for _ in 0..4 {
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    match realm.lookup("user7") {
                        Ok(Some(identity)) => {
                            let role = &identity.roles()[0];
                            assert!(role.starts_with("role"), "{role}");
                        }
                        Ok(None) => panic!("user7 vanished"),
                        Err(e) => panic!("lookup refused during reload: {e}"),
                    }
                }
            });
        }

        let reloads = (1..=5).try_for_each(|generation| -> anyhow::Result<()> {
            write_generation(&env, generation)?;
            realm.load("users.properties", "roles.properties", &env.resolver())?;
            Ok(())
        });
        done.store(true, Ordering::Relaxed);
        reloads
    })?;

    let user = realm.lookup("user7")?.expect("user7 exists");
    assert_eq!(user.roles(), ["role5"]);
    assert!(realm.verify_password("user7", "gen5")?.is_some());
    assert!(realm.verify_password("user7", "gen0")?.is_none());
    Ok(())
}

#[test]
fn failed_reload_leaves_realm_closed() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    write_generation(&env, 0)?;

    let realm = FileRealm::create(FileRealmSettings::new("Quarkus", true), env.provider.clone());
    realm.load("users.properties", "roles.properties", &env.resolver())?;

    std::fs::remove_file(env.path().join("roles.properties"))?;
    assert!(realm
        .load("users.properties", "roles.properties", &env.resolver())
        .is_err());

    let err = realm.lookup("user0").unwrap_err();
    assert!(err.is_fail_closed());
    assert!(realm.verify_password("user0", "gen0").is_err());
    Ok(())
}
