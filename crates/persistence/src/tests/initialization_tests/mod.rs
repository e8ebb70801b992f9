// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Connection setup, migrations and foreign key enforcement are also
//! exercised implicitly by every other persistence test.

use crate::Persistence;
use crate::tests::create_test_shelter;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, crate::error::PersistenceError> =
        Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.create_shelter(&create_test_shelter("A")).unwrap();

    assert_eq!(db1.count_shelters().unwrap(), 1);
    assert_eq!(db2.count_shelters().unwrap(), 0);
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "hinanjo_persistence_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_shelter(&create_test_shelter("A")).unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_shelters().unwrap(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
