// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Connection establishment, migration application, and foreign key
//! enforcement are also exercised implicitly by every test that calls
//! `Persistence::new_in_memory()`.

use crate::tests::test_cabin;
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.create_cabin(&test_cabin()).unwrap();

    assert_eq!(db1.list_cabins().unwrap().len(), 1);
    assert_eq!(db2.list_cabins().unwrap().len(), 0, "instances are isolated");
}

#[test]
fn test_reopen_shares_the_database() {
    let mut db = Persistence::new_in_memory().unwrap();
    let mut second = db.reopen().unwrap();

    db.create_cabin(&test_cabin()).unwrap();

    // A reopened handle is a distinct connection to the same database
    assert_eq!(second.list_cabins().unwrap().len(), 1);
    assert!(second.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut db = Persistence::new_in_memory().unwrap();
    assert!(db.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_initialization() {
    let dir = std::env::temp_dir().join(format!("lodge_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("lodge.db");

    {
        let mut db = Persistence::new_with_file(&path).unwrap();
        db.create_cabin(&test_cabin()).unwrap();
    }

    // Reopening the same file sees the persisted cabin
    let mut db = Persistence::new_with_file(&path).unwrap();
    assert_eq!(db.list_cabins().unwrap().len(), 1);

    std::fs::remove_dir_all(&dir).unwrap();
}
