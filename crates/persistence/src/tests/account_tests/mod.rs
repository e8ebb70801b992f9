// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for account, role and session persistence.

use hinanjo_domain::Role;

use crate::tests::{create_test_admin, create_test_shelter, create_test_user};
use crate::{AccountChanges, NewAccount, Persistence, PersistenceError};

#[test]
fn test_create_account_hashes_password_and_normalizes_email() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let user_id = persistence
        .create_account(&NewAccount {
            name: "Hanako",
            email: "  Hanako@Example.JP ",
            password: "Correct-Horse-42",
            role: Role::User,
            phone: None,
            address: None,
        })
        .unwrap();

    let account = persistence
        .get_account_by_email("hanako@example.jp")
        .unwrap()
        .unwrap();
    assert_eq!(account.user_id, user_id);
    assert_eq!(account.email, "hanako@example.jp");
    assert_eq!(account.role, Role::User);
    assert_ne!(account.password_hash, "Correct-Horse-42");
    assert!(bcrypt::verify("Correct-Horse-42", &account.password_hash).unwrap());
}

#[test]
fn test_duplicate_email_is_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_user(&mut persistence, "taro@example.jp");

    let result = persistence.create_account(&NewAccount {
        name: "Other",
        email: "TARO@example.jp",
        password: "Correct-Horse-42",
        role: Role::User,
        phone: None,
        address: None,
    });

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateEmail(String::from(
            "taro@example.jp"
        )))
    );
}

#[test]
fn test_update_account_only_touches_given_fields() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "taro@example.jp");
    let shelter_id = persistence
        .create_shelter(&create_test_shelter("A"))
        .unwrap();

    persistence
        .update_account(
            user_id,
            &AccountChanges {
                work_address: Some(String::from("大阪府大阪市北区")),
                work_shelter_id: Some(shelter_id),
                ..AccountChanges::default()
            },
        )
        .unwrap();

    let account = persistence.get_account_by_id(user_id).unwrap().unwrap();
    assert_eq!(account.name, "Resident");
    assert_eq!(account.phone.as_deref(), Some("03-0000-0000"));
    assert_eq!(account.work_shelter_id, Some(shelter_id));
    assert_eq!(account.shelter_id, None);
}

#[test]
fn test_update_account_with_no_changes_checks_existence() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.update_account(99, &AccountChanges::default());
    assert_eq!(result, Err(PersistenceError::AccountNotFound(99)));
}

#[test]
fn test_update_account_to_taken_email_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_user(&mut persistence, "a@example.jp");
    let b = create_test_user(&mut persistence, "b@example.jp");

    let result = persistence.update_account(
        b,
        &AccountChanges {
            email: Some(String::from("A@example.jp")),
            ..AccountChanges::default()
        },
    );
    assert!(matches!(result, Err(PersistenceError::DuplicateEmail(_))));
}

#[test]
fn test_update_password_replaces_hash() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "taro@example.jp");

    persistence
        .update_password(user_id, "Another-Horse-77")
        .unwrap();

    let account = persistence.get_account_by_id(user_id).unwrap().unwrap();
    assert!(bcrypt::verify("Another-Horse-77", &account.password_hash).unwrap());
    assert!(!bcrypt::verify("Correct-Horse-42", &account.password_hash).unwrap());
}

#[test]
fn test_promote_and_demote() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_admin(&mut persistence, "root@example.jp");
    let user_id = create_test_user(&mut persistence, "taro@example.jp");

    persistence.set_role(user_id, Role::Admin).unwrap();
    assert_eq!(persistence.count_admins().unwrap(), 2);

    persistence.set_role(user_id, Role::User).unwrap();
    assert_eq!(persistence.count_admins().unwrap(), 1);
    assert_eq!(
        persistence
            .list_accounts_by_role(Role::Admin)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_last_admin_cannot_be_demoted() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let admin_id = create_test_admin(&mut persistence, "root@example.jp");

    let result = persistence.set_role(admin_id, Role::User);
    assert_eq!(result, Err(PersistenceError::LastAdmin { user_id: admin_id }));

    let account = persistence.get_account_by_id(admin_id).unwrap().unwrap();
    assert_eq!(account.role, Role::Admin);
}

#[test]
fn test_set_role_on_missing_account() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(
        persistence.set_role(7, Role::Admin),
        Err(PersistenceError::AccountNotFound(7))
    );
}

#[test]
fn test_session_lifecycle() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "taro@example.jp");

    persistence
        .create_session("token-1", user_id, "2099-01-01T00:00:00.000000000Z")
        .unwrap();
    persistence
        .create_session("token-2", user_id, "2000-01-01T00:00:00.000000000Z")
        .unwrap();

    let session = persistence.get_session_by_token("token-1").unwrap().unwrap();
    assert_eq!(session.user_id, user_id);

    let removed = persistence
        .delete_expired_sessions("2026-01-01T00:00:00.000000000Z")
        .unwrap();
    assert_eq!(removed, 1);
    assert!(persistence.get_session_by_token("token-2").unwrap().is_none());

    persistence.delete_session("token-1").unwrap();
    assert!(persistence.get_session_by_token("token-1").unwrap().is_none());
}

#[test]
fn test_deleting_shelter_clears_account_pointers() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "taro@example.jp");
    let shelter_id = persistence
        .create_shelter(&create_test_shelter("A"))
        .unwrap();

    persistence
        .update_account(
            user_id,
            &AccountChanges {
                shelter_id: Some(shelter_id),
                ..AccountChanges::default()
            },
        )
        .unwrap();

    persistence.delete_shelter(shelter_id).unwrap();

    let account = persistence.get_account_by_id(user_id).unwrap().unwrap();
    assert_eq!(account.shelter_id, None);
}
