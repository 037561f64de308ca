//! Store behavior through the public trait, plus seed-file loading.

use contactd::model::ContactFields;
use contactd::store::{ContactStore, MemoryStore, StoreError};
use std::io::Write;

fn fields(name: &str, phone: &str, email: &str) -> ContactFields {
    ContactFields {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    }
}

#[test]
fn create_assigns_ids_from_one() {
    let store = MemoryStore::new();
    let a = store.create(fields("Ada", "", "")).unwrap();
    let b = store.create(fields("Grace", "", "")).unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
}

#[test]
fn find_returns_not_found_for_unknown_ids() {
    let store = MemoryStore::new();
    match store.find(99) {
        Err(StoreError::NotFound(id)) => assert_eq!(id, 99),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn rejected_contacts_do_not_consume_ids() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.create(fields("", "", "")),
        Err(StoreError::Invalid(_))
    ));
    let contact = store.create(fields("Ada", "", "")).unwrap();
    assert_eq!(contact.id, 1);
}

#[test]
fn validation_messages_surface_per_field() {
    let store = MemoryStore::new();
    let err = store
        .create(fields("", "123", "no-at-sign"))
        .unwrap_err();
    match err {
        StoreError::Invalid(errors) => {
            let messages = errors.messages();
            assert!(messages.iter().any(|m| m.contains("Name")));
            assert!(messages.iter().any(|m| m.contains("Phone")));
            assert!(messages.iter().any(|m| m.contains("Email")));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn seed_file_populates_the_store_in_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "- name: Ada Lovelace\n  phone: 020 7946 0101\n  email: ada@example.com\n- name: Grace Hopper"
    )
    .unwrap();

    let store = MemoryStore::from_seed_file(file.path()).unwrap();
    let all = store.all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, 1);
    assert_eq!(all[0].name, "Ada Lovelace");
    assert_eq!(all[0].email, "ada@example.com");
    assert_eq!(all[1].id, 2);
    assert_eq!(all[1].name, "Grace Hopper");
    assert_eq!(all[1].phone, "");
}

#[test]
fn seed_file_with_an_invalid_contact_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "- name: ''\n  phone: 123").unwrap();
    assert!(MemoryStore::from_seed_file(file.path()).is_err());
}
