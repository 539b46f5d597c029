//! Unit tests for strongly-typed identifiers

use core_kernel::{ReturnId, RequestId, BillId, NotificationId, ClientId, UserId};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn test_display_carries_prefix() {
    assert!(ReturnId::new().to_string().starts_with("TRN-"));
    assert!(RequestId::new().to_string().starts_with("IRQ-"));
    assert!(BillId::new().to_string().starts_with("BIL-"));
    assert!(NotificationId::new().to_string().starts_with("NTF-"));
}

#[test]
fn test_parse_accepts_prefixed_and_bare_forms() {
    let id = ReturnId::new();
    let prefixed: ReturnId = id.to_string().parse().unwrap();
    let bare: ReturnId = id.as_uuid().to_string().parse().unwrap();
    assert_eq!(prefixed, id);
    assert_eq!(bare, id);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("not-a-uuid".parse::<ReturnId>().is_err());
}

#[test]
fn test_v7_ids_are_time_ordered_enough_to_be_unique() {
    let ids: HashSet<_> = (0..100).map(|_| ReturnId::new_v7()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_client_id_converts_to_user_id() {
    let uuid = Uuid::new_v4();
    let client = ClientId::from_uuid(uuid);
    let user: UserId = client.into();
    assert_eq!(user.as_uuid(), &uuid);

    let back: ClientId = user.into();
    assert_eq!(back, client);
}

#[test]
fn test_serde_transparent_round_trip() {
    let id = BillId::new();
    let json = serde_json::to_string(&id).unwrap();
    // Serializes as the bare UUID, not the display form
    assert!(!json.contains("BIL-"));
    let back: BillId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
