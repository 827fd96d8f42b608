use super::*;

use chrono::Utc;

fn collection(visibility: Visibility, owner: &str) -> CollectionModel {
    let now = Utc::now();
    CollectionModel {
        id: "c1".to_owned(),
        visibility: visibility.as_str().to_owned(),
        owner: owner.to_owned(),
        name: "Lung atlas".to_owned(),
        description: String::new(),
        contact_name: None,
        contact_email: None,
        data_submission_policy_version: "2.0".to_owned(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_public_collection() {
    let public = collection(Visibility::Public, "owner");

    assert!(can_view(&public, None));
    assert!(can_view(&public, Some("someone_else")));
    assert!(can_view(&public, Some("owner")));

    assert!(!can_mutate(&public, None));
    assert!(!can_mutate(&public, Some("someone_else")));
    assert!(can_mutate(&public, Some("owner")));
}

#[test]
fn test_private_collection() {
    let private = collection(Visibility::Private, "owner");

    assert!(!can_view(&private, None));
    assert!(!can_view(&private, Some("someone_else")));
    assert!(can_view(&private, Some("owner")));

    assert!(!can_mutate(&private, None));
    assert!(!can_mutate(&private, Some("someone_else")));
    assert!(can_mutate(&private, Some("owner")));
}

#[test]
fn test_corrupted_visibility() {
    let mut broken = collection(Visibility::Public, "owner");
    broken.visibility = "SECRET".to_owned();

    assert!(!can_view(&broken, Some("owner")));
}

#[test]
fn test_require_permission() {
    let private = collection(Visibility::Private, "owner");

    let permission = CollectionPermission::for_requester(&private, Some("owner"));
    assert_eq!(
        CollectionPermission {
            view: true,
            mutate: true,
        },
        permission
    );
    assert!(permission.require_view().is_ok());
    assert!(permission.require_mutate().is_ok());

    let permission = CollectionPermission::for_requester(&private, Some("someone_else"));
    assert!(matches!(
        permission.require_view(),
        Err(crate::error::ServerError::AccessError(Error::PermissionDenied))
    ));
    assert!(permission.require_mutate().is_err());
}
