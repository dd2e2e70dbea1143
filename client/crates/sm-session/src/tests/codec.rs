use crate::identity::codec;
use crate::tests::student;
use crate::{ImageRef, ProfilePatch, Role, ServiceError, SessionError};

use googletest::assert_that;
use googletest::prelude::{eq, none, some};

#[test]
fn given_record_when_encode_then_uses_camel_case_and_omits_missing_image() {
    let record = student("s-1", None);

    let encoded = codec::encode(&record).unwrap();

    assert!(encoded.contains("\"firstName\":\"Ada\""));
    assert!(encoded.contains("\"role\":\"student\""));
    assert!(!encoded.contains("profileImage"));
}

#[test]
fn given_invalid_json_when_decode_then_corrupt_record() {
    let result = codec::decode("{not json");

    assert!(matches!(result, Err(SessionError::CorruptRecord { .. })));
}

#[test]
fn given_record_without_role_when_decode_then_corrupt_record() {
    let result = codec::decode(r#"{"id":"s-1","firstName":"Ada"}"#);

    assert!(matches!(result, Err(SessionError::CorruptRecord { .. })));
}

#[test]
fn given_backend_id_field_when_decode_then_maps_to_id() {
    let record = codec::decode(r#"{"_id":"65f0","role":"teacher","email":"t@school.example"}"#)
        .unwrap();

    assert_that!(record.id.as_str(), eq("65f0"));
    assert_that!(record.role, eq(Role::Teacher));
    assert_that!(record.first_name.as_str(), eq(""));
}

#[test]
fn given_blank_image_when_decode_then_image_absent() {
    let record = codec::decode(r#"{"id":"s-1","role":"student","profileImage":"  "}"#).unwrap();

    assert_that!(codec::extract_image(&record), none());
}

#[test]
fn given_no_image_when_merge_image_then_prior_image_kept() {
    let record = student("s-1", Some("https://cdn.school.example/a.png"));

    let merged = codec::merge_image(record.clone(), None);

    assert_that!(merged, eq(&record));
}

#[test]
fn given_new_image_when_merge_image_then_only_image_changes() {
    let record = student("s-1", Some("https://cdn.school.example/a.png"));
    let image = ImageRef::new("https://cdn.school.example/b.png").unwrap();

    let merged = codec::merge_image(record.clone(), Some(image.clone()));

    assert_that!(codec::extract_image(&merged), some(eq(&image)));
    assert_that!(merged.first_name, eq(&record.first_name));
    assert_that!(merged.email, eq(&record.email));
}

#[test]
fn given_name_patch_when_apply_then_image_untouched() {
    let record = student("s-1", Some("https://cdn.school.example/a.png"));
    let patch = ProfilePatch {
        first_name: Some("Grace".to_string()),
        ..Default::default()
    };

    let next = patch.apply_to(&record);

    assert_that!(next.first_name.as_str(), eq("Grace"));
    assert_that!(next.profile_image, eq(&record.profile_image));
    assert!(!patch.touches_image());
}

#[test]
fn given_data_uri_when_is_data_uri_then_true() {
    let image = ImageRef::new("DATA:image/png;base64,iVBORw0KGgo=").unwrap();
    assert!(image.is_data_uri());

    let url = ImageRef::new("https://cdn.school.example/data:thing.png").unwrap();
    assert!(!url.is_data_uri());
}

#[test]
fn given_blank_string_when_image_ref_new_then_none() {
    assert_that!(ImageRef::new("   "), none());
}

#[test]
fn given_unknown_role_when_decode_then_corrupt_record() {
    let raw = r#"{"id":"s-1","firstName":"Ada","lastName":"Lovelace","role":"janitor","email":"ada@school.example"}"#;

    assert!(matches!(
        codec::decode(raw),
        Err(SessionError::CorruptRecord { .. })
    ));
}

#[test]
fn test_role_display_matches_wire_format() {
    for role in [Role::Admin, Role::Teacher, Role::Student, Role::Parent] {
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, format!("\"{role}\""));
    }
}

#[test]
fn given_any_error_when_recovery_hint_then_non_empty() {
    let errors = vec![
        SessionError::corrupt_record("bad"),
        SessionError::not_authenticated(),
        SessionError::network(ServiceError::rejected(503, "timeout")),
    ];

    for err in errors {
        assert!(!err.recovery_hint().is_empty(), "empty hint for {err:?}");
    }
}

#[test]
fn given_network_error_when_is_transient_then_true() {
    assert!(SessionError::network(ServiceError::rejected(503, "timeout")).is_transient());
    assert!(!SessionError::corrupt_record("bad").is_transient());
}

#[test]
fn given_service_error_when_converted_then_user_message_kept_and_source_chained() {
    let err = SessionError::from(ServiceError::rejected(401, "Session expired"));

    assert_that!(err.user_message(), eq("Session expired"));
    assert!(std::error::Error::source(&err).is_some());
    assert!(matches!(err, SessionError::Network { .. }));
}

#[test]
fn given_local_error_when_user_message_then_recovery_hint() {
    let err = SessionError::not_authenticated();

    assert_that!(err.user_message(), eq(err.recovery_hint()));
}
