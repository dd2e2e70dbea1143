use crate::storage::storage_keys::{IMAGE_CACHE_KEY, PROFILE_IMAGE_TIMESTAMP};
use crate::tests::{Fixture, START_MILLIS};
use crate::{CacheBustPolicy, KeyValueStore, MemoryStore, StorageTier, StorageTierAdapter};

use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};

const AVATAR: &str = "https://cdn.school.example/avatars/s-1.png";

#[test]
fn given_absent_url_when_bust_then_absent() {
    let fx = Fixture::new();
    let storage = fx.adapter();

    assert_that!(fx.policy().bust(&storage, None, true), none());
    assert_that!(fx.policy().bust(&storage, Some("  "), false), none());
}

#[test]
fn given_data_uri_when_bust_forced_then_unchanged() {
    let fx = Fixture::new();
    let storage = fx.adapter();
    let data_uri = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAE=";

    let busted = fx.policy().bust(&storage, Some(data_uri), true);

    assert_that!(busted, some(eq(data_uri)));
    assert_that!(fx.session.get(PROFILE_IMAGE_TIMESTAMP).unwrap(), none());
}

#[test]
fn given_same_url_when_bust_twice_then_same_url() {
    let fx = Fixture::new();
    let storage = fx.adapter();
    let policy = fx.policy();

    let first = policy.bust(&storage, Some(AVATAR), false).unwrap();
    fx.clock.advance(5_000);
    let second = policy.bust(&storage, Some(AVATAR), false).unwrap();

    assert_that!(first, eq(&second));
    assert_that!(first, eq(&format!("{AVATAR}?t={START_MILLIS}")));
}

#[test]
fn given_forced_bust_when_clock_unchanged_then_token_strictly_newer() {
    let fx = Fixture::new();
    let storage = fx.adapter();
    let policy = fx.policy();

    policy.bust(&storage, Some(AVATAR), false);
    let before = policy.current_token(&storage).unwrap();
    let forced = policy.bust(&storage, Some(AVATAR), true).unwrap();
    let after = policy.current_token(&storage).unwrap();

    assert!(after > before);
    assert_that!(forced, eq(&format!("{AVATAR}?t={after}")));
}

#[test]
fn given_token_when_minted_then_persisted_in_session_and_durable() {
    let fx = Fixture::new();
    let storage = fx.adapter();

    fx.policy().bust(&storage, Some(AVATAR), false);

    let expected = START_MILLIS.to_string();
    assert_that!(fx.session.get(PROFILE_IMAGE_TIMESTAMP).unwrap(), some(eq(&expected)));
    assert_that!(fx.durable.get(PROFILE_IMAGE_TIMESTAMP).unwrap(), some(eq(&expected)));
    assert_that!(fx.session.get(IMAGE_CACHE_KEY).unwrap(), some(eq(AVATAR)));
}

#[test]
fn given_changed_image_url_when_bust_then_new_token() {
    let fx = Fixture::new();
    let storage = fx.adapter();
    let policy = fx.policy();

    policy.bust(&storage, Some(AVATAR), false);
    fx.clock.advance(1_000);
    let other = policy
        .bust(&storage, Some("https://cdn.school.example/avatars/new.png"), false)
        .unwrap();

    assert_that!(
        other,
        eq(&format!(
            "https://cdn.school.example/avatars/new.png?t={}",
            START_MILLIS + 1_000
        ))
    );
}

#[test]
fn given_url_with_query_and_old_token_when_bust_then_token_replaced_and_rest_kept() {
    let fx = Fixture::new();
    let storage = fx.adapter();

    let busted = fx
        .policy()
        .bust(&storage, Some("/uploads/a.png?size=64&t=123#top"), false)
        .unwrap();

    assert_that!(busted, eq(&format!("/uploads/a.png?size=64&t={START_MILLIS}#top")));
}

#[test]
fn given_busted_url_when_strip_then_original_url() {
    let fx = Fixture::new();
    let policy = fx.policy();

    assert_that!(policy.strip("/a.png?t=99"), eq("/a.png"));
    assert_that!(policy.strip("/a.png?x=1&t=99&y=2"), eq("/a.png?x=1&y=2"));
    assert_that!(policy.strip("/a.png?tt=5"), eq("/a.png?tt=5"));
}

#[test]
fn given_percent_encoded_token_name_when_strip_then_removed() {
    let fx = Fixture::new();
    let policy = fx.policy();

    assert_that!(policy.strip("/a.png?%74=5&x=1"), eq("/a.png?x=1"));
    assert_that!(policy.strip("/a.png?x=a%26b&t=5#f"), eq("/a.png?x=a%26b#f"));
}

#[test]
fn given_bare_name_without_value_when_strip_then_kept() {
    let fx = Fixture::new();
    let policy = fx.policy();

    assert_that!(policy.strip("/a.png?t"), eq("/a.png?t"));
    assert_that!(policy.strip("/a.png?t&t=5"), eq("/a.png?t"));
}

#[test]
fn given_param_name_needing_encoding_when_bust_then_name_encoded() {
    let fx = Fixture::new();
    let storage = fx.adapter();
    let policy = CacheBustPolicy::new("v er", Arc::new(fx.clock.clone()));

    let busted = policy.bust(&storage, Some("/a.png"), false).unwrap();

    assert_that!(busted, eq(&format!("/a.png?v+er={START_MILLIS}")));
    assert_that!(policy.strip(&busted), eq("/a.png"));
}

#[test]
fn given_newer_token_from_other_tab_when_bust_then_adopted() {
    let fx = Fixture::new();
    let other_tab_session = MemoryStore::new();
    let this_tab = fx.adapter();
    let other_tab = StorageTierAdapter::new(fx.durable.clone(), other_tab_session.clone());
    let policy = fx.policy();

    policy.bust(&this_tab, Some(AVATAR), false);
    policy.bust(&other_tab, Some(AVATAR), false);
    fx.clock.advance(3_000);
    let refreshed = policy.bust(&other_tab, Some(AVATAR), true).unwrap();

    let seen_here = policy.bust(&this_tab, Some(AVATAR), false).unwrap();

    let expected = (START_MILLIS + 3_000).to_string();
    assert_that!(seen_here, eq(&refreshed));
    assert_that!(fx.session.get(PROFILE_IMAGE_TIMESTAMP).unwrap(), some(eq(&expected)));
    assert_that!(
        this_tab.read(StorageTier::Memory, PROFILE_IMAGE_TIMESTAMP),
        some(eq(&expected))
    );
}

#[test]
fn given_token_from_previous_session_when_bust_then_token_adopted() {
    let fx = Fixture::new();
    fx.durable.set(PROFILE_IMAGE_TIMESTAMP, "42").unwrap();
    let storage = fx.adapter();

    let busted = fx.policy().bust(&storage, Some(AVATAR), false).unwrap();

    assert_that!(busted, eq(&format!("{AVATAR}?t=42")));
}

#[test]
fn given_browser_storage_disabled_when_bust_twice_then_still_idempotent() {
    let fx = Fixture::new();
    fx.durable.set_disabled(true);
    fx.session.set_disabled(true);
    let storage = fx.adapter();
    let policy = fx.policy();

    let first = policy.bust(&storage, Some(AVATAR), false).unwrap();
    fx.clock.advance(10);
    let second = policy.bust(&storage, Some(AVATAR), false).unwrap();

    assert_that!(first, eq(&second));
}
