use crate::cache_bust::Clock;
use crate::identity::image_ref::is_data_uri;
use crate::storage::storage_keys::{IMAGE_CACHE_KEY, PROFILE_IMAGE_TIMESTAMP};
use crate::{StorageTier, StorageTierAdapter};

use std::sync::Arc;

use log::debug;
use url::form_urlencoded;

pub const DEFAULT_QUERY_PARAM: &str = "t";

const TOKEN_TIERS: [StorageTier; 3] = [StorageTier::Memory, StorageTier::Session, StorageTier::Durable];

/// Appends a freshness token to network image URLs.
///
/// The token is fixed for a given image within a session so repeated reads
/// produce the same URL. A new token is minted when none exists, when the
/// image URL changes, or when the caller forces it after an upload. Data URIs
/// pass through untouched.
pub struct CacheBustPolicy {
    query_param: String,
    clock: Arc<dyn Clock>,
}

impl CacheBustPolicy {
    pub fn new(query_param: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            query_param: query_param.into(),
            clock,
        }
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    pub fn bust(
        &self,
        storage: &StorageTierAdapter,
        url: Option<&str>,
        force_new: bool,
    ) -> Option<String> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;

        if is_data_uri(url) {
            return Some(url.to_string());
        }

        let base = self.strip(url);
        let token = self.token_for(storage, &base, force_new);
        Some(self.append(&base, token))
    }

    /// Removes the cache-bust parameter, keeping every other part of the URL
    /// byte for byte.
    ///
    /// Parameter names are compared percent-decoded. A bare name without a
    /// value is not a token and is kept.
    pub fn strip(&self, url: &str) -> String {
        if is_data_uri(url) {
            return url.to_string();
        }

        let (path, query, fragment) = split_url(url);
        let Some(query) = query else {
            return url.to_string();
        };

        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| !pair.is_empty() && !self.is_token_pair(pair))
            .collect();

        let mut out = path.to_string();
        if !kept.is_empty() {
            out.push('?');
            out.push_str(&kept.join("&"));
        }
        if let Some(fragment) = fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    fn is_token_pair(&self, raw_pair: &str) -> bool {
        form_urlencoded::parse(raw_pair.as_bytes())
            .next()
            .is_some_and(|(name, value)| name == self.query_param && !value.is_empty())
    }

    /// Token currently in effect: the newest one held by any tier, so a
    /// refresh made by another tab wins over this tab's older copy.
    pub fn current_token(&self, storage: &StorageTierAdapter) -> Option<i64> {
        TOKEN_TIERS
            .into_iter()
            .filter_map(|tier| {
                storage
                    .read(tier, PROFILE_IMAGE_TIMESTAMP)
                    .and_then(|raw| raw.parse::<i64>().ok())
            })
            .max()
    }

    fn token_for(&self, storage: &StorageTierAdapter, base: &str, force_new: bool) -> i64 {
        let current = self.current_token(storage);
        let minted_for = storage
            .read(StorageTier::Memory, IMAGE_CACHE_KEY)
            .or_else(|| storage.read(StorageTier::Session, IMAGE_CACHE_KEY));

        match current {
            Some(token) if !force_new && minted_for.as_deref().is_none_or(|b| b == base) => {
                if minted_for.is_none() {
                    self.remember_base(storage, base);
                }
                self.adopt(storage, token);
                token
            }
            _ => self.mint(storage, base, current),
        }
    }

    fn mint(&self, storage: &StorageTierAdapter, base: &str, previous: Option<i64>) -> i64 {
        let now = self.clock.now_millis();
        let token = match previous {
            Some(previous) if now <= previous => previous + 1,
            _ => now,
        };

        let value = token.to_string();
        for tier in TOKEN_TIERS {
            storage.write(tier, PROFILE_IMAGE_TIMESTAMP, &value);
        }
        self.remember_base(storage, base);

        debug!("Minted cache-bust token {token} for {base}");
        token
    }

    /// Copies `token` into the tab-local tiers that hold an older one.
    fn adopt(&self, storage: &StorageTierAdapter, token: i64) {
        let value = token.to_string();
        for tier in [StorageTier::Memory, StorageTier::Session] {
            if storage.read(tier, PROFILE_IMAGE_TIMESTAMP).as_deref() != Some(value.as_str()) {
                storage.write(tier, PROFILE_IMAGE_TIMESTAMP, &value);
            }
        }
    }

    fn remember_base(&self, storage: &StorageTierAdapter, base: &str) {
        storage.write(StorageTier::Memory, IMAGE_CACHE_KEY, base);
        storage.write(StorageTier::Session, IMAGE_CACHE_KEY, base);
    }

    fn append(&self, base: &str, token: i64) -> String {
        let (path, query, fragment) = split_url(base);
        let pair = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.query_param, &token.to_string())
            .finish();

        let mut out = path.to_string();
        match query.filter(|q| !q.is_empty()) {
            Some(q) => {
                out.push('?');
                out.push_str(q);
                out.push('&');
            }
            None => out.push('?'),
        }
        out.push_str(&pair);
        if let Some(fragment) = fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// Splits a URL reference at its first `#` and then its first `?`, the
/// delimiters RFC 3986 assigns to fragment and query.
fn split_url(url: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    match rest.split_once('?') {
        Some((path, query)) => (path, Some(query), fragment),
        None => (rest, None, fragment),
    }
}
