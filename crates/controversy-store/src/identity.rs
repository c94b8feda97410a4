//! Anonymous user identity kept in the `userid` cookie.
//!
//! The id is a soft tracking token, not a credential: two uniform random
//! fractions joined by `:`. It is created on first use and lapses after a
//! year.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::info;

use crate::jar::{Cookie, CookieJar};
use crate::StoreError;

pub const USERID_COOKIE: &str = "userid";

/// Name of the stray cookie written in legacy mode.
pub const LEGACY_EXPIRES_COOKIE: &str = "expires";

/// Lifetime of a freshly issued id.
pub const IDENTITY_TTL_DAYS: i64 = 365;

/// Generate a new anonymous id such as `0.4181:0.9034`.
pub fn generate_user_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}:{}", rng.random::<f64>(), rng.random::<f64>())
}

/// Reads and lazily issues the anonymous user id.
///
/// By default the one-year expiry is stored on the `userid` cookie itself.
/// With `legacy_expires_cookie` set, the store reproduces the deployed page
/// script instead: `userid` is written without an expiry and the expiry date
/// lands in a separate cookie named `expires`. A browser treats such a
/// `userid` as a session cookie and drops it on exit; the jar has no session
/// boundary, so it persists until [`clear`](Self::clear).
#[derive(Debug)]
pub struct IdentityStore {
    jar: CookieJar,
    legacy_expires_cookie: bool,
}

impl IdentityStore {
    pub fn new(jar: CookieJar) -> Self {
        Self {
            jar,
            legacy_expires_cookie: false,
        }
    }

    pub fn with_legacy_expires_cookie(mut self, enabled: bool) -> Self {
        self.legacy_expires_cookie = enabled;
        self
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Current id, if one is stored and still live.
    pub fn user_id(&self) -> Option<&str> {
        self.jar.get(USERID_COOKIE, Utc::now())
    }

    /// Return the stored id, issuing and persisting a new one if absent.
    pub fn get_or_create_user_id(&mut self) -> Result<String, StoreError> {
        self.get_or_create_at(Utc::now(), &mut rand::rng())
    }

    /// [`get_or_create_user_id`](Self::get_or_create_user_id) with an explicit
    /// clock and generator.
    pub fn get_or_create_at<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<String, StoreError> {
        if let Some(existing) = self.jar.get(USERID_COOKIE, now) {
            return Ok(existing.to_string());
        }

        let userid = generate_user_id(rng);
        let expires = now + Duration::days(IDENTITY_TTL_DAYS);
        if self.legacy_expires_cookie {
            self.jar.set(Cookie::new(USERID_COOKIE, userid.clone()))?;
            self.jar.set(Cookie::new(
                LEGACY_EXPIRES_COOKIE,
                expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            ))?;
        } else {
            self.jar
                .set(Cookie::new(USERID_COOKIE, userid.clone()).with_expiry(expires))?;
        }
        info!(legacy = self.legacy_expires_cookie, "issued new anonymous user id");
        Ok(userid)
    }

    /// `Cookie` request header carrying every live cookie, as the page's
    /// requests to the service would.
    pub fn cookie_header(&self) -> String {
        self.jar.header(Utc::now())
    }

    /// Forget every cookie, so the next lookup issues a fresh id.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.jar.clear()
    }
}
