//! A small persistent cookie jar.
//!
//! Stands in for the browser's cookie store: named values with an optional
//! expiry, kept in a JSON file so they survive across runs. A cookie without
//! an expiry never lapses on its own.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
        }
    }

    pub fn with_expiry(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JarFile {
    cookies: Vec<Cookie>,
}

/// Cookie jar, in memory or backed by a file.
///
/// Use [`in_memory`](Self::in_memory) for a jar that forgets everything when
/// dropped and [`open`](Self::open) for one that writes through to disk on
/// every change.
#[derive(Debug, Default)]
pub struct CookieJar {
    path: Option<PathBuf>,
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the jar at `path`. A missing file is an empty jar.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let cookies = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<JarFile>(&raw)?.cookies,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        debug!(path = %path.display(), count = cookies.len(), "opened cookie jar");
        Ok(Self {
            path: Some(path.to_path_buf()),
            cookies,
        })
    }

    /// Value of a live cookie; expired cookies read as absent.
    pub fn get(&self, name: &str, now: DateTime<Utc>) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name && !c.is_expired(now))
            .map(|c| c.value.as_str())
    }

    /// Set a cookie, replacing any existing cookie of the same name.
    pub fn set(&mut self, cookie: Cookie) -> Result<(), StoreError> {
        self.cookies.retain(|c| c.name != cookie.name);
        self.cookies.push(cookie);
        self.save()
    }

    /// Remove every cookie.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.cookies.clear();
        self.save()
    }

    /// All live cookies as `name=value` pairs joined by `"; "`.
    pub fn header(&self, now: DateTime<Utc>) -> String {
        self.cookies
            .iter()
            .filter(|c| !c.is_expired(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(&JarFile {
            cookies: self.cookies.clone(),
        })?;
        std::fs::write(path, raw).map_err(io_err)?;
        info!(path = %path.display(), count = self.cookies.len(), "saved cookie jar");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn in_memory_set_and_get() {
        let now = Utc::now();
        let mut jar = CookieJar::in_memory();
        jar.set(Cookie::new("userid", "abc")).unwrap();
        assert_eq!(jar.get("userid", now), Some("abc"));
        assert_eq!(jar.get("other", now), None);
    }

    #[test]
    fn set_replaces_same_name() {
        let now = Utc::now();
        let mut jar = CookieJar::in_memory();
        jar.set(Cookie::new("userid", "a")).unwrap();
        jar.set(Cookie::new("userid", "b")).unwrap();
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get("userid", now), Some("b"));
    }

    #[test]
    fn expired_cookie_reads_as_absent() {
        let now = Utc::now();
        let mut jar = CookieJar::in_memory();
        jar.set(Cookie::new("userid", "old").with_expiry(now - Duration::seconds(1)))
            .unwrap();
        assert_eq!(jar.get("userid", now), None);
        assert_eq!(jar.header(now), "");
    }

    #[test]
    fn header_joins_live_cookies() {
        let now = Utc::now();
        let mut jar = CookieJar::in_memory();
        jar.set(Cookie::new("userid", "u1")).unwrap();
        jar.set(Cookie::new("expires", "Fri, 01 Jan 2027 00:00:00 GMT")).unwrap();
        assert_eq!(jar.header(now), "userid=u1; expires=Fri, 01 Jan 2027 00:00:00 GMT");
    }

    #[test]
    fn missing_file_is_empty_jar() {
        let tmp = tempfile::TempDir::new().unwrap();
        let jar = CookieJar::open(&tmp.path().join("cookies.json")).unwrap();
        assert!(jar.is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/cookies.json");
        let now = Utc::now();
        let expiry = now + Duration::days(365);

        let mut jar = CookieJar::open(&path).unwrap();
        jar.set(Cookie::new("userid", "0.5:0.25").with_expiry(expiry)).unwrap();
        assert!(path.exists());
        drop(jar);

        let jar = CookieJar::open(&path).unwrap();
        assert_eq!(jar.get("userid", now), Some("0.5:0.25"));
    }

    #[test]
    fn clear_persists() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("cookies.json");
        let mut jar = CookieJar::open(&path).unwrap();
        jar.set(Cookie::new("userid", "x")).unwrap();
        jar.clear().unwrap();
        assert!(CookieJar::open(&path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("cookies.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(CookieJar::open(&path), Err(StoreError::Json(_))));
    }
}
