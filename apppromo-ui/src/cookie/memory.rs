use super::{CookieOptions, CookieStore};
use crate::error::{BannerError, Result};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A single recorded `set` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWrite {
    pub key: String,
    pub value: String,
    pub options: CookieOptions,
}

struct StoredCookie {
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// In-memory cookie jar for tests and previews.
///
/// Expired entries read as absent. Every write is recorded so callers can
/// assert on what was stored and when it expires.
pub struct MemoryCookieStore {
    cookies: RefCell<HashMap<String, StoredCookie>>,
    writes: RefCell<Vec<CookieWrite>>,
    clock: Box<dyn Fn() -> DateTime<Utc>>,
    fail_writes: Cell<bool>,
    reads: Cell<usize>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Create a store that evaluates expiry against a custom clock
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self {
            cookies: RefCell::new(HashMap::new()),
            writes: RefCell::new(Vec::new()),
            clock: Box::new(clock),
            fail_writes: Cell::new(false),
            reads: Cell::new(0),
        }
    }

    /// Make every subsequent `set` fail, simulating blocked storage
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn writes(&self) -> Vec<CookieWrite> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    /// Number of `get` calls made through [`CookieStore`]
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let now = (self.clock)();
        self.cookies
            .borrow()
            .get(key)
            .filter(|c| c.expires.is_none_or(|expires| expires > now))
            .map(|c| c.value.clone())
    }
}

impl Default for MemoryCookieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.lookup(key))
    }

    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<()> {
        if self.fail_writes.get() {
            return Err(BannerError::Storage(format!(
                "cookie storage unavailable, cannot set '{}'",
                key
            )));
        }

        self.cookies.borrow_mut().insert(
            key.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires: options.expires,
            },
        );
        self.writes.borrow_mut().push(CookieWrite {
            key: key.to_string(),
            value: value.to_string(),
            options: options.clone(),
        });
        Ok(())
    }
}
