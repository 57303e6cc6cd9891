//! The bundle of shims a test sees, and its per-test lifecycle.

use std::ops::Deref;
use std::rc::Rc;

use tracing::subscriber::DefaultGuard;

use crate::console::ErrorSpy;
use crate::indexed_db::FakeIndexedDb;
use crate::navigator::Navigator;
use crate::storage::{MemoryStorage, StorageKind};

thread_local! {
    static CURRENT: Rc<Environment> = Rc::new(Environment::new());
}

/// All browser stand-ins available to a test.
#[derive(Debug)]
pub struct Environment {
    /// Fake local storage.
    pub local_storage: MemoryStorage,
    /// Fake session storage.
    pub session_storage: MemoryStorage,
    /// Fake indexed-database factory.
    pub indexed_db: FakeIndexedDb,
    /// Connectivity flag.
    pub navigator: Navigator,
    /// Error-log spy.
    pub console: ErrorSpy,
}

impl Environment {
    /// Creates a pristine environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            local_storage: MemoryStorage::new(StorageKind::Local),
            session_storage: MemoryStorage::new(StorageKind::Session),
            indexed_db: FakeIndexedDb::new(),
            navigator: Navigator::new(),
            console: ErrorSpy::new(),
        }
    }

    /// Returns the calling thread's environment.
    ///
    /// Each thread gets its own instance; nothing is shared across threads.
    #[must_use]
    pub fn current() -> Rc<Self> {
        CURRENT.with(Rc::clone)
    }

    /// Returns the storage playing the given role.
    #[must_use]
    pub fn storage(&self, kind: StorageKind) -> &MemoryStorage {
        match kind {
            StorageKind::Local => &self.local_storage,
            StorageKind::Session => &self.session_storage,
        }
    }

    /// Clears every call history, leaving state in place.
    pub fn reset_calls(&self) {
        self.local_storage.reset_calls();
        self.session_storage.reset_calls();
        self.indexed_db.reset_calls();
        self.console.reset();
    }

    /// Puts every shim back in its pristine state.
    pub fn restore(&self) {
        self.local_storage.restore();
        self.session_storage.restore();
        self.indexed_db.reset_calls();
        self.navigator.reset();
        self.console.reset();
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-test handle on the thread's [`Environment`].
///
/// [`TestEnvironment::setup`] runs the before-each step: call histories are
/// cleared and the error spy replaces the thread's log subscriber. Dropping
/// the handle runs the after-each step: every shim is restored and the
/// previous subscriber comes back.
///
/// Everything is scoped to the calling thread, the error spy included, so
/// use it from `#[test]` or a current-thread `#[tokio::test]`.
///
/// ```
/// use swatch_shim::TestEnvironment;
///
/// {
///     let env = TestEnvironment::setup();
///     env.local_storage.set("theme", "dark");
/// }
///
/// let env = TestEnvironment::setup();
/// assert_eq!(env.local_storage.get("theme"), None);
/// ```
#[derive(Debug)]
pub struct TestEnvironment {
    env: Rc<Environment>,
    _console: DefaultGuard,
}

impl TestEnvironment {
    /// Prepares the thread's environment for a test.
    #[must_use]
    pub fn setup() -> Self {
        let env = Environment::current();
        env.reset_calls();
        let console = env.console.install();
        Self {
            env,
            _console: console,
        }
    }
}

impl Deref for TestEnvironment {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        &self.env
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        self.env.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_does_not_leak_between_tests() {
        {
            let env = TestEnvironment::setup();
            env.local_storage.set("k", "v");
            env.session_storage.set("s", "1");
            env.navigator.set_online(false);
            let _ = env.indexed_db.open("groups", None);
            tracing::error!("first test failed loudly");
        }

        let env = TestEnvironment::setup();
        assert_eq!(env.local_storage.get("k"), None);
        assert!(env.session_storage.is_empty());
        assert!(env.navigator.is_online());
        assert!(env.indexed_db.calls().is_empty());
        assert_eq!(env.console.call_count(), 0);
    }

    #[test]
    fn test_setup_clears_history_but_keeps_state() {
        let env = Environment::current();
        env.local_storage.set("k", "v");

        let test_env = TestEnvironment::setup();
        assert!(test_env.local_storage.calls().is_empty());
        assert_eq!(test_env.local_storage.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_console_spy_captures_errors() {
        let env = TestEnvironment::setup();

        tracing::error!("request failed");

        assert!(env.console.was_called_with("request failed"));
    }

    #[test]
    fn test_storage_roles() {
        let env = TestEnvironment::setup();

        env.storage(StorageKind::Session).set("k", "v");

        assert_eq!(env.session_storage.get("k").as_deref(), Some("v"));
        assert_eq!(env.local_storage.get("k"), None);
    }

    #[test]
    fn test_environment_is_thread_local() {
        let env = TestEnvironment::setup();
        env.local_storage.set("k", "v");

        let seen = std::thread::spawn(|| Environment::current().local_storage.len())
            .join()
            .unwrap();

        assert_eq!(seen, 0);
    }
}
