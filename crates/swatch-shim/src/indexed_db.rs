//! Fake indexed-database factory.
//!
//! Opening or deleting a database does nothing; the calls are only recorded.

use std::cell::RefCell;

/// Placeholder returned by every factory operation. Carries no result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdbRequest;

/// A recorded factory call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdbCall {
    /// `open(name, version)`
    Open {
        /// Database name.
        name: String,
        /// Requested schema version.
        version: Option<u32>,
    },
    /// `delete_database(name)`
    DeleteDatabase {
        /// Database name.
        name: String,
    },
}

/// No-op indexed-database factory.
#[derive(Debug, Default)]
pub struct FakeIndexedDb {
    calls: RefCell<Vec<IdbCall>>,
}

impl FakeIndexedDb {
    /// Creates a factory with an empty call history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretends to open `name`.
    pub fn open(&self, name: &str, version: Option<u32>) -> IdbRequest {
        self.calls.borrow_mut().push(IdbCall::Open {
            name: name.to_string(),
            version,
        });
        IdbRequest
    }

    /// Pretends to delete `name`.
    pub fn delete_database(&self, name: &str) -> IdbRequest {
        self.calls.borrow_mut().push(IdbCall::DeleteDatabase {
            name: name.to_string(),
        });
        IdbRequest
    }

    /// Returns the calls made since the last reset.
    #[must_use]
    pub fn calls(&self) -> Vec<IdbCall> {
        self.calls.borrow().clone()
    }

    /// Forgets the recorded calls.
    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_are_recorded_noops() {
        let factory = FakeIndexedDb::new();

        assert_eq!(factory.open("groups", Some(2)), IdbRequest);
        assert_eq!(factory.delete_database("groups"), IdbRequest);

        assert_eq!(
            factory.calls(),
            vec![
                IdbCall::Open {
                    name: "groups".to_string(),
                    version: Some(2)
                },
                IdbCall::DeleteDatabase {
                    name: "groups".to_string()
                },
            ]
        );

        factory.reset_calls();
        assert!(factory.calls().is_empty());
    }
}
