//! Splitting caller addresses into a storage key and a deep path.

use crate::path::PathBuf;

/// A parsed address: `storageKey` or `storageKey.path.segments`.
///
/// The first `.` separates the storage key, which is used verbatim, from
/// the path remainder, which is normalized.
///
/// ```
/// # use pathstore::store::Address;
/// let address = Address::parse("user:1.prefs..theme");
/// assert_eq!(address.key(), "user:1");
/// assert_eq!(address.path().unwrap().as_str(), "prefs.theme");
///
/// // A remainder that normalizes to nothing is a whole-value address.
/// assert!(Address::parse("user:1.").path().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address<'a> {
    key: &'a str,
    path: Option<PathBuf>,
}

impl<'a> Address<'a> {
    pub fn parse(address: &'a str) -> Self {
        match address.split_once('.') {
            Some((key, rest)) => {
                let path = PathBuf::normalize(rest);
                Self {
                    key,
                    path: (!path.is_empty()).then_some(path),
                }
            }
            None => Self {
                key: address,
                path: None,
            },
        }
    }

    /// The storage key.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The deep path, if the address has one.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn is_deep(&self) -> bool {
        self.path.is_some()
    }
}
