use parish_storage::{ByteRange, StorageBackend, StorageError};
use parish_types::{
    AdminAccount,
    entities::normalize_email,
    error::{Error, Result},
};

use super::{RANGE_END, decode, encode, storage_error};

/// Key prefix for the admin collection.
const KEY_PREFIX: &str = "admin:";

/// Repository for admin account records.
///
/// Key schema: `admin:{email}` → serialized [`AdminAccount`].
pub struct AdminRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> AdminRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn key(email: &str) -> Vec<u8> {
        format!("{KEY_PREFIX}{}", normalize_email(email)).into_bytes()
    }

    /// Insert a new admin record; `Conflict` when the email is taken.
    pub async fn create(&self, admin: &AdminAccount) -> Result<()> {
        let bytes = encode(admin)?;
        match self.storage.compare_and_swap(&Self::key(&admin.email), None, bytes).await {
            Ok(()) => Ok(()),
            Err(StorageError::CasConflict) => {
                Err(Error::already_exists("Email already registered."))
            },
            Err(e) => Err(storage_error(e)),
        }
    }

    /// Fetch an admin by email, if one exists.
    pub async fn get(&self, email: &str) -> Result<Option<AdminAccount>> {
        let Some(bytes) = self.storage.get(&Self::key(email)).await.map_err(storage_error)? else {
            return Ok(None);
        };
        decode(&bytes).map(Some)
    }

    /// Unconditionally overwrite an admin record.
    pub async fn update(&self, admin: &AdminAccount) -> Result<()> {
        let bytes = encode(admin)?;
        self.storage.set(Self::key(&admin.email), bytes).await.map_err(storage_error)
    }

    /// Replace `expected` with `new` only if the stored record still equals
    /// `expected`. Returns false when a concurrent writer got there first.
    ///
    /// This is how one-time token consumption stays single-use: the
    /// expectation still carries the token, the replacement doesn't, and
    /// only one of two racing onboarding attempts can swap.
    pub async fn swap(&self, expected: &AdminAccount, new: &AdminAccount) -> Result<bool> {
        let expected_bytes = encode(expected)?;
        let new_bytes = encode(new)?;
        match self
            .storage
            .compare_and_swap(&Self::key(&expected.email), Some(&expected_bytes), new_bytes)
            .await
        {
            Ok(()) => Ok(true),
            Err(StorageError::CasConflict) => Ok(false),
            Err(e) => Err(storage_error(e)),
        }
    }

    /// All admin records in email order.
    pub async fn list(&self) -> Result<Vec<AdminAccount>> {
        let range = ByteRange::from_bounds(
            KEY_PREFIX.as_bytes().to_vec()..format!("admin{RANGE_END}").into_bytes(),
        );
        let pairs = self.storage.get_range(range).await.map_err(storage_error)?;
        pairs.iter().map(|kv| decode(&kv.value)).collect()
    }
}
