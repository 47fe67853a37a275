use parish_storage::{ByteRange, StorageBackend, StorageError};
use parish_types::{
    MemberAccount,
    entities::normalize_email,
    error::{Error, Result},
};

use super::{RANGE_END, decode, encode, storage_error};

/// Key prefix for the member collection.
const KEY_PREFIX: &str = "member:";

/// Repository for member account records.
///
/// Key schema: `member:{email}` → serialized [`MemberAccount`].
pub struct MemberRepository<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> MemberRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn key(email: &str) -> Vec<u8> {
        format!("{KEY_PREFIX}{}", normalize_email(email)).into_bytes()
    }

    /// Insert a new member record.
    ///
    /// Fails with `Conflict` when the email already has a record; the
    /// create is a compare-and-swap from absent, so two concurrent
    /// registrations cannot both win.
    pub async fn create(&self, member: &MemberAccount) -> Result<()> {
        let bytes = encode(member)?;
        match self.storage.compare_and_swap(&Self::key(&member.email), None, bytes).await {
            Ok(()) => Ok(()),
            Err(StorageError::CasConflict) => {
                Err(Error::already_exists("Email already registered."))
            },
            Err(e) => Err(storage_error(e)),
        }
    }

    /// Fetch a member by email, if one exists.
    pub async fn get(&self, email: &str) -> Result<Option<MemberAccount>> {
        let Some(bytes) = self.storage.get(&Self::key(email)).await.map_err(storage_error)? else {
            return Ok(None);
        };
        decode(&bytes).map(Some)
    }

    /// Unconditionally overwrite a member record.
    pub async fn update(&self, member: &MemberAccount) -> Result<()> {
        let bytes = encode(member)?;
        self.storage.set(Self::key(&member.email), bytes).await.map_err(storage_error)
    }

    /// Replace `expected` with `new` only if the stored record still equals
    /// `expected`. Returns false when a concurrent writer got there first.
    pub async fn swap(&self, expected: &MemberAccount, new: &MemberAccount) -> Result<bool> {
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

    /// All member records in email order.
    pub async fn list(&self) -> Result<Vec<MemberAccount>> {
        let range = ByteRange::from_bounds(
            KEY_PREFIX.as_bytes().to_vec()..format!("member{RANGE_END}").into_bytes(),
        );
        let pairs = self.storage.get_range(range).await.map_err(storage_error)?;
        pairs.iter().map(|kv| decode(&kv.value)).collect()
    }
}
