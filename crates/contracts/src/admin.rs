//! Administrative values stored next to records in a contract namespace.
//!
//! Deployment parameters live under fixed, human-readable keys. Listings hide
//! them through each contract's [`KeyFilter`](innerring_state::KeyFilter).

use innerring_state::KvStore;
use innerring_types::{decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{OptionExt, ResultExt};

use crate::error::{CodecSnafu, NotDeployedSnafu, Result, StoreSnafu};

pub(crate) fn put<S, T>(store: &S, key: &'static str, value: &T) -> Result<()>
where
    S: KvStore + ?Sized,
    T: Serialize,
{
    let bytes = encode(value).context(CodecSnafu { key })?;
    store.put(key.as_bytes(), &bytes).context(StoreSnafu)
}

pub(crate) fn get<S, T>(store: &S, key: &'static str) -> Result<T>
where
    S: KvStore + ?Sized,
    T: DeserializeOwned,
{
    let bytes = store.get(key.as_bytes()).context(StoreSnafu)?.context(NotDeployedSnafu { key })?;
    decode(&bytes).context(CodecSnafu { key })
}
