use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::marker::PhantomData;

use time::OffsetDateTime;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct CreatedAt<T>(OffsetDateTime, PhantomData<T>);

impl<T> CreatedAt<T> {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into(), PhantomData)
    }

    /// Truncated to microseconds, the precision the stores keep.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        let excess = time::Duration::nanoseconds(i64::from(now.nanosecond() % 1_000));
        Self::new(now - excess)
    }
}

impl<T> Serialize for CreatedAt<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(&self.0, serializer)
    }
}

impl<'de, T> Deserialize<'de> for CreatedAt<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        time::serde::rfc3339::deserialize(deserializer).map(|time| Self(time, PhantomData))
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{CreatedAt, Order};

    #[test]
    fn now_has_no_sub_microsecond_part() {
        let now = CreatedAt::<Order>::now();
        assert_eq!(now.as_ref().nanosecond() % 1_000, 0);
    }
}
