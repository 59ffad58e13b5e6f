use rand::prelude::*;
use serde::{
    de,
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;

#[derive(Copy, Clone, Default, Eq, Hash, PartialEq)]
pub struct SessionToken(u128);

impl SessionToken {
    pub fn new() -> Self {
        Self(rand::thread_rng().gen())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("SessionToken")
            .field(&self.to_string())
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for SessionToken {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            (s.len() == 32)
                .then(|| u128::from_str_radix(s, 16).ok())
                .flatten()
                .ok_or_else(|| ValueError::Unsupported(
                    format!("{s} is not a 32 character long hexadecimal")
                ))?
        ))
    }
}

impl<'de> Deserialize<'de> for SessionToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for SessionToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(&self.to_string())
    }
}
