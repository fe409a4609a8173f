use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Default, PartialEq, Eq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct AuthorBio(String);

impl AuthorBio {
    pub fn new(bio: impl Into<String>) -> Self {
        Self(bio.into())
    }
}
