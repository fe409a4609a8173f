mod bio;
mod id;
mod name;
mod search;

pub use self::{bio::*, id::*, name::*, search::*};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Author {
    id: AuthorId,
    first_name: AuthorFirstName,
    last_name: AuthorLastName,
    bio: AuthorBio,
}

impl Author {
    pub fn new(
        id: AuthorId,
        first_name: AuthorFirstName,
        last_name: AuthorLastName,
        bio: AuthorBio,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            bio,
        }
    }
}
