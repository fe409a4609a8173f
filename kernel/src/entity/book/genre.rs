use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Default, PartialEq, Eq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct BookGenres(Vec<String>);

impl BookGenres {
    pub fn new(genres: impl Into<Vec<String>>) -> Self {
        Self(genres.into())
    }
}
