use destructure::Destructure;
use vodca::References;

use crate::entity::Author;

fn criterion(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, Eq, PartialEq, References, Destructure)]
pub struct AuthorSearch {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl AuthorSearch {
    pub fn new(first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            first_name: criterion(first_name),
            last_name: criterion(last_name),
        }
    }

    pub fn matches(&self, author: &Author) -> bool {
        let first = self.first_name.as_ref().map_or(true, |name| {
            author.first_name().as_ref().to_lowercase().contains(name)
        });
        let last = self.last_name.as_ref().map_or(true, |name| {
            author.last_name().as_ref().to_lowercase().contains(name)
        });
        first && last
    }
}
