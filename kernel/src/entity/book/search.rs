use destructure::Destructure;
use vodca::References;

use crate::entity::{Author, Book};

fn criterion(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Title and author match case-insensitive substrings; genre must match exactly.
#[derive(Debug, Clone, Default, Eq, PartialEq, References, Destructure)]
pub struct BookSearch {
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
}

impl BookSearch {
    pub fn new(title: Option<String>, author: Option<String>, genre: Option<String>) -> Self {
        Self {
            title: criterion(title),
            author: criterion(author),
            genre: criterion(genre),
        }
    }

    pub fn matches(&self, book: &Book, author: Option<&Author>) -> bool {
        let title = self.title.as_ref().map_or(true, |title| {
            book.title()
                .as_ref()
                .to_lowercase()
                .contains(&title.to_lowercase())
        });
        let author = self.author.as_ref().map_or(true, |name| {
            author.is_some_and(|author| {
                format!(
                    "{} {}",
                    author.first_name().as_ref(),
                    author.last_name().as_ref()
                )
                .to_lowercase()
                .contains(&name.to_lowercase())
            })
        });
        let genre = self
            .genre
            .as_ref()
            .map_or(true, |genre| book.genres().as_ref().contains(genre));
        title && author && genre
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::entity::{
        Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, Book, BookGenres, BookId,
        BookPrice, BookSearch, BookStock, BookTitle, PublishedAt, Version,
    };

    fn fixture() -> (Book, Author) {
        let author = Author::new(
            AuthorId::new(Uuid::new_v4()),
            AuthorFirstName::new("Octavia"),
            AuthorLastName::new("Butler"),
            AuthorBio::new(""),
        );
        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("Parable of the Sower"),
            author.id().clone(),
            BookGenres::new(vec!["sci-fi".to_string(), "dystopia".to_string()]),
            PublishedAt::new(datetime!(1993-10-01 00:00 UTC)),
            BookPrice::new(Decimal::new(1500, 2)),
            BookStock::new(3),
            Version::initial(),
        );
        (book, author)
    }

    fn search(title: &str, author: &str, genre: &str) -> BookSearch {
        BookSearch::new(
            Some(title.to_string()),
            Some(author.to_string()),
            Some(genre.to_string()),
        )
    }

    #[test]
    fn blank_criteria_match_everything() {
        let (book, author) = fixture();
        assert_eq!(search(" ", "", ""), BookSearch::default());
        assert!(BookSearch::default().matches(&book, Some(&author)));
        assert!(BookSearch::default().matches(&book, None));
    }

    #[test]
    fn title_and_author_ignore_case() {
        let (book, author) = fixture();
        assert!(search("SOWER", "", "").matches(&book, Some(&author)));
        assert!(search("", "octavia b", "").matches(&book, Some(&author)));
        assert!(!search("", "le guin", "").matches(&book, Some(&author)));
        assert!(!search("", "octavia", "").matches(&book, None));
    }

    #[test]
    fn genre_must_match_exactly() {
        let (book, author) = fixture();
        assert!(search("", "", "dystopia").matches(&book, Some(&author)));
        assert!(!search("", "", "dys").matches(&book, Some(&author)));
        assert!(!search("parable", "", "fantasy").matches(&book, Some(&author)));
    }
}
