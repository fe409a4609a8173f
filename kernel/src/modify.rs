mod author;
mod book;
mod customer;
mod order;
mod report;

pub use self::{author::*, book::*, customer::*, order::*, report::*};
