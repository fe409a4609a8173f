mod author;
mod book;
mod common;
mod customer;
mod order;
mod report;

pub use self::{author::*, book::*, common::*, customer::*, order::*, report::*};
