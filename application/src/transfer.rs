mod catalog;
mod order;
mod report;

pub use self::{catalog::*, order::*, report::*};
