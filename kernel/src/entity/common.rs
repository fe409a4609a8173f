mod time;
mod version;
mod window;

pub use self::{time::*, version::*, window::*};
