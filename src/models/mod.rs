pub mod course;
pub mod matching;
pub mod user;

pub use course::*;
pub use matching::*;
pub use user::*;
