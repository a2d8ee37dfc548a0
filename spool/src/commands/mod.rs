pub mod articles;
pub mod copy;
pub mod json;
pub mod lines;
pub mod read;
pub mod write;

pub use articles::run as articles;
pub use copy::run as copy;
pub use json::run as json;
pub use lines::run as lines;
pub use read::run as read;
pub use write::run as write;
