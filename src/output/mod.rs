mod response;

pub use response::*;
