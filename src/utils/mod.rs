pub mod mime;
pub mod plural;
