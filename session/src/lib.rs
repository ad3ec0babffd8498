pub mod model;
pub mod store;

pub use model::{Person, PersonAttributes, Session, SessionAttributes, SessionPersonPair};
pub use store::Adapter;
