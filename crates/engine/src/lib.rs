//! Domain side of the users API: the user entity and the repository it is
//! stored in.

pub use error::EngineError;
pub use page::PageList;
pub use users::{InMemoryUserRepository, UserEntity, UserRepository};

mod error;
mod page;
mod users;

pub type ResultEngine<T> = Result<T, EngineError>;
