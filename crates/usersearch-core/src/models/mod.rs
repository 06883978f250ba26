pub mod error;
pub mod search;
pub mod user;

pub use error::{CoreError, CoreErrorKind, CoreResult};
pub use search::{DirectoryOperation, SearchQuery, SearchUsersRequest, UserSortKey};
pub use user::{UserDetail, UserSummary};
