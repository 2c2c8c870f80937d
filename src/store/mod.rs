mod storage;
mod types;

pub use storage::UserStore;
pub use types::{User, UserPatch};
