mod codes;
mod projects;
mod users;

pub use codes::{CodeRepo, DynCodeRepo};
pub use projects::{DynProjectRepo, ProjectRepo};
pub use users::{DynUserRepo, UserRepo};
