// src/core/commands/generic/mod.rs

pub mod acl;
pub mod auth;
pub mod del;
pub mod echo;
pub mod exists;
pub mod flushall;
pub mod ping;
pub mod publish;
pub mod quit;
pub mod subscribe;

pub use acl::{Acl, AclSubcommand};
pub use auth::Auth;
pub use del::Del;
pub use echo::Echo;
pub use exists::Exists;
pub use flushall::FlushAll;
pub use ping::Ping;
pub use publish::Publish;
pub use quit::Quit;
pub use subscribe::Subscribe;
