pub mod common;
pub mod init;
pub mod notice;
pub mod record;
pub mod session_user;
pub mod upload;

// Re-export common types/enums for easier access
pub use common::*;
pub use notice::{Notice, NoticeVariant};
pub use record::{NewRecord, Record, RemoteRecord};
pub use session_user::{Credentials, SessionUser, SignupForm};
pub use upload::{FileUpload, UploadForm};
