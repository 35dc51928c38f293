//! Commands that act on the filesystem rather than on loaded data.

pub mod init;
