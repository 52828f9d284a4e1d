pub mod compositor;
pub mod init;
pub mod season;
