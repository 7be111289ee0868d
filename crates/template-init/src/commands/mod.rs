pub mod check_name;
pub mod detect;
pub mod init;
