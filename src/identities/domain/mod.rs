pub mod codes;
pub mod email;
pub mod passwords;
