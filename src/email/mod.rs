pub mod clients;
pub mod dispatcher;
pub mod templates;
