pub mod cipher;
pub mod envelope;
pub mod session_store;
