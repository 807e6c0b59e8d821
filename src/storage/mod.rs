pub mod keys;
pub mod kv;
pub mod layout;
