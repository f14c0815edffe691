pub mod credential;
pub mod denylist;
pub mod hasher;
pub mod history;
pub mod policy;
pub mod validator;
