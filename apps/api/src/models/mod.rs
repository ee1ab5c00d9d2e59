pub mod contact;
pub mod webhook;
