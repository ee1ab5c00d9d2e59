pub mod directory;
pub mod handlers;
pub mod phone;
pub mod spreadsheet;
