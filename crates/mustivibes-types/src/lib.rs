pub mod api;
pub mod de;
pub mod models;
pub mod room;
