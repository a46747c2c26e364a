pub mod date;
pub mod record;
pub mod review_tags;
pub mod schema;

pub use date::*;
pub use record::*;
pub use review_tags::*;
pub use schema::*;
