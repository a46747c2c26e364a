pub mod dataset_writer;
pub mod fetcher;
pub mod labeler;
pub mod pagination;
pub mod ranking_scraper;
pub mod review_scraper;

pub use dataset_writer::*;
pub use fetcher::*;
pub use labeler::*;
pub use pagination::*;
pub use ranking_scraper::*;
pub use review_scraper::*;
