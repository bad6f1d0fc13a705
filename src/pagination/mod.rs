mod collect;
mod config;
mod iterator;
mod urls;

pub use collect::collect_pages;
pub use config::{MAX_PAGE_SIZE, PaginationConfig};
pub use iterator::{PageIterator, PageRequest};
pub use urls::{build_params_url, with_page};
