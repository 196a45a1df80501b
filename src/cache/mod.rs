mod query_cache;

pub use query_cache::{Invalidation, QueryCache, QueryKey, NOTES_QUERY_KEY};
