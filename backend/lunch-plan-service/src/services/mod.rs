pub mod composer;
pub mod filter;
pub mod keywords;
pub mod recency;
pub mod refresh;
pub mod remark;
pub mod selector;

pub use composer::PlanComposer;
pub use keywords::dine_in_keywords;
pub use recency::{InMemoryRecencyStore, RecencyStore, RedisRecencyStore};
pub use selector::Selector;
