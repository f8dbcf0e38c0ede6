//! Repository layer encapsulating SeaORM access per table.

pub mod api_token;
pub mod entity_snapshot;
pub mod price_check;
pub mod price_rule;
pub mod product;
pub mod setting;
pub mod sync_job;

pub use api_token::ApiTokenRepository;
pub use entity_snapshot::EntitySnapshotRepository;
pub use price_check::PriceCheckRepository;
pub use price_rule::PriceRuleRepository;
pub use product::ProductRepository;
pub use setting::SettingRepository;
pub use sync_job::SyncJobRepository;
