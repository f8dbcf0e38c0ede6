//! ApiToken entity model
//!
//! Encrypted third-party API credentials. The ciphertext column holds a
//! versioned AES-256-GCM payload bound to the provider name.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "api_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Provider slug (openai, gemini, medusa)
    pub provider: String,

    /// Versioned AES-256-GCM ciphertext of the token
    #[sea_orm(column_type = "VarBinary(StringLen::None)")]
    pub token_ciphertext: Vec<u8>,

    pub active: bool,

    /// Optional expiry; a null value never expires
    pub expires_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::token_usage_log::Entity")]
    TokenUsageLog,
}

impl Related<super::token_usage_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TokenUsageLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
