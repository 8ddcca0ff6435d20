//! `SeaORM` Entity for refresh_tokens table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "refresh_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_owner_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTimeUtc,
    pub revoked: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::store_owners::Entity",
        from = "Column::StoreOwnerId",
        to = "super::store_owners::Column::Id"
    )]
    StoreOwners,
    #[sea_orm(has_many = "super::tokens::Entity")]
    Tokens,
}

impl Related<super::store_owners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreOwners.def()
    }
}

impl Related<super::tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
