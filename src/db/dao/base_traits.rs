/// Columns every `#[base_entity]` table carries.
pub trait BaseColumns: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
}

/// Active models that record which user created and last changed them.
pub trait AuditedActiveModel {
    fn set_created_by(&mut self, user_id: uuid::Uuid);
    fn set_last_modified_by(&mut self, user_id: uuid::Uuid);
}
