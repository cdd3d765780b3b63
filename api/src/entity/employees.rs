use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub employee_id: String,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub hourly_rate: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_memberships::Entity")]
    TeamMemberships,
    #[sea_orm(has_many = "super::work_arrangements::Entity")]
    WorkArrangements,
}

impl Related<super::team_memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMemberships.def()
    }
}

impl Related<super::work_arrangements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkArrangements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
