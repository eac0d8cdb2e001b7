use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id password hash (PHC string)
    pub password: String,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    pub is_active: bool,

    pub is_staff: bool,

    pub is_superuser: bool,

    pub date_joined: ChronoDateTimeUtc,

    pub last_login: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chirps::Entity")]
    Chirps,
}

impl Related<super::chirps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chirps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
