use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub product_name: String,
    pub pros: String,
    pub cons: String,
    pub would_recommend: bool,
    pub status: String,
    pub is_featured: bool,
    pub helpful_count: i32,
    pub views_count: i32,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::review_images::Entity")]
    ReviewImages,
    #[sea_orm(has_many = "super::review_votes::Entity")]
    ReviewVotes,
    #[sea_orm(has_one = "super::review_responses::Entity")]
    ReviewResponses,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::review_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewImages.def()
    }
}

impl Related<super::review_votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewVotes.def()
    }
}

impl Related<super::review_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewResponses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
