use crate::database::{
    categories, insertion_order, join_error, pool_error, query_error, stored_id, SqlitePool,
};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{Category, CategoryRepository, DomainError, EntityId};

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct CategoryModel {
    id: String,
    name: String,
    description: String,
}

impl TryFrom<CategoryModel> for Category {
    type Error = DomainError;

    fn try_from(model: CategoryModel) -> Result<Self, Self::Error> {
        Ok(Category::with_id(
            stored_id(&model.id)?,
            model.name,
            model.description,
        ))
    }
}

pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let id = id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            categories::table
                .filter(categories::id.eq(id))
                .select(CategoryModel::as_select())
                .first::<CategoryModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        result.map(Category::try_from).transpose()
    }

    async fn save(&self, category: &Category) -> Result<Category, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let id = category.id.unwrap_or_else(EntityId::generate);
        let model = CategoryModel {
            id: id.to_string(),
            name: category.name.clone(),
            description: category.description.clone(),
        };

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(categories::table)
                .values(&model)
                .execute(&mut conn)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        let mut saved = category.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let models = tokio::task::spawn_blocking(move || {
            categories::table
                .select(CategoryModel::as_select())
                .order(insertion_order())
                .load::<CategoryModel>(&mut conn)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        models.into_iter().map(Category::try_from).collect()
    }
}
