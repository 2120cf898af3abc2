use crate::database::{
    insertion_order, join_error, pool_error, products, query_error, stored_id, SqlitePool,
    BATCH_SIZE,
};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{DomainError, EntityId, Money, Product, ProductFilter, ProductRepository};

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ProductModel {
    id: String,
    name: String,
    price_cents: i64,
    description: String,
    category_id: String,
    stock: i32,
}

impl TryFrom<ProductModel> for Product {
    type Error = DomainError;

    fn try_from(model: ProductModel) -> Result<Self, Self::Error> {
        let price = Money::from_cents(model.price_cents)
            .map_err(|_| DomainError::PersistenceError(format!("negative price stored for product {}", model.id)))?;

        Ok(Product::with_id(
            stored_id(&model.id)?,
            model.name,
            price,
            model.description,
            stored_id(&model.category_id)?,
            model.stock,
        ))
    }
}

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.get().map_err(pool_error)?;
        let ids: Vec<String> = ids.iter().map(EntityId::to_string).collect();

        let models = tokio::task::spawn_blocking(move || {
            let mut models = Vec::with_capacity(ids.len());
            for chunk in ids.chunks(BATCH_SIZE) {
                let batch = products::table
                    .filter(products::id.eq_any(chunk.to_vec()))
                    .select(ProductModel::as_select())
                    .load::<ProductModel>(&mut conn)?;
                models.extend(batch);
            }
            QueryResult::Ok(models)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        models.into_iter().map(Product::try_from).collect()
    }

    async fn save(&self, product: &Product) -> Result<Product, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let id = product.id.unwrap_or_else(EntityId::generate);
        let model = ProductModel {
            id: id.to_string(),
            name: product.name.clone(),
            price_cents: product.price.cents(),
            description: product.description.clone(),
            category_id: product.category.to_string(),
            stock: product.stock,
        };

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(products::table)
                .values(&model)
                .execute(&mut conn)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        let mut saved = product.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    /// Category and price band are applied in SQL; the text search runs on
    /// the narrowed rows so it can use Unicode case folding.
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let category = filter.category.map(|id| id.to_string());
        let min_cents = filter.min_price.map(|price| price.cents());
        let max_cents = filter.max_price.map(|price| price.cents());

        let models = tokio::task::spawn_blocking(move || {
            let mut query = products::table.into_boxed();
            if let Some(category) = category {
                query = query.filter(products::category_id.eq(category));
            }
            if let Some(min) = min_cents {
                query = query.filter(products::price_cents.ge(min));
            }
            if let Some(max) = max_cents {
                query = query.filter(products::price_cents.le(max));
            }
            query
                .select(ProductModel::as_select())
                .order(insertion_order())
                .load::<ProductModel>(&mut conn)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        let mut found = Vec::with_capacity(models.len());
        for model in models {
            let product = Product::try_from(model)?;
            if filter.matches_text(&product) {
                found.push(product);
            }
        }
        Ok(found)
    }
}
