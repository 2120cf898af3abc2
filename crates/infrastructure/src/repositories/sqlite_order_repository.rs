use crate::database::{
    insertion_order, join_error, order_items, orders, pool_error, query_error, stored_id, SqlitePool,
    BATCH_SIZE,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{DomainError, EntityId, LineItem, Money, Order, OrderRepository, OrderStatus};
use std::collections::HashMap;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OrderModel {
    id: String,
    user_id: String,
    total_price_cents: i64,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OrderItemModel {
    order_id: String,
    line_index: i32,
    product_id: String,
    quantity: i64,
}

impl TryFrom<OrderItemModel> for LineItem {
    type Error = DomainError;

    fn try_from(model: OrderItemModel) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(model.quantity).map_err(|_| {
            DomainError::PersistenceError(format!(
                "invalid quantity {} stored for order {}",
                model.quantity, model.order_id
            ))
        })?;
        Ok(LineItem::new(stored_id(&model.product_id)?, quantity))
    }
}

fn into_order(model: OrderModel, items: Vec<LineItem>) -> Result<Order, DomainError> {
    let status: OrderStatus = model
        .status
        .parse()
        .map_err(|_| DomainError::PersistenceError(format!("unknown status in store: {}", model.status)))?;
    let total_price = Money::from_cents(model.total_price_cents).map_err(|_| {
        DomainError::PersistenceError(format!("negative total stored for order {}", model.id))
    })?;

    Ok(Order::with_id(
        stored_id(&model.id)?,
        stored_id(&model.user_id)?,
        items,
        total_price,
        status,
        model.created_at.and_utc(),
        model.updated_at.and_utc(),
    ))
}

/// Loads the line items of the given orders and attaches them, preserving
/// both the order sequence and each order's line order.
fn with_items(
    conn: &mut SqliteConnection,
    models: Vec<OrderModel>,
) -> QueryResult<Vec<(OrderModel, Vec<OrderItemModel>)>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = models.iter().map(|model| model.id.clone()).collect();
    let mut grouped: HashMap<String, Vec<OrderItemModel>> = HashMap::new();
    for chunk in ids.chunks(BATCH_SIZE) {
        let items = order_items::table
            .filter(order_items::order_id.eq_any(chunk.to_vec()))
            .order((order_items::order_id, order_items::line_index))
            .select(OrderItemModel::as_select())
            .load::<OrderItemModel>(conn)?;

        for item in items {
            grouped.entry(item.order_id.clone()).or_default().push(item);
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let items = grouped.remove(&model.id).unwrap_or_default();
            (model, items)
        })
        .collect())
}

fn into_orders(rows: Vec<(OrderModel, Vec<OrderItemModel>)>) -> Result<Vec<Order>, DomainError> {
    rows.into_iter()
        .map(|(model, items)| {
            let items = items
                .into_iter()
                .map(LineItem::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            into_order(model, items)
        })
        .collect()
}

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn save(&self, order: &Order) -> Result<Order, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let id = order.id.unwrap_or_else(EntityId::generate);
        let new_order = OrderModel {
            id: id.to_string(),
            user_id: order.user.to_string(),
            total_price_cents: order.total_price.cents(),
            status: order.status.as_str().to_string(),
            created_at: order.created_at.naive_utc(),
            updated_at: order.updated_at.naive_utc(),
        };
        let new_items: Vec<OrderItemModel> = order
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| OrderItemModel {
                order_id: id.to_string(),
                line_index: index as i32,
                product_id: item.product.to_string(),
                quantity: i64::from(item.quantity),
            })
            .collect();

        tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(orders::table)
                    .values(&new_order)
                    .execute(conn)?;
                if !new_items.is_empty() {
                    diesel::insert_into(order_items::table)
                        .values(&new_items)
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        let mut saved = order.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let id = id.to_string();
        let rows = tokio::task::spawn_blocking(move || {
            let found = orders::table
                .filter(orders::id.eq(id))
                .select(OrderModel::as_select())
                .first::<OrderModel>(&mut conn)
                .optional()?;
            with_items(&mut conn, found.into_iter().collect())
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        Ok(into_orders(rows)?.into_iter().next())
    }

    async fn find_by_user(&self, user: &EntityId) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let user = user.to_string();
        let rows = tokio::task::spawn_blocking(move || {
            let found = orders::table
                .filter(orders::user_id.eq(user))
                .order(insertion_order())
                .select(OrderModel::as_select())
                .load::<OrderModel>(&mut conn)?;
            with_items(&mut conn, found)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        into_orders(rows)
    }

    async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let rows = tokio::task::spawn_blocking(move || {
            let found = orders::table
                .order(insertion_order())
                .select(OrderModel::as_select())
                .load::<OrderModel>(&mut conn)?;
            with_items(&mut conn, found)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        into_orders(rows)
    }

    async fn update(&self, order: &Order) -> Result<Order, DomainError> {
        let id = order
            .id
            .ok_or_else(|| DomainError::InvalidRequest("order has not been saved".to_string()))?;
        let mut conn = self.pool.get().map_err(pool_error)?;

        let key = id.to_string();
        let status = order.status.as_str().to_string();
        let updated_at = order.updated_at.naive_utc();

        let affected = tokio::task::spawn_blocking(move || {
            diesel::update(orders::table.filter(orders::id.eq(key)))
                .set((orders::status.eq(status), orders::updated_at.eq(updated_at)))
                .execute(&mut conn)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        if affected == 0 {
            return Err(DomainError::not_found("Order", id.to_string()));
        }
        Ok(order.clone())
    }
}
