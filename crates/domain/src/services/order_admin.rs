use crate::entities::{EntityId, LineItemView, Order, OrderStatus, OrderView, Product, User};
use crate::errors::DomainError;
use crate::repositories::{OrderRepository, ProductRepository, UserRepository};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user_id: Option<String>,
}

/// Order listing and status changes for administrators.
pub struct OrderAdminService {
    order_repository: Arc<dyn OrderRepository>,
    user_repository: Arc<dyn UserRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl OrderAdminService {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        user_repository: Arc<dyn UserRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            order_repository,
            user_repository,
            product_repository,
        }
    }

    /// A user's orders as plain views, or every order enriched with
    /// customer and product summaries when no user is given.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, DomainError> {
        match filter.user_id.as_deref() {
            Some(user_id) => Ok(self
                .orders_for_user(user_id)
                .await?
                .into_iter()
                .map(OrderView::from)
                .collect()),
            None => self.all_orders().await,
        }
    }

    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, DomainError> {
        let user = EntityId::parse(user_id)?;
        self.order_repository.find_by_user(&user).await
    }

    pub async fn all_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        let orders = self.order_repository.find_all().await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<EntityId> = orders
            .iter()
            .map(|order| order.user)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let product_ids: Vec<EntityId> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<EntityId, User> = self
            .user_repository
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user)))
            .collect();
        let products: HashMap<EntityId, Product> = self
            .product_repository
            .find_by_ids(&product_ids)
            .await?
            .into_iter()
            .filter_map(|product| product.id.map(|id| (id, product)))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| enrich(order, &users, &products))
            .collect())
    }

    pub async fn update_status(
        &self,
        order_id: &str,
        new_status: Option<&str>,
    ) -> Result<Order, DomainError> {
        let new_status = new_status
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .ok_or_else(|| DomainError::InvalidRequest("status is required".to_string()))?;

        let id = EntityId::parse(order_id)?;
        let next: OrderStatus = new_status.parse()?;

        let mut order = self
            .order_repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id.to_string()))?;

        let previous = order.status;
        order.transition_to(next)?;
        let updated = self.order_repository.update(&order).await?;

        info!(order_id = %id, from = %previous, to = %updated.status, "order status updated");
        Ok(updated)
    }
}

fn enrich(
    order: Order,
    users: &HashMap<EntityId, User>,
    products: &HashMap<EntityId, Product>,
) -> OrderView {
    let customer = users.get(&order.user).map(User::summary);
    let mut view = OrderView::from(order);
    view.customer = customer;
    view.products = view
        .products
        .into_iter()
        .map(|line| LineItemView {
            details: products.get(&line.product).map(Product::summary),
            ..line
        })
        .collect();
    view
}
