use crate::entities::{EntityId, LineItem, Money, Order, Product};
use crate::errors::DomainError;
use crate::repositories::{OrderRepository, ProductRepository};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Raw order request as received from a client.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrder {
    pub user_id: Option<String>,
    pub items: Vec<RequestedItem>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestedItem {
    pub product: Option<String>,
    pub quantity: Option<i64>,
}

/// Turns a client request into a persisted, priced order.
///
/// Checks run in a fixed order and the first failure wins:
/// required fields, user id format, product id formats, product
/// existence (first missing product in input order), then pricing.
/// Nothing is written unless every check passes, and stock is left
/// untouched.
///
/// Reading the products and writing the order are separate store calls;
/// a price change landing between them is not detected.
pub struct OrderPlacementService {
    order_repository: Arc<dyn OrderRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl OrderPlacementService {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            order_repository,
            product_repository,
        }
    }

    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, DomainError> {
        let (raw_user, requested) = Self::required_fields(&request)?;

        let user = EntityId::parse(raw_user)?;
        let items = requested
            .into_iter()
            .map(|(raw_product, quantity)| {
                EntityId::parse(raw_product).map(|product| LineItem::new(product, quantity))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let products = self.resolve_products(&items).await?;
        let total_price = price_items(&items, &products)?;

        let order = Order::new(user, items, total_price);
        let saved = self.order_repository.save(&order).await?;

        info!(
            order_id = ?saved.id,
            user_id = %saved.user,
            items = saved.items.len(),
            total = %saved.total_price,
            "order placed"
        );
        Ok(saved)
    }

    fn required_fields(request: &PlaceOrder) -> Result<(&str, Vec<(&str, u32)>), DomainError> {
        let user = request
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty());

        let user = match user {
            Some(user) if !request.items.is_empty() => user,
            _ => {
                return Err(DomainError::InvalidRequest(
                    "userId and a non-empty products list are required".to_string(),
                ))
            }
        };

        let mut requested = Vec::with_capacity(request.items.len());
        for (index, item) in request.items.iter().enumerate() {
            let product = item
                .product
                .as_deref()
                .map(str::trim)
                .filter(|product| !product.is_empty())
                .ok_or_else(|| {
                    DomainError::InvalidRequest(format!("products[{}].product is required", index))
                })?;

            let quantity = item
                .quantity
                .filter(|quantity| *quantity >= 1)
                .and_then(|quantity| u32::try_from(quantity).ok())
                .ok_or_else(|| {
                    DomainError::InvalidRequest(format!(
                        "products[{}].quantity must be a positive integer",
                        index
                    ))
                })?;

            requested.push((product, quantity));
        }

        Ok((user, requested))
    }

    /// One batch read for all distinct products.
    async fn resolve_products(
        &self,
        items: &[LineItem],
    ) -> Result<HashMap<EntityId, Product>, DomainError> {
        let mut seen = HashSet::new();
        let distinct: Vec<EntityId> = items
            .iter()
            .map(|item| item.product)
            .filter(|id| seen.insert(*id))
            .collect();

        let products: HashMap<EntityId, Product> = self
            .product_repository
            .find_by_ids(&distinct)
            .await?
            .into_iter()
            .filter_map(|product| product.id.map(|id| (id, product)))
            .collect();

        if let Some(missing) = items.iter().find(|item| !products.contains_key(&item.product)) {
            warn!(product_id = %missing.product, "order references unknown product");
            return Err(DomainError::not_found("Product", missing.product.to_string()));
        }

        Ok(products)
    }
}

fn price_items(items: &[LineItem], products: &HashMap<EntityId, Product>) -> Result<Money, DomainError> {
    let overflow = || DomainError::InvalidRequest("order total exceeds the supported range".to_string());

    items.iter().try_fold(Money::ZERO, |total, item| {
        let product = products
            .get(&item.product)
            .ok_or_else(|| DomainError::not_found("Product", item.product.to_string()))?;
        product
            .price
            .checked_mul(item.quantity)
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderStatus;
    use crate::mocks::{MockOrderRepository, MockProductRepository};

    struct Fixture {
        orders: MockOrderRepository,
        products: MockProductRepository,
        service: OrderPlacementService,
    }

    fn fixture() -> Fixture {
        let orders = MockOrderRepository::new();
        let products = MockProductRepository::new();
        let service = OrderPlacementService::new(Arc::new(orders.clone()), Arc::new(products.clone()));
        Fixture {
            orders,
            products,
            service,
        }
    }

    async fn add_product(products: &MockProductRepository, name: &str, cents: i64) -> EntityId {
        let product = Product::new(
            name.to_string(),
            Money::from_cents(cents).unwrap(),
            String::new(),
            EntityId::generate(),
            10,
        );
        products.save(&product).await.unwrap().id.unwrap()
    }

    fn item(product: impl ToString, quantity: i64) -> RequestedItem {
        RequestedItem {
            product: Some(product.to_string()),
            quantity: Some(quantity),
        }
    }

    fn request(user: impl ToString, items: Vec<RequestedItem>) -> PlaceOrder {
        PlaceOrder {
            user_id: Some(user.to_string()),
            items,
        }
    }

    #[tokio::test]
    async fn prices_the_order_from_current_product_prices() {
        let f = fixture();
        let a = add_product(&f.products, "A", 2000).await;
        let b = add_product(&f.products, "B", 1500).await;
        let user = EntityId::generate();

        let order = f
            .service
            .place_order(request(user, vec![item(a, 2), item(b, 1)]))
            .await
            .unwrap();

        assert!(order.id.is_some());
        assert_eq!(order.user, user);
        assert_eq!(order.total_price, Money::from_cents(5500).unwrap());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items, vec![LineItem::new(a, 2), LineItem::new(b, 1)]);
        assert_eq!(f.orders.writes(), 1);
    }

    #[tokio::test]
    async fn total_is_a_snapshot() {
        let f = fixture();
        let a = add_product(&f.products, "A", 1999).await;

        let order = f
            .service
            .place_order(request(EntityId::generate(), vec![item(a, 3)]))
            .await
            .unwrap();
        f.products.set_price(&a, Money::from_cents(1).unwrap()).unwrap();

        let stored = f.orders.find_by_id(&order.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.total_price, Money::from_cents(5997).unwrap());
    }

    #[tokio::test]
    async fn repeated_products_are_fetched_once_and_priced_per_line() {
        let f = fixture();
        let a = add_product(&f.products, "A", 250).await;

        let order = f
            .service
            .place_order(request(EntityId::generate(), vec![item(a, 1), item(a, 4)]))
            .await
            .unwrap();

        assert_eq!(order.total_price, Money::from_cents(1250).unwrap());
        assert_eq!(order.items.len(), 2);
        assert_eq!(f.products.lookups(), 1);
    }

    #[tokio::test]
    async fn empty_line_items_are_rejected_without_writes() {
        let f = fixture();
        let result = f.service.place_order(request(EntityId::generate(), vec![])).await;

        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
        assert_eq!(f.orders.writes(), 0);
        assert_eq!(f.products.lookups(), 0);
    }

    #[tokio::test]
    async fn missing_user_is_an_invalid_request() {
        let f = fixture();
        let a = add_product(&f.products, "A", 100).await;
        let result = f
            .service
            .place_order(PlaceOrder {
                user_id: None,
                items: vec![item(a, 1)],
            })
            .await;

        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn non_positive_quantities_are_rejected() {
        let f = fixture();
        let a = add_product(&f.products, "A", 100).await;

        for quantity in [0, -3] {
            let result = f
                .service
                .place_order(request(EntityId::generate(), vec![item(a, quantity)]))
                .await;
            assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
        }
        assert_eq!(f.orders.writes(), 0);
    }

    #[tokio::test]
    async fn malformed_user_id_fails_before_any_product_read() {
        let f = fixture();
        let a = add_product(&f.products, "A", 100).await;

        let result = f.service.place_order(request("abc", vec![item(a, 1)])).await;

        assert_eq!(result, Err(DomainError::InvalidIdentifier("abc".to_string())));
        assert_eq!(f.products.lookups(), 0);
    }

    #[tokio::test]
    async fn malformed_product_id_fails_before_any_product_read() {
        let f = fixture();
        let a = add_product(&f.products, "A", 100).await;

        let result = f
            .service
            .place_order(request(EntityId::generate(), vec![item(a, 1), item("nope", 1)]))
            .await;

        assert_eq!(result, Err(DomainError::InvalidIdentifier("nope".to_string())));
        assert_eq!(f.products.lookups(), 0);
        assert_eq!(f.orders.writes(), 0);
    }

    #[tokio::test]
    async fn reports_the_first_missing_product_in_input_order() {
        let f = fixture();
        let a = add_product(&f.products, "A", 100).await;
        let ghost_one = EntityId::generate();
        let ghost_two = EntityId::generate();

        let result = f
            .service
            .place_order(request(
                EntityId::generate(),
                vec![item(a, 1), item(ghost_one, 1), item(ghost_two, 1)],
            ))
            .await;

        assert_eq!(result, Err(DomainError::not_found("Product", ghost_one.to_string())));
        assert!(f.orders.is_empty());
    }

    #[tokio::test]
    async fn store_failures_surface_as_persistence_errors() {
        let f = fixture();
        let a = add_product(&f.products, "A", 100).await;
        f.orders.fail_writes(true);

        let result = f
            .service
            .place_order(request(EntityId::generate(), vec![item(a, 1)]))
            .await;

        assert!(matches!(result, Err(DomainError::PersistenceError(_))));
        assert!(f.orders.is_empty());
    }

    #[tokio::test]
    async fn overflowing_totals_are_rejected() {
        let f = fixture();
        let a = add_product(&f.products, "A", i64::MAX / 2).await;

        let result = f
            .service
            .place_order(request(EntityId::generate(), vec![item(a, 3)]))
            .await;

        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
        assert_eq!(f.orders.writes(), 0);
    }
}
