use application::StoreApp;
use config::Config;
use std::sync::Arc;
use domain::{
    Credentials, DomainError, Money, NewCategory, NewProduct, OrderFilter, OrderStatus, PlaceOrder,
    ProductQuery, Registration, RequestedItem,
};

fn app() -> StoreApp {
    let config = Config::from_lookup(|name| match name {
        "JWT_SECRET" => Some("flow-secret".to_string()),
        "DATABASE_PATH" => Some(":memory:".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .unwrap();
    StoreApp::new(&config).unwrap()
}

fn item(product: &str, quantity: i64) -> RequestedItem {
    RequestedItem {
        product: Some(product.to_string()),
        quantity: Some(quantity),
    }
}

#[tokio::test]
async fn register_browse_order_and_ship() {
    let app = app();

    let session = app
        .users
        .register(Registration {
            username: Some("ada".to_string()),
            email: Some("ada@example.com".to_string()),
            password: Some("correct horse".to_string()),
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(session.token.split('.').count(), 3);
    let user_id = session.user.id.unwrap().to_string();

    let login = app
        .users
        .login(Credentials {
            email: Some("ada@example.com".to_string()),
            password: Some("correct horse".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(login.user.id, session.user.id);

    let books = app
        .catalog
        .create_category(NewCategory {
            name: Some("Books".to_string()),
            description: Some("Paper".to_string()),
        })
        .await
        .unwrap();
    let category = books.id.unwrap().to_string();

    let mut ids = Vec::new();
    for (name, price) in [("Novel", "20.00"), ("Atlas", "15.00")] {
        let product = app
            .catalog
            .create_product(NewProduct {
                name: Some(name.to_string()),
                price: Some(price.parse().unwrap()),
                description: None,
                category: Some(category.clone()),
                stock: Some(10),
            })
            .await
            .unwrap();
        ids.push(product.id.unwrap().to_string());
    }

    let cheap = ProductQuery {
        max_price: Some("16".to_string()),
        ..ProductQuery::default()
    }
    .into_filter()
    .unwrap();
    let found = app.catalog.find_products(&cheap).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Atlas");

    let order = app
        .order_placement
        .place_order(PlaceOrder {
            user_id: Some(user_id.clone()),
            items: vec![item(&ids[0], 2), item(&ids[1], 1)],
        })
        .await
        .unwrap();
    assert_eq!(order.total_price, Money::from_cents(5500).unwrap());
    assert_eq!(order.status, OrderStatus::Pending);

    let order_id = order.id.unwrap().to_string();
    let shipped = app.order_admin.update_status(&order_id, Some("shipped")).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let listed = app
        .order_admin
        .list_orders(&OrderFilter { user_id: None })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, OrderStatus::Shipped);
    assert_eq!(
        listed[0].customer.as_ref().map(|customer| customer.email.as_str()),
        Some("ada@example.com")
    );
    assert_eq!(listed[0].products[0].details.as_ref().unwrap().name, "Novel");

    app.shutdown();
}

#[tokio::test]
async fn wrong_password_and_unknown_product_are_rejected() {
    let app = app();
    app.users
        .register(Registration {
            username: None,
            email: Some("grace@example.com".to_string()),
            password: Some("pw".to_string()),
            role: None,
        })
        .await
        .unwrap();

    let wrong = app
        .users
        .login(Credentials {
            email: Some("grace@example.com".to_string()),
            password: Some("nope".to_string()),
        })
        .await;
    assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));

    let ghost = domain::EntityId::generate().to_string();
    let result = app
        .order_placement
        .place_order(PlaceOrder {
            user_id: Some(domain::EntityId::generate().to_string()),
            items: vec![item(&ghost, 1)],
        })
        .await;
    assert_eq!(result, Err(DomainError::not_found("Product", ghost)));
}

#[tokio::test]
async fn shared_store_reports_live_handles_on_shutdown() {
    let store = Arc::new(app());
    let server_handle = store.clone();

    assert!(!StoreApp::shutdown_shared(store));

    // The surviving handle still serves requests.
    let categories = server_handle.catalog.list_categories().await.unwrap();
    assert!(categories.is_empty());

    assert!(StoreApp::shutdown_shared(server_handle));
}
