use config::Config;
use domain::*;
use infrastructure::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// The adapters a store runs on. Production wires SQLite, bcrypt and JWT;
/// tests can hand in anything implementing the ports.
pub struct StorePorts {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_issuer: Arc<dyn TokenIssuer>,
}

/// Storefront Application - wires the domain services to their adapters
pub struct StoreApp {
    pub order_placement: OrderPlacementService,
    pub order_admin: OrderAdminService,
    pub catalog: CatalogService,
    pub users: UserService,
    // Kept so the pool lives exactly as long as the services using it
    database: Option<Database>,
}

impl StoreApp {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::new(&config.database_path, config.database_pool_size)?;
        let pool = database.get_pool().clone();

        let ports = StorePorts {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            categories: Arc::new(SqliteCategoryRepository::new(pool.clone())),
            products: Arc::new(SqliteProductRepository::new(pool.clone())),
            orders: Arc::new(SqliteOrderRepository::new(pool)),
            password_hasher: Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
            token_issuer: Arc::new(JwtTokenIssuer::new(
                &config.jwt_secret,
                Duration::from_secs(config.jwt_ttl_hours.saturating_mul(3600)),
            )),
        };

        let mut app = Self::from_ports(ports);
        app.database = Some(database);
        info!(database = %config.database_path, "storefront application ready");
        Ok(app)
    }

    pub fn from_ports(ports: StorePorts) -> Self {
        // Domain services
        let order_placement = OrderPlacementService::new(ports.orders.clone(), ports.products.clone());
        let order_admin = OrderAdminService::new(
            ports.orders,
            ports.users.clone(),
            ports.products.clone(),
        );
        let catalog = CatalogService::new(ports.categories, ports.products);
        let users = UserService::new(ports.users, ports.password_hasher, ports.token_issuer);

        Self {
            order_placement,
            order_admin,
            catalog,
            users,
            database: None,
        }
    }

    /// Closes the connection pool. Called once the server has stopped
    /// accepting requests.
    pub fn shutdown(self) {
        if let Some(database) = self.database {
            drop(database);
            info!("database connections closed");
        }
    }

    /// Shuts down a store shared with the server. Returns `false` when another
    /// handle is still alive; the pool is then released with the last one.
    pub fn shutdown_shared(app: Arc<Self>) -> bool {
        match Arc::try_unwrap(app) {
            Ok(app) => {
                app.shutdown();
                true
            }
            Err(app) => {
                warn!(
                    handles = Arc::strong_count(&app),
                    "store still referenced after drain, connections close when the last handle drops"
                );
                false
            }
        }
    }
}
