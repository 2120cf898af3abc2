use crate::database::{join_error, pool_error, query_error, stored_id, users, SqlitePool, BATCH_SIZE};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{DomainError, EntityId, Role, User, UserRepository};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: String,
    username: Option<String>,
    email: String,
    password_hash: String,
    role: String,
    created_at: NaiveDateTime,
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role: Role = model
            .role
            .parse()
            .map_err(|_| DomainError::PersistenceError(format!("unknown role in store: {}", model.role)))?;

        Ok(User::with_id(
            stored_id(&model.id)?,
            model.username,
            model.email,
            model.password_hash,
            role,
            model.created_at.and_utc(),
        ))
    }
}

impl UserModel {
    fn new(id: EntityId, user: &User) -> Self {
        UserModel {
            id: id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at.naive_utc(),
        }
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one<F>(&self, query: F) -> Result<Option<User>, DomainError>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<Option<UserModel>> + Send + 'static,
    {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let result = tokio::task::spawn_blocking(move || query(&mut *conn))
            .await
            .map_err(join_error)?
            .map_err(query_error)?;

        result.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.get().map_err(pool_error)?;
        let ids: Vec<String> = ids.iter().map(EntityId::to_string).collect();

        let models = tokio::task::spawn_blocking(move || {
            let mut models = Vec::with_capacity(ids.len());
            for chunk in ids.chunks(BATCH_SIZE) {
                let batch = users::table
                    .filter(users::id.eq_any(chunk.to_vec()))
                    .select(UserModel::as_select())
                    .load::<UserModel>(&mut conn)?;
                models.extend(batch);
            }
            QueryResult::Ok(models)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        models.into_iter().map(User::try_from).collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.to_string();
        self.find_one(move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username = username.to_string();
        self.find_one(move |conn| {
            users::table
                .filter(users::username.eq(username))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let id = user.id.unwrap_or_else(EntityId::generate);
        let new_user = UserModel::new(id, user);

        tokio::task::spawn_blocking(move || {
            diesel::insert_into(users::table)
                .values(&new_user)
                .execute(&mut conn)
        })
        .await
        .map_err(join_error)?
        .map_err(query_error)?;

        let mut saved = user.clone();
        saved.id = Some(id);
        Ok(saved)
    }
}
