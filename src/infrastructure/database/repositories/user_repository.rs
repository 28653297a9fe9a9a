//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::page_of;
use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::{booking, user};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: user::Model) -> DomainResult<User> {
    let role = m.role.parse::<UserRole>().map_err(DomainError::Storage)?;
    Ok(User {
        id: m.id,
        email: m.email,
        first_name: m.first_name,
        last_name: m.last_name,
        phone: m.phone,
        role,
        created_at: m.created_at,
    })
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: NewUser) -> DomainResult<User> {
        let model = user::ActiveModel {
            id: NotSet,
            email: Set(u.email),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            phone: Set(u.phone),
            role: Set(u.role.as_str().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        model_to_domain(model)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<User>> {
        let paginator = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .paginate(&self.db, u64::from(page.limit));
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page - 1))
            .await?
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(page_of(items, total, page))
    }

    async fn update(&self, u: User) -> DomainResult<User> {
        if user::Entity::find_by_id(u.id).one(&self.db).await?.is_none() {
            return Err(DomainError::not_found("User", u.id));
        }
        let model = user::ActiveModel {
            id: Set(u.id),
            email: Set(u.email),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            phone: Set(u.phone),
            role: Set(u.role.as_str().to_string()),
            created_at: Set(u.created_at),
        }
        .update(&self.db)
        .await?;
        model_to_domain(model)
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        let txn = self.db.begin().await?;
        if user::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }
        let removed = booking::Entity::delete_many()
            .filter(booking::Column::UserId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        user::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(removed)
    }
}
