//! SeaORM implementation of HotelRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::page_of;
use crate::domain::{
    DomainError, DomainResult, Hotel, HotelDeletion, HotelFilter, HotelRepository, NewHotel,
};
use crate::infrastructure::database::entities::{booking, hotel, room};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmHotelRepository {
    db: DatabaseConnection,
}

impl SeaOrmHotelRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: hotel::Model) -> Hotel {
    Hotel {
        id: m.id,
        name: m.name,
        description: m.description,
        address: m.address,
        city: m.city,
        country: m.country,
        rating: m.rating,
        created_at: m.created_at,
    }
}

// ── HotelRepository impl ────────────────────────────────────────

#[async_trait]
impl HotelRepository for SeaOrmHotelRepository {
    async fn create(&self, h: NewHotel) -> DomainResult<Hotel> {
        let model = hotel::ActiveModel {
            id: NotSet,
            name: Set(h.name),
            description: Set(h.description),
            address: Set(h.address),
            city: Set(h.city),
            country: Set(h.country),
            rating: Set(h.rating),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        debug!(hotel_id = model.id, "Hotel row inserted");
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Hotel>> {
        let model = hotel::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(
        &self,
        filter: &HotelFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Hotel>> {
        let mut query = hotel::Entity::find();
        if let Some(ref city) = filter.city {
            query = query.filter(hotel::Column::City.eq(city.as_str()));
        }
        if let Some(ref country) = filter.country {
            query = query.filter(hotel::Column::Country.eq(country.as_str()));
        }

        let paginator = query
            .order_by_asc(hotel::Column::Id)
            .paginate(&self.db, u64::from(page.limit));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(u64::from(page.page - 1)).await?;
        Ok(page_of(
            models.into_iter().map(model_to_domain).collect(),
            total,
            page,
        ))
    }

    async fn update(&self, h: Hotel) -> DomainResult<Hotel> {
        if hotel::Entity::find_by_id(h.id).one(&self.db).await?.is_none() {
            return Err(DomainError::not_found("Hotel", h.id));
        }
        let model = hotel::ActiveModel {
            id: Set(h.id),
            name: Set(h.name),
            description: Set(h.description),
            address: Set(h.address),
            city: Set(h.city),
            country: Set(h.country),
            rating: Set(h.rating),
            created_at: Set(h.created_at),
        }
        .update(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<HotelDeletion> {
        let txn = self.db.begin().await?;
        if hotel::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("Hotel", id));
        }

        let bookings_deleted = booking::Entity::delete_many()
            .filter(booking::Column::HotelId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let rooms_deleted = room::Entity::delete_many()
            .filter(room::Column::HotelId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        hotel::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(HotelDeletion {
            hotel_id: id,
            rooms_deleted,
            bookings_deleted,
        })
    }
}
