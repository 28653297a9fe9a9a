//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tracing::debug;

use super::page_of;
use crate::domain::{
    DomainError, DomainResult, NewRoom, Room, RoomFilter, RoomRepository, RoomStatus,
};
use crate::infrastructure::database::entities::{booking, hotel, room};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: room::Model) -> DomainResult<Room> {
    let status = m
        .status
        .parse::<RoomStatus>()
        .map_err(DomainError::Storage)?;
    Ok(Room {
        id: m.id,
        hotel_id: m.hotel_id,
        room_number: m.room_number,
        floor: m.floor,
        room_type: m.room_type,
        description: m.description,
        price_per_night: m.price_per_night,
        capacity: m.capacity,
        amenities: m.amenities,
        status,
        created_at: m.created_at,
    })
}

fn filtered(filter: &RoomFilter) -> Select<room::Entity> {
    let mut query = room::Entity::find();
    if let Some(hotel_id) = filter.hotel_id {
        query = query.filter(room::Column::HotelId.eq(hotel_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(room::Column::Status.eq(status.as_str()));
    }
    if let Some(ref room_type) = filter.room_type {
        let column = Func::lower(Expr::col(room::Column::RoomType));
        query = query.filter(Expr::expr(column).eq(room_type.to_lowercase()));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(room::Column::PricePerNight.gte(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(room::Column::PricePerNight.lte(max));
    }
    if let Some(capacity) = filter.min_capacity {
        query = query.filter(room::Column::Capacity.gte(capacity));
    }
    query.order_by_asc(room::Column::Id)
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn create(&self, r: NewRoom) -> DomainResult<Room> {
        if hotel::Entity::find_by_id(r.hotel_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::Validation(format!(
                "Referenced entity does not exist: hotel {}",
                r.hotel_id
            )));
        }

        let model = room::ActiveModel {
            id: NotSet,
            hotel_id: Set(r.hotel_id),
            room_number: Set(r.room_number),
            floor: Set(r.floor),
            room_type: Set(r.room_type),
            description: Set(r.description),
            price_per_night: Set(r.price_per_night),
            capacity: Set(r.capacity),
            amenities: Set(r.amenities),
            status: Set(r.status.as_str().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        debug!(room_id = model.id, hotel_id = model.hotel_id, "Room row inserted");
        model_to_domain(model)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        room::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_number(
        &self,
        hotel_id: i32,
        room_number: &str,
    ) -> DomainResult<Option<Room>> {
        room::Entity::find()
            .filter(room::Column::HotelId.eq(hotel_id))
            .filter(room::Column::RoomNumber.eq(room_number))
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn list(
        &self,
        filter: &RoomFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Room>> {
        let paginator = filtered(filter).paginate(&self.db, u64::from(page.limit));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(u64::from(page.page - 1)).await?;
        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(page_of(items, total, page))
    }

    async fn find_all(&self, filter: &RoomFilter) -> DomainResult<Vec<Room>> {
        filtered(filter)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn update(&self, r: Room, write_status: bool) -> DomainResult<Room> {
        if room::Entity::find_by_id(r.id).one(&self.db).await?.is_none() {
            return Err(DomainError::not_found("Room", r.id));
        }
        let model = room::ActiveModel {
            id: Set(r.id),
            hotel_id: Set(r.hotel_id),
            room_number: Set(r.room_number),
            floor: Set(r.floor),
            room_type: Set(r.room_type),
            description: Set(r.description),
            price_per_night: Set(r.price_per_night),
            capacity: Set(r.capacity),
            amenities: Set(r.amenities),
            status: if write_status {
                Set(r.status.as_str().to_string())
            } else {
                NotSet
            },
            created_at: Set(r.created_at),
        }
        .update(&self.db)
        .await?;
        model_to_domain(model)
    }

    async fn set_status(&self, id: i32, status: RoomStatus) -> DomainResult<()> {
        let result = room::Entity::update_many()
            .col_expr(room::Column::Status, Expr::value(status.as_str()))
            .filter(room::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Room", id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        let txn = self.db.begin().await?;
        if room::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::not_found("Room", id));
        }
        let removed = booking::Entity::delete_many()
            .filter(booking::Column::RoomId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        room::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(removed)
    }
}
