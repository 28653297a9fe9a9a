//! SeaORM implementation of BookingRepository
//!
//! Writes that touch a room lock its row (`SELECT ... FOR UPDATE` on
//! PostgreSQL) and re-run the overlap query inside the same transaction, so
//! two processes sharing the database still cannot double-book.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::{page_of, room_repository};
use crate::domain::{
    Booking, BookingChange, BookingRepository, BookingStatus, DomainError, DomainResult,
    NewBooking, RoomBookingQuery, RoomStatus, StayPeriod,
};
use crate::infrastructure::database::entities::{booking, room};
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let status = m
        .status
        .parse::<BookingStatus>()
        .map_err(DomainError::Storage)?;
    Ok(Booking {
        id: m.id,
        booking_reference: m.booking_reference,
        user_id: m.user_id,
        hotel_id: m.hotel_id,
        room_id: m.room_id,
        check_in_date: m.check_in_date,
        check_out_date: m.check_out_date,
        number_of_guests: m.number_of_guests,
        total_price: m.total_price,
        status,
        special_requests: m.special_requests,
        created_at: m.created_at,
    })
}

fn all_to_domain(models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
    models.into_iter().map(model_to_domain).collect()
}

fn active_statuses() -> impl Iterator<Item = &'static str> {
    BookingStatus::ACTIVE.into_iter().map(|s| s.as_str())
}

// ── Query helpers shared by reads and transactional writes ──────

async fn first_conflict<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    stay: &StayPeriod,
    excluding: Option<i32>,
) -> DomainResult<Option<booking::Model>> {
    let mut query = booking::Entity::find()
        .filter(booking::Column::RoomId.eq(room_id))
        .filter(booking::Column::Status.is_in(active_statuses()))
        .filter(booking::Column::CheckInDate.lt(stay.check_out()))
        .filter(booking::Column::CheckOutDate.gt(stay.check_in()));
    if let Some(id) = excluding {
        query = query.filter(booking::Column::Id.ne(id));
    }
    Ok(query
        .order_by_asc(booking::Column::CheckInDate)
        .one(conn)
        .await?)
}

async fn lock_room<C: ConnectionTrait>(conn: &C, room_id: i32) -> DomainResult<room::Model> {
    room::Entity::find_by_id(room_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Room", room_id))
}

async fn set_room_status<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    status: RoomStatus,
) -> DomainResult<()> {
    room::Entity::update_many()
        .col_expr(room::Column::Status, Expr::value(status.as_str()))
        .filter(room::Column::Id.eq(room_id))
        .exec(conn)
        .await?;
    Ok(())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        booking::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> DomainResult<Option<Booking>> {
        booking::Entity::find()
            .filter(booking::Column::BookingReference.eq(reference))
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn list(&self, page: PaginationParams) -> DomainResult<PaginatedResult<Booking>> {
        let paginator = booking::Entity::find()
            .order_by_desc(booking::Column::Id)
            .paginate(&self.db, u64::from(page.limit));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(u64::from(page.page - 1)).await?;
        Ok(page_of(all_to_domain(models)?, total, page))
    }

    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::Id)
            .all(&self.db)
            .await?;
        all_to_domain(models)
    }

    async fn list_for_room(
        &self,
        room_id: i32,
        q: &RoomBookingQuery,
    ) -> DomainResult<Vec<Booking>> {
        let mut query = booking::Entity::find().filter(booking::Column::RoomId.eq(room_id));
        if let Some(period) = q.period {
            query = query
                .filter(booking::Column::CheckInDate.lt(period.check_out()))
                .filter(booking::Column::CheckOutDate.gt(period.check_in()));
        }
        if !q.statuses.is_empty() {
            let statuses = q.statuses.iter().map(|s| s.as_str());
            query = query.filter(booking::Column::Status.is_in(statuses));
        }
        let models = query
            .order_by_asc(booking::Column::CheckInDate)
            .order_by_asc(booking::Column::Id)
            .all(&self.db)
            .await?;
        all_to_domain(models)
    }

    async fn find_conflicting(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        excluding: Option<i32>,
    ) -> DomainResult<Option<Booking>> {
        first_conflict(&self.db, room_id, stay, excluding)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn count_active_for_user(&self, user_id: i32) -> DomainResult<u64> {
        Ok(booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::Status.is_in(active_statuses()))
            .count(&self.db)
            .await?)
    }

    async fn create_occupying_room(&self, b: NewBooking) -> DomainResult<Booking> {
        let txn = self.db.begin().await?;
        let room = room_repository::model_to_domain(lock_room(&txn, b.room_id).await?)?;
        if !room.is_available() {
            return Err(DomainError::RoomUnavailable {
                room_id: room.id,
                status: room.status,
            });
        }

        if let Some(existing) = first_conflict(&txn, b.room_id, &b.stay, None).await? {
            debug!(
                room_id = b.room_id,
                existing_booking = existing.id,
                "Overlap found inside transaction"
            );
            return Err(DomainError::DateConflict { room_id: b.room_id });
        }

        let model = booking::ActiveModel {
            id: NotSet,
            booking_reference: Set(b.booking_reference),
            user_id: Set(b.user_id),
            hotel_id: Set(b.hotel_id),
            room_id: Set(b.room_id),
            check_in_date: Set(b.stay.check_in()),
            check_out_date: Set(b.stay.check_out()),
            number_of_guests: Set(b.number_of_guests),
            total_price: Set(b.total_price),
            status: Set(BookingStatus::Confirmed.as_str().to_string()),
            special_requests: Set(b.special_requests),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
        set_room_status(&txn, model.room_id, RoomStatus::Occupied).await?;
        txn.commit().await?;

        model_to_domain(model)
    }

    async fn commit(&self, change: BookingChange) -> DomainResult<Booking> {
        let txn = self.db.begin().await?;
        lock_room(&txn, change.booking.room_id).await?;
        let stored = booking::Entity::find_by_id(change.booking.id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", change.booking.id))?;
        change.check_stored(model_to_domain(stored)?.status)?;

        let b = change.booking;

        if change.revalidate_period {
            let stay = b.stay()?;
            if first_conflict(&txn, b.room_id, &stay, Some(b.id))
                .await?
                .is_some()
            {
                return Err(DomainError::DateConflict { room_id: b.room_id });
            }
        }

        let model = booking::ActiveModel {
            id: Set(b.id),
            booking_reference: Set(b.booking_reference),
            user_id: Set(b.user_id),
            hotel_id: Set(b.hotel_id),
            room_id: Set(b.room_id),
            check_in_date: Set(b.check_in_date),
            check_out_date: Set(b.check_out_date),
            number_of_guests: Set(b.number_of_guests),
            total_price: Set(b.total_price),
            status: Set(b.status.as_str().to_string()),
            special_requests: Set(b.special_requests),
            created_at: Set(b.created_at),
        }
        .update(&txn)
        .await?;
        if let Some(status) = change.room_status {
            set_room_status(&txn, model.room_id, status).await?;
        }
        txn.commit().await?;

        model_to_domain(model)
    }
}
