//! SeaORM repositories against a private in-memory SQLite database.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use super::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
use crate::domain::{
    BookingChange, BookingStatus, NewBooking, NewHotel, NewRoom, NewUser, RepositoryProvider,
    Room, RoomBookingQuery, RoomStatus, StayPeriod, UserRole,
};
use crate::shared::{DomainError, PaginationParams};

async fn provider() -> Arc<SeaOrmRepositoryProvider> {
    let db = init_database(&DatabaseConfig::sqlite_in_memory())
        .await
        .unwrap();
    run_migrations(&db).await.unwrap();
    Arc::new(SeaOrmRepositoryProvider::new(db))
}

fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 7, 10, 15, 0, 0).unwrap() + Duration::days(offset)
}

fn stay(from: i64, to: i64) -> StayPeriod {
    StayPeriod::new(day(from), day(to)).unwrap()
}

/// Hotel, one 80/night room and one guest. Returns (user_id, room).
async fn seed(repos: &SeaOrmRepositoryProvider) -> (i32, Room) {
    let hotel = repos
        .hotels()
        .create(NewHotel {
            name: "Lakeside".into(),
            description: Some("By the water".into()),
            address: "Shore 9".into(),
            city: "Tartu".into(),
            country: "Estonia".into(),
            rating: 3.5,
        })
        .await
        .unwrap();
    let room = repos
        .rooms()
        .create(NewRoom {
            hotel_id: hotel.id,
            room_number: "12".into(),
            floor: 1,
            room_type: "Double".into(),
            description: None,
            price_per_night: Decimal::new(8000, 2),
            capacity: 2,
            amenities: Some("wifi".into()),
            status: RoomStatus::Available,
        })
        .await
        .unwrap();
    let user = repos
        .users()
        .create(NewUser {
            email: "kai@example.com".into(),
            first_name: "Kai".into(),
            last_name: "Saar".into(),
            phone: None,
            role: UserRole::User,
        })
        .await
        .unwrap();
    (user.id, room)
}

fn new_booking(user_id: i32, room: &Room, from: i64, to: i64) -> NewBooking {
    NewBooking::new(
        user_id,
        room.hotel_id,
        room.id,
        stay(from, to),
        2,
        room.price_per_night,
        None,
    )
}

#[tokio::test]
async fn create_occupies_room_and_rejects_overlap() {
    let repos = provider().await;
    let (user_id, room) = seed(&repos).await;

    let booking = repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 0, 3))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_price, Decimal::new(24000, 2));

    let stored_room = repos.rooms().find_by_id(room.id).await.unwrap().unwrap();
    assert_eq!(stored_room.status, RoomStatus::Occupied);

    let err = repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 10, 12))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::RoomUnavailable {
            room_id: room.id,
            status: RoomStatus::Occupied
        }
    );

    // Reopened by hand: the interval check still guards the dates.
    repos
        .rooms()
        .set_status(room.id, RoomStatus::Available)
        .await
        .unwrap();
    let err = repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 2, 5))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::DateConflict { room_id: room.id });

    // Back-to-back stays share only the boundary instant.
    repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 3, 4))
        .await
        .unwrap();

    let found = repos
        .bookings()
        .find_by_reference(&booking.booking_reference)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, booking.id);
}

#[tokio::test]
async fn cancelled_bookings_stop_conflicting() {
    let repos = provider().await;
    let (user_id, room) = seed(&repos).await;

    let booking = repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 0, 2))
        .await
        .unwrap();

    let mut cancelled = booking.clone();
    cancelled.status = BookingStatus::Cancelled;
    repos
        .bookings()
        .commit(BookingChange {
            booking: cancelled,
            expected_status: BookingStatus::Confirmed,
            room_status: Some(RoomStatus::Available),
            revalidate_period: false,
        })
        .await
        .unwrap();

    assert!(repos
        .bookings()
        .find_conflicting(room.id, &stay(0, 2), None)
        .await
        .unwrap()
        .is_none());
    assert_eq!(repos.bookings().count_active_for_user(user_id).await.unwrap(), 0);

    let history = repos
        .bookings()
        .list_for_room(
            room.id,
            &RoomBookingQuery {
                period: None,
                statuses: vec![BookingStatus::Cancelled],
            },
        )
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn room_numbers_are_unique_per_hotel() {
    let repos = provider().await;
    let (_, room) = seed(&repos).await;

    let err = repos
        .rooms()
        .create(NewRoom {
            hotel_id: room.hotel_id,
            room_number: room.room_number.clone(),
            floor: 2,
            room_type: "single".into(),
            description: None,
            price_per_night: Decimal::from(40),
            capacity: 1,
            amenities: None,
            status: RoomStatus::Available,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ALREADY_EXISTS");
}

#[tokio::test]
async fn hotel_delete_cascades_to_rooms_and_bookings() {
    let repos = provider().await;
    let (user_id, room) = seed(&repos).await;
    repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 0, 1))
        .await
        .unwrap();

    let deletion = repos.hotels().delete(room.hotel_id).await.unwrap();
    assert_eq!(deletion.rooms_deleted, 1);
    assert_eq!(deletion.bookings_deleted, 1);

    assert!(repos.rooms().find_by_id(room.id).await.unwrap().is_none());
    let all = repos
        .bookings()
        .list(PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(all.total, 0);
    assert!(repos.users().find_by_id(user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn commit_refuses_a_stale_status() {
    let repos = provider().await;
    let (user_id, room) = seed(&repos).await;
    let booking = repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 0, 2))
        .await
        .unwrap();

    let mut cancelled = booking.clone();
    cancelled.status = BookingStatus::Cancelled;
    repos
        .bookings()
        .commit(BookingChange {
            booking: cancelled,
            expected_status: BookingStatus::Confirmed,
            room_status: Some(RoomStatus::Available),
            revalidate_period: false,
        })
        .await
        .unwrap();

    // An edit computed from the confirmed copy must not resurrect it.
    let mut edited = booking.clone();
    edited.number_of_guests = 1;
    let err = repos
        .bookings()
        .commit(BookingChange {
            booking: edited,
            expected_status: BookingStatus::Confirmed,
            room_status: Some(RoomStatus::Occupied),
            revalidate_period: true,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::BookingImmutable {
            status: BookingStatus::Cancelled
        }
    );

    let stored = repos.bookings().find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(stored.number_of_guests, 2);
    let stored_room = repos.rooms().find_by_id(room.id).await.unwrap().unwrap();
    assert_eq!(stored_room.status, RoomStatus::Available);
}

#[tokio::test]
async fn room_update_without_status_keeps_stored_status() {
    let repos = provider().await;
    let (user_id, room) = seed(&repos).await;
    repos
        .bookings()
        .create_occupying_room(new_booking(user_id, &room, 0, 2))
        .await
        .unwrap();

    let mut edited = room.clone();
    edited.price_per_night = Decimal::from(95);
    let saved = repos.rooms().update(edited.clone(), false).await.unwrap();
    assert_eq!(saved.status, RoomStatus::Occupied);
    assert_eq!(saved.price_per_night, Decimal::from(95));

    let saved = repos.rooms().update(edited, true).await.unwrap();
    assert_eq!(saved.status, RoomStatus::Available);
}
