//! Deterministic cache key builders

use std::collections::BTreeMap;
use std::fmt::Display;

pub const TOTAL_BOOKINGS: &str = "stats:total_bookings";
pub const HOTEL_LIST_PREFIX: &str = "hotels:";

pub fn booking(id: i32) -> String {
    format!("booking:{}", id)
}

pub fn user_bookings(user_id: i32) -> String {
    format!("user_bookings:{}", user_id)
}

pub fn hotel(id: i32) -> String {
    format!("hotel:{}", id)
}

pub fn hotel_list(shape: &QueryShape) -> String {
    format!("{}{}", HOTEL_LIST_PREFIX, shape)
}

pub fn room_search_prefix(hotel_id: i32) -> String {
    format!("rooms_search:hotel:{}:", hotel_id)
}

pub fn room_search(hotel_id: i32, shape: &QueryShape) -> String {
    format!("{}{}", room_search_prefix(hotel_id), shape)
}

pub fn hotel_bookings_counter(hotel_id: i32) -> String {
    format!("stats:hotel:{}:bookings", hotel_id)
}

pub fn room_bookings_counter(room_id: i32) -> String {
    format!("stats:room:{}:bookings", room_id)
}

/// Query parameters rendered as `name:value` pairs sorted by name.
///
/// Absent parameters are left out, so two requests with the same effective
/// filter always produce the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryShape(BTreeMap<&'static str, String>);

impl QueryShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Display) -> Self {
        self.0.insert(name, value.to_string());
        self
    }

    pub fn with_opt<V: Display>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }
}

impl Display for QueryShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, value) in &self.0 {
            if !first {
                f.write_str(":")?;
            }
            write!(f, "{}:{}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_is_order_independent() {
        let a = QueryShape::new().with("page", 1).with("city", "Riga");
        let b = QueryShape::new().with("city", "Riga").with("page", 1);
        assert_eq!(hotel_list(&a), hotel_list(&b));
        assert_eq!(hotel_list(&a), "hotels:city:Riga:page:1");
    }

    #[test]
    fn absent_params_are_skipped() {
        let shape = QueryShape::new()
            .with("limit", 20)
            .with_opt::<&str>("country", None);
        assert_eq!(shape.to_string(), "limit:20");
    }

    #[test]
    fn room_search_keys_share_the_hotel_prefix() {
        let key = room_search(4, &QueryShape::new().with("min_capacity", 2));
        assert!(key.starts_with(&room_search_prefix(4)));
        assert!(!key.starts_with(&room_search_prefix(40)));
    }
}
