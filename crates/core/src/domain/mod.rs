pub mod price_rule;
pub mod rate;
pub mod reservation;
pub mod room_type;
