use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomTypeId(pub String);

/// A bookable category of inventory owned by one customer account.
///
/// `is_active = false` is a soft delete: inactive room types never show up in
/// availability queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: RoomTypeId,
    pub customer_id: CustomerId,
    pub name: String,
    pub total_rooms: u32,
    pub max_guests: u32,
    pub base_price: Decimal,
    pub is_active: bool,
}

impl RoomType {
    pub fn reference(&self) -> RoomTypeRef {
        RoomTypeRef { id: self.id.0.clone(), name: self.name.clone() }
    }
}

/// Known `{id, name}` pair used to resolve a typed room-type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeRef {
    pub id: String,
    pub name: String,
}
