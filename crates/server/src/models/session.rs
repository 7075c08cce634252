//! Session-held spot binding.
//!
//! The QR binding handler writes a `business_id`/`parking_spot_id` pair into
//! the visitor's session; the tenant resolver and order composer read it on
//! every subsequent request. Both values are optional - a visitor who never
//! scanned a QR code has neither.

use tower_sessions::Session;

use curbside_core::{BusinessId, ParkingSpotId};

/// Session keys for the spot binding.
pub mod keys {
    /// Key for the business the visitor is bound to.
    pub const BUSINESS_ID: &str = "business_id";

    /// Key for the parking spot the visitor is bound to.
    pub const PARKING_SPOT_ID: &str = "parking_spot_id";
}

/// The business/spot binding read from the current session.
#[derive(Debug, Clone, Default)]
pub struct SpotSession {
    pub business_id: Option<BusinessId>,
    pub parking_spot_id: Option<ParkingSpotId>,
}

impl SpotSession {
    /// Load the binding from the session.
    ///
    /// Session read failures are treated as an absent binding - resolution
    /// then falls back to the host header or cart contents.
    pub async fn load(session: &Session) -> Self {
        let business_id = session
            .get::<String>(keys::BUSINESS_ID)
            .await
            .ok()
            .flatten()
            .map(BusinessId::new);
        let parking_spot_id = session
            .get::<String>(keys::PARKING_SPOT_ID)
            .await
            .ok()
            .flatten()
            .map(ParkingSpotId::new);

        Self {
            business_id,
            parking_spot_id,
        }
    }
}
