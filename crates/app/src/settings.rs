//! Store settings shared by the pricing and checkout flows.

use jiff::tz::{self, Offset, TimeZone};

/// Default flat shipping charge, in minor units.
pub const DEFAULT_SHIPPING_CHARGE: u64 = 40_00;

/// Default flat packaging charge, in minor units.
pub const DEFAULT_PACKAGING_CHARGE: u64 = 20_00;

/// Default store offset from UTC, in hours.
pub const DEFAULT_UTC_OFFSET_HOURS: i8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub shipping_charge: u64,
    pub packaging_charge: u64,
    pub utc_offset: Offset,
}

impl StoreSettings {
    /// Fixed-offset zone used to interpret naive timestamps.
    #[must_use]
    pub fn time_zone(&self) -> TimeZone {
        TimeZone::fixed(self.utc_offset)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            shipping_charge: DEFAULT_SHIPPING_CHARGE,
            packaging_charge: DEFAULT_PACKAGING_CHARGE,
            utc_offset: tz::offset(DEFAULT_UTC_OFFSET_HOURS),
        }
    }
}
