//! Storefront Config

use clap::Args;
use jiff::tz::Offset;
use storefront_app::settings::{
    DEFAULT_PACKAGING_CHARGE, DEFAULT_SHIPPING_CHARGE, DEFAULT_UTC_OFFSET_HOURS, StoreSettings,
};

/// Store fees and local time.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Flat shipping charge per order, in poisha
    #[arg(long, env = "SHIPPING_CHARGE", default_value_t = DEFAULT_SHIPPING_CHARGE)]
    pub shipping_charge: u64,

    /// Flat packaging charge per order, in poisha
    #[arg(long, env = "PACKAGING_CHARGE", default_value_t = DEFAULT_PACKAGING_CHARGE)]
    pub packaging_charge: u64,

    /// Store offset from UTC in hours
    #[arg(
        long,
        env = "STORE_UTC_OFFSET_HOURS",
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_hyphen_values = true
    )]
    pub store_utc_offset_hours: i8,
}

impl StorefrontConfig {
    /// Build the settings shared by the domain services.
    ///
    /// # Errors
    ///
    /// Returns an error when the offset is outside the range jiff supports.
    pub fn store_settings(&self) -> Result<StoreSettings, jiff::Error> {
        Ok(StoreSettings {
            shipping_charge: self.shipping_charge,
            packaging_charge: self.packaging_charge,
            utc_offset: Offset::from_hours(self.store_utc_offset_hours)?,
        })
    }
}
