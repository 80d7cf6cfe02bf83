//! Addresses Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    accounts::records::CustomerUuid,
    domain::{
        addresses::records::{AddressDetails, AddressKind, AddressRecord, AddressUuid},
        locations::records::{AreaUuid, CityUuid, DivisionUuid},
    },
};

const UPSERT_SHIPPING_ADDRESS_SQL: &str = include_str!("sql/upsert_shipping_address.sql");
const UPSERT_BILLING_ADDRESS_SQL: &str = include_str!("sql/upsert_billing_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert or overwrite the customer's address of `kind`. An existing row keeps its UUID.
    pub(crate) async fn upsert_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: AddressKind,
        customer: CustomerUuid,
        details: &AddressDetails,
    ) -> Result<AddressRecord, sqlx::Error> {
        let sql = match kind {
            AddressKind::Shipping => UPSERT_SHIPPING_ADDRESS_SQL,
            AddressKind::Billing => UPSERT_BILLING_ADDRESS_SQL,
        };

        query_as::<Postgres, AddressRecord>(sql)
            .bind(AddressUuid::new().into_uuid())
            .bind(customer.into_uuid())
            .bind(&details.address_line)
            .bind(details.division_uuid.into_uuid())
            .bind(details.city_uuid.into_uuid())
            .bind(details.area_uuid.into_uuid())
            .bind(details.postal_code.as_deref())
            .bind(&details.phone_number)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            details: AddressDetails {
                address_line: row.try_get("address_line")?,
                division_uuid: DivisionUuid::from_uuid(row.try_get("division_uuid")?),
                city_uuid: CityUuid::from_uuid(row.try_get("city_uuid")?),
                area_uuid: AreaUuid::from_uuid(row.try_get("area_uuid")?),
                postal_code: row.try_get("postal_code")?,
                phone_number: row.try_get("phone_number")?,
            },
        })
    }
}
