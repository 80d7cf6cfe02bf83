//! Checkout service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    accounts::records::CustomerUuid,
    database::Db,
    domain::{
        addresses::{
            records::{AddressDetails, AddressKind},
            repository::PgAddressesRepository,
        },
        carts::{
            repositories::{PgCartItemsRepository, PgCartsRepository},
            totals::{CartTotals, total_price},
        },
        checkout::{
            errors::CheckoutError,
            form::{AddressInput, CheckoutForm},
        },
        coupons::{redeem_in, repository::PgCouponsRepository},
        invoices::generator::InvoiceGenerator,
        locations::repository::PgLocationsRepository,
        orders::{
            data::{NewOrder, NewOrderItem},
            number::order_number,
            records::{OrderItemUuid, OrderRecord, OrderStatus, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
    },
    settings::StoreSettings,
};

/// Form field names for one address, used to name an unknown location.
struct LocationFields {
    division: &'static str,
    city: &'static str,
    area: &'static str,
}

const SHIPPING_FIELDS: LocationFields = LocationFields {
    division: "division",
    city: "city",
    area: "area",
};

/// Fresh order numbers tried before giving up on a clash.
const ORDER_NUMBER_ATTEMPTS: u32 = 5;

const BILLING_FIELDS: LocationFields = LocationFields {
    division: "billing_division",
    city: "billing_city",
    area: "billing_area",
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    settings: StoreSettings,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    locations_repository: PgLocationsRepository,
    addresses_repository: PgAddressesRepository,
    coupons_repository: PgCouponsRepository,
    orders_repository: PgOrdersRepository,
    order_items_repository: PgOrderItemsRepository,
    invoices: InvoiceGenerator,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, settings: StoreSettings) -> Self {
        Self {
            db,
            settings,
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            locations_repository: PgLocationsRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            order_items_repository: PgOrderItemsRepository::new(),
            invoices: InvoiceGenerator::new(settings),
        }
    }

    /// Check that the division, city and area exist and nest inside each other.
    async fn resolve_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        input: AddressInput,
        fields: &LocationFields,
    ) -> Result<AddressDetails, CheckoutError> {
        let division = self
            .locations_repository
            .find_division(tx, input.division)
            .await?
            .ok_or(CheckoutError::UnknownLocation {
                field: fields.division,
            })?;

        let city = self
            .locations_repository
            .find_city(tx, input.city)
            .await?
            .filter(|city| city.division_uuid == division.uuid)
            .ok_or(CheckoutError::UnknownLocation { field: fields.city })?;

        let area = self
            .locations_repository
            .find_area(tx, input.area)
            .await?
            .filter(|area| area.city_uuid == city.uuid)
            .ok_or(CheckoutError::UnknownLocation { field: fields.area })?;

        Ok(AddressDetails {
            address_line: input.address_line,
            division_uuid: division.uuid,
            city_uuid: city.uuid,
            area_uuid: area.uuid,
            postal_code: input.postal_code,
            phone_number: input.phone_number,
        })
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.checkout",
        skip(self, form),
        fields(customer_uuid = %customer),
        err
    )]
    async fn checkout(
        &self,
        customer: CustomerUuid,
        form: CheckoutForm,
        now: Timestamp,
    ) -> Result<OrderRecord, CheckoutError> {
        let request = form.validate().map_err(CheckoutError::Validation)?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_open_cart(&mut tx, customer)
            .await?
            .ok_or(CheckoutError::NoOpenCart)?;

        let items = self
            .cart_items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let shipping_details = self
            .resolve_address(&mut tx, request.shipping, &SHIPPING_FIELDS)
            .await?;

        let billing_details = match request.billing {
            Some(billing) => {
                self.resolve_address(&mut tx, billing, &BILLING_FIELDS)
                    .await?
            }
            None => shipping_details.clone(),
        };

        let shipping_address = self
            .addresses_repository
            .upsert_address(&mut tx, AddressKind::Shipping, customer, &shipping_details)
            .await?;
        let billing_address = self
            .addresses_repository
            .upsert_address(&mut tx, AddressKind::Billing, customer, &billing_details)
            .await?;

        let subtotal = total_price(&items, now);

        let discount = match cart.coupon_uuid {
            Some(coupon_uuid) => {
                redeem_in(
                    &self.coupons_repository,
                    &mut tx,
                    coupon_uuid,
                    customer,
                    subtotal,
                    now,
                )
                .await?;

                self.coupons_repository
                    .get_coupon(&mut tx, coupon_uuid)
                    .await?
                    .discount_amount(subtotal)
            }
            None => 0,
        };

        let totals = CartTotals::compute(subtotal, discount, &self.settings);

        let mut new_order = NewOrder {
            uuid: OrderUuid::new(),
            customer_uuid: customer,
            cart_uuid: cart.uuid,
            order_number: order_number(now),
            payment_method: request.payment_method,
            status: OrderStatus::Pending,
            totals,
            coupon_uuid: cart.coupon_uuid,
            shipping_address_uuid: shipping_address.uuid,
            billing_address_uuid: billing_address.uuid,
            phone_number: shipping_details.phone_number.clone(),
        };

        let mut attempts = 1;

        let order = loop {
            if let Some(order) = self
                .orders_repository
                .create_order(&mut tx, &new_order)
                .await?
            {
                break order;
            }

            if attempts == ORDER_NUMBER_ATTEMPTS {
                return Err(CheckoutError::AlreadyExists);
            }

            attempts += 1;
            new_order.order_number = order_number(now);
        };

        for item in &items {
            self.order_items_repository
                .create_order_item(
                    &mut tx,
                    order.uuid,
                    &NewOrderItem {
                        uuid: OrderItemUuid::new(),
                        product_uuid: item.product.uuid,
                        variant_uuid: item.variant.as_ref().map(|variant| variant.uuid),
                        quantity: item.quantity,
                        unit_price: item.unit_price(now),
                    },
                )
                .await?;
        }

        if self.carts_repository.mark_paid(&mut tx, cart.uuid).await? == 0 {
            return Err(CheckoutError::NoOpenCart);
        }

        if order.status == OrderStatus::Paid {
            self.invoices.generate(&mut tx, &order, now).await?;
        }

        tx.commit().await?;

        info!(
            order_uuid = %order.uuid,
            order_number = %order.order_number,
            total_price = order.total_price,
            "order created"
        );

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate the form, then turn the customer's open cart into a pending order.
    ///
    /// Addresses are saved, an attached coupon is redeemed and the cart is closed in the same
    /// transaction as the order. Nothing is written if any step fails.
    async fn checkout(
        &self,
        customer: CustomerUuid,
        form: CheckoutForm,
        now: Timestamp,
    ) -> Result<OrderRecord, CheckoutError>;
}
