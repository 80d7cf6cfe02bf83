//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use storefront_app::{
    accounts::{MockAccountsService, records::CustomerUuid},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartUuid},
        },
        catalog::{
            MockCatalogService,
            records::{ProductRecord, ProductUuid},
        },
        checkout::MockCheckoutService,
        coupons::MockCouponsService,
        invoices::MockInvoicesService,
        locations::MockLocationsService,
        orders::{
            MockOrdersService,
            records::{OrderRecord, OrderStatus, OrderUuid, PaymentMethod},
        },
        payments::MockPaymentsService,
    },
    settings::StoreSettings,
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: CustomerUuid = CustomerUuid::from_uuid(Uuid::nil());

/// One mock per service. Any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub accounts: MockAccountsService,
    pub locations: MockLocationsService,
    pub catalog: MockCatalogService,
    pub coupons: MockCouponsService,
    pub carts: MockCartsService,
    pub checkout: MockCheckoutService,
    pub orders: MockOrdersService,
    pub invoices: MockInvoicesService,
    pub payments: MockPaymentsService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            settings: StoreSettings::default(),
            accounts: Arc::new(self.accounts),
            locations: Arc::new(self.locations),
            catalog: Arc::new(self.catalog),
            coupons: Arc::new(self.coupons),
            carts: Arc::new(self.carts),
            checkout: Arc::new(self.checkout),
            orders: Arc::new(self.orders),
            invoices: Arc::new(self.invoices),
            payments: Arc::new(self.payments),
        })
    }

    /// Serve `route` as [`TEST_CUSTOMER_UUID`].
    pub(crate) fn customer_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_customer)
                .push(route),
        )
    }

    /// Serve `route` without an authenticated customer.
    pub(crate) fn public_service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_customer_uuid(TEST_CUSTOMER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// A pending cash-on-delivery order for 500 TK plus fees.
pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        customer_uuid: TEST_CUSTOMER_UUID,
        cart_uuid: CartUuid::from_uuid(Uuid::nil()),
        order_number: "ORD20260101120000123".to_string(),
        payment_method: PaymentMethod::CashOnDelivery,
        status: OrderStatus::Pending,
        subtotal: 500_00,
        discount: 0,
        shipping_charge: 40_00,
        packaging_charge: 20_00,
        total_price: 560_00,
        coupon_uuid: None,
        shipping_address_uuid: None,
        billing_address_uuid: None,
        phone_number: "01700000000".to_string(),
        ordered_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A cart line for `quantity` units of a 500 TK backpack.
pub(crate) fn make_cart_item(uuid: CartItemUuid, quantity: u64) -> CartItemRecord {
    CartItemRecord {
        uuid,
        cart_uuid: CartUuid::from_uuid(Uuid::nil()),
        product: ProductRecord {
            uuid: ProductUuid::from_uuid(Uuid::nil()),
            name: "Backpack".to_string(),
            price: 500_00,
            discounted_price: None,
            flash_sale: None,
            in_stock: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        variant: None,
        quantity,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
