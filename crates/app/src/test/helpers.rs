//! Test Helpers

use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

use crate::{
    accounts::{AccountsService, AccountsServiceError, data::NewCustomer, records::CustomerUuid},
    domain::{
        carts::{CartsService, data::NewCartItem},
        catalog::{
            CatalogService, CatalogServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
            variants::VariantAttributes,
        },
        checkout::{CheckoutService, form::CheckoutForm},
        coupons::{
            data::NewCoupon,
            records::{CouponDiscount, CouponUuid},
        },
        locations::{
            LocationsService, LocationsServiceError,
            records::{AreaRecord, AreaUuid, CityRecord, CityUuid, DivisionRecord, DivisionUuid},
        },
        orders::records::{OrderRecord, PaymentMethod},
    },
    test::TestContext,
};

pub(crate) async fn create_customer(
    ctx: &TestContext,
    email: &str,
) -> Result<CustomerUuid, AccountsServiceError> {
    let customer = ctx
        .accounts
        .register_customer(NewCustomer {
            uuid: CustomerUuid::new(),
            name: "Test Customer".to_string(),
            email: email.to_string(),
            phone_number: None,
        })
        .await?;

    Ok(customer.uuid)
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
) -> Result<ProductRecord, CatalogServiceError> {
    ctx.catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            price,
            discounted_price: None,
            flash_sale: None,
            in_stock: true,
        })
        .await
}

fn coupon(code: &str, discount: CouponDiscount) -> NewCoupon {
    let now = Timestamp::now();

    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        discount: Some(discount),
        valid_from: now - SignedDuration::from_hours(24),
        valid_to: now + SignedDuration::from_hours(24 * 30),
        max_uses: 0,
        minimum_purchase_amount: None,
    }
}

/// Unlimited coupon taking `amount` off, valid from yesterday for thirty days.
pub(crate) fn fixed_coupon(code: &str, amount: u64) -> NewCoupon {
    coupon(code, CouponDiscount::FixedAmount(amount))
}

pub(crate) fn percentage_coupon(code: &str, percent: u8) -> NewCoupon {
    coupon(code, CouponDiscount::Percentage(percent))
}

pub(crate) fn single_use(coupon: NewCoupon) -> NewCoupon {
    NewCoupon {
        max_uses: 1,
        ..coupon
    }
}

pub(crate) struct TestLocations {
    pub division: DivisionRecord,
    pub city: CityRecord,
    pub area: AreaRecord,
}

/// Dhaka division, Dhaka City, Mirpur.
pub(crate) async fn create_locations(
    ctx: &TestContext,
) -> Result<TestLocations, LocationsServiceError> {
    let division = ctx
        .locations
        .create_division(DivisionUuid::new(), "Dhaka")
        .await?;
    let city = ctx
        .locations
        .create_city(CityUuid::new(), division.uuid, "Dhaka City")
        .await?;
    let area = ctx
        .locations
        .create_area(AreaUuid::new(), city.uuid, "Mirpur")
        .await?;

    Ok(TestLocations {
        division,
        city,
        area,
    })
}

/// A complete cash-on-delivery form shipping and billing to `locations`.
pub(crate) fn checkout_form(locations: &TestLocations) -> CheckoutForm {
    CheckoutForm {
        phone_number: Some("01700000000".to_string()),
        address_line: Some("House 12, Road 5".to_string()),
        division: Some(locations.division.uuid.to_string()),
        city: Some(locations.city.uuid.to_string()),
        area: Some(locations.area.uuid.to_string()),
        postal_code: Some("1216".to_string()),
        ..CheckoutForm::default()
    }
}

/// A registered customer with one pending cash-on-delivery order for a single 500 TK item.
pub(crate) async fn place_order(
    ctx: &TestContext,
    email: &str,
) -> TestResult<(CustomerUuid, OrderRecord)> {
    place_order_with(ctx, email, PaymentMethod::CashOnDelivery).await
}

pub(crate) async fn place_order_with(
    ctx: &TestContext,
    email: &str,
    payment_method: PaymentMethod,
) -> TestResult<(CustomerUuid, OrderRecord)> {
    let customer = create_customer(ctx, email).await?;
    let locations = create_locations(ctx).await?;
    let product = create_product(ctx, "Backpack", 500_00).await?;

    ctx.carts
        .add_item(
            customer,
            NewCartItem {
                product_uuid: product.uuid,
                quantity: 1,
                selection: VariantAttributes::default(),
            },
        )
        .await?;

    let form = CheckoutForm {
        payment_method: Some(payment_method.as_str().to_string()),
        ..checkout_form(&locations)
    };

    let order = ctx
        .checkout
        .checkout(customer, form, Timestamp::now())
        .await?;

    Ok((customer, order))
}
