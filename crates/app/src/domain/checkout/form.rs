//! Checkout form validation
//!
//! Every field is checked before anything is written, so one failed submission reports every
//! problem at once.

use std::fmt::{self, Display, Formatter};

use crate::{
    domain::{
        locations::records::{AreaUuid, CityUuid, DivisionUuid},
        orders::records::PaymentMethod,
    },
    uuids::TypedUuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    Invalid,
}

/// A rejected checkout field, named as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl FieldError {
    const fn missing(field: &'static str) -> Self {
        Self {
            field,
            problem: FieldProblem::Missing,
        }
    }

    const fn invalid(field: &'static str) -> Self {
        Self {
            field,
            problem: FieldProblem::Invalid,
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is required", self.field),
            FieldProblem::Invalid => write!(f, "{} is invalid", self.field),
        }
    }
}

/// Raw checkout submission. Every field is optional so that absence can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub phone_number: Option<String>,
    pub address_line: Option<String>,
    pub division: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub postal_code: Option<String>,

    /// `same` (the default) or `different`.
    pub billing_address_option: Option<String>,
    pub billing_address: Option<String>,
    pub billing_phone_number: Option<String>,
    pub billing_division: Option<String>,
    pub billing_city: Option<String>,
    pub billing_area: Option<String>,
    pub billing_postal_code: Option<String>,

    /// `cod` (the default) or `online`.
    pub payment_method: Option<String>,
}

/// An address with parsed location references, not yet checked against stored locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressInput {
    pub address_line: String,
    pub division: DivisionUuid,
    pub city: CityUuid,
    pub area: AreaUuid,
    pub postal_code: Option<String>,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub shipping: AddressInput,

    /// `None` when billing is the same as shipping.
    pub billing: Option<AddressInput>,

    pub payment_method: PaymentMethod,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn text(&mut self, field: &'static str, value: Option<&String>) -> Option<String> {
        let value = present(value).map(str::to_string);

        if value.is_none() {
            self.errors.push(FieldError::missing(field));
        }

        value
    }

    fn reference<T>(
        &mut self,
        field: &'static str,
        value: Option<&String>,
    ) -> Option<TypedUuid<T>> {
        let Some(value) = present(value) else {
            self.errors.push(FieldError::missing(field));
            return None;
        };

        match value.parse() {
            Ok(uuid) => Some(uuid),
            Err(_) => {
                self.errors.push(FieldError::invalid(field));
                None
            }
        }
    }
}

impl CheckoutForm {
    /// # Errors
    ///
    /// Returns every missing or malformed field, in form order.
    pub fn validate(&self) -> Result<CheckoutRequest, Vec<FieldError>> {
        let mut validator = Validator { errors: Vec::new() };

        let phone_number = validator.text("phone_number", self.phone_number.as_ref());
        let address_line = validator.text("address_line", self.address_line.as_ref());
        let division = validator.reference("division", self.division.as_ref());
        let city = validator.reference("city", self.city.as_ref());
        let area = validator.reference("area", self.area.as_ref());

        let different_billing = match present(self.billing_address_option.as_ref()) {
            None | Some("same") => false,
            Some("different") => true,
            Some(_) => {
                validator
                    .errors
                    .push(FieldError::invalid("billing_address_option"));
                false
            }
        };

        let billing = if different_billing {
            let billing_line = validator.text("billing_address", self.billing_address.as_ref());
            let billing_phone =
                validator.text("billing_phone_number", self.billing_phone_number.as_ref());
            let billing_division =
                validator.reference("billing_division", self.billing_division.as_ref());
            let billing_city = validator.reference("billing_city", self.billing_city.as_ref());
            let billing_area = validator.reference("billing_area", self.billing_area.as_ref());

            match (
                billing_line,
                billing_phone,
                billing_division,
                billing_city,
                billing_area,
            ) {
                (Some(address_line), Some(phone_number), Some(division), Some(city), Some(area)) => {
                    Some(AddressInput {
                        address_line,
                        division,
                        city,
                        area,
                        postal_code: present(self.billing_postal_code.as_ref()).map(str::to_string),
                        phone_number,
                    })
                }
                _ => None,
            }
        } else {
            None
        };

        let payment_method = match present(self.payment_method.as_ref()) {
            None => Some(PaymentMethod::CashOnDelivery),
            Some(method) => method.parse::<PaymentMethod>().ok().or_else(|| {
                validator.errors.push(FieldError::invalid("payment_method"));
                None
            }),
        };

        if !validator.errors.is_empty() {
            return Err(validator.errors);
        }

        match (phone_number, address_line, division, city, area, payment_method) {
            (
                Some(phone_number),
                Some(address_line),
                Some(division),
                Some(city),
                Some(area),
                Some(payment_method),
            ) => Ok(CheckoutRequest {
                shipping: AddressInput {
                    address_line,
                    division,
                    city,
                    area,
                    postal_code: present(self.postal_code.as_ref()).map(str::to_string),
                    phone_number,
                },
                billing,
                payment_method,
            }),
            _ => Err(validator.errors),
        }
    }
}
