//! Transaction pricing.
//!
//! Pure functions only. Given the cart, the payment method and an optional voucher, this computes the discount,
//! service charge, rounding adjustment and final total of a transaction. All arithmetic is exact (`rust_decimal`),
//! so fractional subtotals and fee rates never drift and nothing is silently truncated.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::{CartItem, PaymentMethod, Rupiah, Voucher, VoucherType},
    traits::TransactionError,
};

/// Flat part of the service charge, added for every payment method.
pub const BASE_SERVICE_CHARGE: i64 = 500;
/// Totals are rounded up to a multiple of this (via the 1000-modulus rule in [`rounding_adjustment`]).
pub const ROUNDING_UNIT: i64 = 500;

/// QRIS merchant discount rate, 0.7%
fn qris_rate() -> Decimal {
    Decimal::new(7, 3)
}

/// GoPay merchant discount rate, 2%
fn gopay_rate() -> Decimal {
    Decimal::new(2, 2)
}

/// The parts of a voucher that affect pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub voucher_type: VoucherType,
    pub value: i64,
}

impl Discount {
    pub fn percent(value: i64) -> Self {
        Self { voucher_type: VoucherType::Percent, value }
    }

    pub fn fixed(value: i64) -> Self {
        Self { voucher_type: VoucherType::Fixed, value }
    }

    /// A 100% discount also waives the service charge.
    pub fn is_complimentary(&self) -> bool {
        self.voucher_type == VoucherType::Percent && self.value == 100
    }

    pub fn amount_off(&self, sub_total: Rupiah) -> Result<Rupiah, PriceOverflow> {
        match self.voucher_type {
            VoucherType::Percent => sub_total
                .checked_mul(Decimal::from(self.value) * Decimal::new(1, 2))
                .ok_or(PriceOverflow("applying the discount")),
            VoucherType::Fixed => Ok(Rupiah::from(self.value)),
        }
    }
}

impl From<&Voucher> for Discount {
    fn from(voucher: &Voucher) -> Self {
        Self { voucher_type: voucher.voucher_type, value: voucher.discount }
    }
}

/// An amount in the price calculation grew beyond what a `Decimal` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Amount out of range while {0}")]
pub struct PriceOverflow(pub &'static str);

impl From<PriceOverflow> for TransactionError {
    fn from(e: PriceOverflow) -> Self {
        TransactionError::AmountOutOfRange(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub sub_total: Rupiah,
    pub discount: Rupiah,
    pub service_charge: Rupiah,
    pub rounding: Rupiah,
    pub total: Rupiah,
}

/// Prices a cart.
///
/// `sub_total - discount + service_charge + rounding == total` always holds for the result. Carts too large to price
/// exactly are refused with [`PriceOverflow`].
pub fn calculate_price(
    cart: &[CartItem],
    method: &PaymentMethod,
    discount: Option<&Discount>,
) -> Result<PriceBreakdown, PriceOverflow> {
    let sub_total = cart
        .iter()
        .try_fold(Rupiah::default(), |acc, item| acc.checked_add(item.sub_total))
        .ok_or(PriceOverflow("adding up the cart"))?;
    let discount_amount = match discount {
        Some(d) => d.amount_off(sub_total)?,
        None => Rupiah::default(),
    };
    let complimentary = discount.map(Discount::is_complimentary).unwrap_or(false);
    let net = sub_total.checked_sub(discount_amount).ok_or(PriceOverflow("applying the discount"))?;
    let service_charge = service_charge(net, method, complimentary);
    let before_rounding = net.checked_add(service_charge).ok_or(PriceOverflow("adding the service charge"))?;
    let rounding = rounding_adjustment(before_rounding);
    let total = before_rounding.checked_add(rounding).ok_or(PriceOverflow("rounding the total"))?;
    Ok(PriceBreakdown { sub_total, discount: discount_amount, service_charge, rounding, total })
}

/// The service charge on the discounted subtotal.
///
/// QRIS and GoPay pass on the merchant discount rate on top of the flat fee, rounded up to the next rupiah. Every
/// other method pays the flat fee only.
pub fn service_charge(net: Rupiah, method: &PaymentMethod, complimentary: bool) -> Rupiah {
    let base = Rupiah::from(BASE_SERVICE_CHARGE);
    if complimentary {
        return Rupiah::default();
    }
    match method {
        PaymentMethod::Qris => (net * qris_rate() + base).ceil(),
        PaymentMethod::Gopay => (net * gopay_rate() + base).ceil(),
        _ => base,
    }
}

/// The amount to add to `total` so that it lands on the next multiple of 500.
///
/// The remainder is taken modulo 1000 and keeps the sign of `total`. A remainder of exactly 500 needs no adjustment.
pub fn rounding_adjustment(total: Rupiah) -> Rupiah {
    let unit = Rupiah::from(ROUNDING_UNIT);
    let remainder = total % Rupiah::from(2 * ROUNDING_UNIT);
    if remainder.is_zero() {
        Rupiah::default()
    } else if remainder <= unit {
        unit - remainder
    } else {
        unit + unit - remainder
    }
}
