use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
pub use resto_common::Rupiah;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------   TransactionStatus   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting payment confirmation from the gateway.
    #[default]
    Pending,
    /// Paid in full (cash, fully discounted, or settled by the gateway).
    Completed,
    /// Denied, cancelled, expired or otherwise failed at the gateway.
    Failed,
    /// Card payment flagged by the gateway's fraud detection for manual review.
    Challenge,
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
            TransactionStatus::Challenge => write!(f, "challenge"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "challenge" => Ok(Self::Challenge),
            s => Err(ConversionError(format!("Invalid transaction status: {s}"))),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid transaction status: {value}. But this conversion cannot fail. Defaulting to pending");
            TransactionStatus::Pending
        })
    }
}

//--------------------------------------    TransactionType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Online,
    Offline,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Online => write!(f, "online"),
            TransactionType::Offline => write!(f, "offline"),
        }
    }
}

//--------------------------------------     PaymentMethod     ---------------------------------------------------------
/// How the customer is paying. Methods other than the ones the pricing rules care about are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Qris,
    Gopay,
    Other(String),
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "cash" => Self::Cash,
            "qris" => Self::Qris,
            "gopay" => Self::Gopay,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.to_string()
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Qris => write!(f, "qris"),
            PaymentMethod::Gopay => write!(f, "gopay"),
            PaymentMethod::Other(s) => write!(f, "{s}"),
        }
    }
}

//--------------------------------------     PaymentNumber     ---------------------------------------------------------
/// The payment reference number. This is the `order_id` the payment gateway knows the transaction by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct PaymentNumber(pub String);

impl PaymentNumber {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PaymentNumber {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl Display for PaymentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      Transaction      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    /// The human-readable order number printed on receipts
    pub number: String,
    pub payment_number: PaymentNumber,
    pub transaction_type: TransactionType,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub additional_note: Option<String>,
    pub sub_total: Rupiah,
    pub discount: Rupiah,
    pub service_charge: Rupiah,
    pub rounding: Rupiah,
    pub total: Rupiah,
    pub status: TransactionStatus,
    /// The raw fraud status reported by the gateway, if any
    pub fraud_status: Option<String>,
    pub voucher_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     NewTransaction    ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub number: String,
    pub payment_number: PaymentNumber,
    pub transaction_type: TransactionType,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub additional_note: Option<String>,
    pub sub_total: Rupiah,
    pub discount: Rupiah,
    pub service_charge: Rupiah,
    pub rounding: Rupiah,
    pub total: Rupiah,
    pub status: TransactionStatus,
    /// If set, the voucher is redeemed atomically with the insert.
    pub voucher_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      VoucherType      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// `discount` is a percentage of the cart subtotal
    Percent,
    /// `discount` is a flat amount in rupiah
    Fixed,
}

impl Display for VoucherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoucherType::Percent => write!(f, "percent"),
            VoucherType::Fixed => write!(f, "fixed"),
        }
    }
}

//--------------------------------------        Voucher        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    pub discount: i64,
    /// Number of times this voucher has been redeemed
    pub amount: i64,
    /// Redemption cap
    pub max_amount: i64,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Voucher {
    /// A 100% percentage voucher (the "employee meal" voucher). These may only be used once per day.
    pub fn is_complimentary(&self) -> bool {
        self.voucher_type == VoucherType::Percent && self.discount == 100
    }

    pub fn is_exhausted(&self) -> bool {
        self.amount + 1 > self.max_amount
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at < now
    }
}

//--------------------------------------       NewVoucher      ---------------------------------------------------------
/// The editable fields of a voucher. Used for both creating and updating vouchers; the redemption count is never set
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoucher {
    pub name: String,
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    pub discount: i64,
    pub max_amount: i64,
    pub expired_at: DateTime<Utc>,
}

//--------------------------------------    VoucherUsageLog    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherUsageLog {
    pub id: i64,
    pub voucher_id: i64,
    pub transaction_id: i64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------        CartItem       ---------------------------------------------------------
/// A single line on the customer's order. `sub_total` is supplied by the caller and is not recomputed from
/// `quantity * price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub item_name: String,
    pub quantity: i64,
    pub price: Rupiah,
    pub sub_total: Rupiah,
}
