mod reference_numbers;

pub use reference_numbers::{generate_order_number, generate_payment_number};
