mod midtrans;

pub use midtrans::MidtransGateway;
