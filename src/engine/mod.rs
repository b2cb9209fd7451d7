pub mod intake;
pub mod pricing;
