pub mod company;
pub mod introduction;
pub mod professional;
