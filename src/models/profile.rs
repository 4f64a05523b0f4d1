//! Profile card model

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub full_name: String,
    pub email: String,
    pub initials: String,
    /// Masked unless the owner asked to reveal it
    pub national_id: String,
    pub balance: Decimal,
}
