use crate::api::vaultpay::AccountSnapshot;
use crate::models::ProfileView;

const MASK_PREFIX: &str = "XXXX-XXXX-";
const FULL_MASK: &str = "XXXX-XXXX-XXXX";

/// Hides all but the last four characters of a national ID
pub fn mask_national_id(national_id: Option<&str>, reveal: bool) -> String {
    match national_id.filter(|id| !id.is_empty()) {
        None => {
            if reveal {
                "Not Set".to_string()
            } else {
                FULL_MASK.to_string()
            }
        }
        Some(id) if reveal => id.to_string(),
        Some(id) => {
            let chars: Vec<char> = id.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
            format!("{}{}", MASK_PREFIX, tail)
        }
    }
}

pub fn initials(first_name: &str, last_name: &str) -> String {
    let first = first_name.chars().next().unwrap_or('U');
    let last = last_name.chars().next().unwrap_or('N');
    format!("{}{}", first, last).to_uppercase()
}

pub fn build_profile(snapshot: &AccountSnapshot, reveal: bool) -> ProfileView {
    ProfileView {
        full_name: format!("{} {}", snapshot.first_name, snapshot.last_name)
            .trim()
            .to_string(),
        email: snapshot.email.clone(),
        initials: initials(&snapshot.first_name, &snapshot.last_name),
        national_id: mask_national_id(snapshot.national_id.as_deref(), reveal),
        balance: snapshot.wallet_balance,
    }
}

pub fn format_profile(view: &ProfileView) -> String {
    format!(
        "[{}] {}\n  Email:    {}\n  Aadhaar:  {}\n  Balance:  ₹{:.2}",
        view.initials, view.full_name, view.email, view.national_id, view.balance
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn snapshot(national_id: Option<&str>) -> AccountSnapshot {
        AccountSnapshot {
            id: Some(1),
            email: "asha@x.com".to_string(),
            first_name: "asha".to_string(),
            last_name: "Nair".to_string(),
            wallet_balance: Decimal::new(100000, 2),
            national_id: national_id.map(str::to_string),
            phone_number: None,
            created_at: None,
        }
    }

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask_national_id(Some("1234-5678-9012"), false), "XXXX-XXXX-9012");
        assert_eq!(mask_national_id(Some("123456789012"), false), "XXXX-XXXX-9012");
    }

    #[test]
    fn test_reveal_shows_value_verbatim() {
        assert_eq!(mask_national_id(Some("1234-5678-9012"), true), "1234-5678-9012");
    }

    #[test]
    fn test_missing_id() {
        assert_eq!(mask_national_id(None, false), "XXXX-XXXX-XXXX");
        assert_eq!(mask_national_id(Some(""), false), "XXXX-XXXX-XXXX");
        assert_eq!(mask_national_id(None, true), "Not Set");
    }

    #[test]
    fn test_short_id_does_not_panic() {
        assert_eq!(mask_national_id(Some("12"), false), "XXXX-XXXX-12");
    }

    #[test]
    fn test_initials_default() {
        assert_eq!(initials("", ""), "UN");
        assert_eq!(initials("asha", "nair"), "AN");
    }

    #[test]
    fn test_build_profile() {
        let view = build_profile(&snapshot(Some("123456789012")), false);
        assert_eq!(view.full_name, "asha Nair");
        assert_eq!(view.initials, "AN");
        assert_eq!(view.national_id, "XXXX-XXXX-9012");

        let rendered = format_profile(&view);
        assert!(rendered.contains("₹1000.00"));
        assert!(!rendered.contains("123456789012"));
    }
}
