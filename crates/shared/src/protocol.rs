use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{BillingCycle, CurrentUser, UserId},
    error::FormError,
};

/// Body of both `/auth/register` and `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
}

impl AuthResponse {
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            user_id: Some(self.user_id.clone()),
            email: Some(self.email.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub next_payment_date: NaiveDate,
    pub auto_renewal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCost {
    pub amount: f64,
    pub currency: String,
}

/// Raw values of the "add subscription" form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionForm {
    pub name: String,
    pub price: String,
    pub currency: String,
    pub billing_cycle: String,
    pub next_payment_date: String,
    pub auto_renewal: bool,
}

impl TryFrom<&SubscriptionForm> for NewSubscription {
    type Error = FormError;

    fn try_from(form: &SubscriptionForm) -> Result<Self, Self::Error> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }

        let price = form
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| FormError::InvalidPrice(form.price.clone()))?;

        let currency = form.currency.trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(FormError::EmptyCurrency);
        }

        let billing_cycle = form.billing_cycle.parse::<BillingCycle>()?;
        let next_payment_date =
            NaiveDate::parse_from_str(form.next_payment_date.trim(), "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDate(form.next_payment_date.clone()))?;

        Ok(Self {
            name: name.to_string(),
            price,
            currency,
            billing_cycle,
            next_payment_date,
            auto_renewal: form.auto_renewal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SubscriptionForm {
        SubscriptionForm {
            name: " Spotify ".into(),
            price: "19.99".into(),
            currency: "pln".into(),
            billing_cycle: "monthly".into(),
            next_payment_date: "2025-04-01".into(),
            auto_renewal: true,
        }
    }

    #[test]
    fn valid_form_becomes_request() {
        let request = NewSubscription::try_from(&form()).expect("valid form");
        assert_eq!(request.name, "Spotify");
        assert_eq!(request.currency, "PLN");
        assert_eq!(request.billing_cycle, BillingCycle::Monthly);

        let json = serde_json::to_value(&request).expect("encode");
        assert_eq!(json["billingCycle"], "MONTHLY");
        assert_eq!(json["nextPaymentDate"], "2025-04-01");
        assert_eq!(json["autoRenewal"], true);
    }

    #[test]
    fn rejects_blank_name_and_bad_price() {
        let mut blank = form();
        blank.name = "   ".into();
        assert_eq!(NewSubscription::try_from(&blank), Err(FormError::EmptyName));

        let mut negative = form();
        negative.price = "-3".into();
        assert!(matches!(
            NewSubscription::try_from(&negative),
            Err(FormError::InvalidPrice(_))
        ));

        let mut nan = form();
        nan.price = "abc".into();
        assert!(matches!(
            NewSubscription::try_from(&nan),
            Err(FormError::InvalidPrice(_))
        ));
    }

    #[test]
    fn rejects_malformed_date() {
        let mut bad = form();
        bad.next_payment_date = "01/04/2025".into();
        assert!(matches!(
            NewSubscription::try_from(&bad),
            Err(FormError::InvalidDate(_))
        ));
    }

    #[test]
    fn auth_response_uses_camel_case() {
        let raw = r#"{"token":"t-1","userId":"u-9","email":"a@b.c"}"#;
        let auth: AuthResponse = serde_json::from_str(raw).expect("decode");
        let user = auth.current_user();
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
        assert_eq!(user.user_id, Some(UserId::from("u-9")));
    }
}
