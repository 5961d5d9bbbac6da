//! The view surface the controller drives. Implementations own all
//! presentation; the controller only hands them text and markup.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Register,
}

pub trait Page {
    fn show_auth_view(&mut self);
    fn show_app_view(&mut self, user_email: &str);
    fn select_auth_tab(&mut self, tab: AuthTab);
    /// `None` clears the inline error on the auth forms.
    fn set_auth_error(&mut self, message: Option<&str>);
    /// Replaces the contents of the subscription list container.
    fn set_list(&mut self, markup: &str);
    fn set_monthly_cost(&mut self, amount: &str, currency: &str);
    fn reset_subscription_form(&mut self, default_payment_date: NaiveDate);
    /// Blocking notification.
    fn alert(&mut self, message: &str);
    fn confirm(&mut self, message: &str) -> bool;
    fn notify_success(&mut self, message: &str);
}
