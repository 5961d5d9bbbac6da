//! UI events handed to the controller, and the user-facing failure texts.

use client_core::ClientError;
use shared::{
    domain::{SubscriptionFilter, SubscriptionId},
    protocol::{Credentials, SubscriptionForm},
};

use crate::ui::AuthTab;

pub const REGISTER_FAILED: &str = "Registration failed";
pub const LOGIN_FAILED: &str = "Login failed";
pub const LOAD_SUBSCRIPTIONS_FAILED: &str = "Failed to load subscriptions";
pub const ADD_SUBSCRIPTION_FAILED: &str = "Failed to add subscription";
pub const CANCEL_SUBSCRIPTION_FAILED: &str = "Failed to cancel subscription";
pub const CONFIRM_CANCEL: &str = "Are you sure you want to cancel this subscription?";
pub const SUBSCRIPTION_ADDED: &str = "Subscription added";
pub const SUBSCRIPTION_CANCELLED: &str = "Subscription cancelled";

#[derive(Debug, Clone)]
pub enum UiEvent {
    SwitchAuthTab(AuthTab),
    Register(Credentials),
    Login(Credentials),
    Logout,
    ShowSubscriptions(SubscriptionFilter),
    AddSubscription(SubscriptionForm),
    CancelSubscription(SubscriptionId),
    RefreshMonthlyCost,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::SwitchAuthTab(_) => "switch_auth_tab",
            UiEvent::Register(_) => "register",
            UiEvent::Login(_) => "login",
            UiEvent::Logout => "logout",
            UiEvent::ShowSubscriptions(_) => "show_subscriptions",
            UiEvent::AddSubscription(_) => "add_subscription",
            UiEvent::CancelSubscription(_) => "cancel_subscription",
            UiEvent::RefreshMonthlyCost => "refresh_monthly_cost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Register,
    Login,
}

impl AuthMode {
    pub fn fallback_message(self) -> &'static str {
        match self {
            AuthMode::Register => REGISTER_FAILED,
            AuthMode::Login => LOGIN_FAILED,
        }
    }
}

/// Text for the inline auth error: the server's own message when it sent
/// one, the fixed fallback otherwise.
pub fn auth_failure_text(mode: AuthMode, err: &ClientError) -> String {
    err.server_message()
        .unwrap_or_else(|| mode.fallback_message())
        .to_string()
}

pub fn alert_text(failure: &str) -> String {
    format!("Error: {failure}")
}
