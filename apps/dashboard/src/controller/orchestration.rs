//! The client controller: turns UI events into API calls and page updates.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use client_core::{ClientError, Session, SessionStore, SubscriptionApi};
use shared::{
    domain::{Subscription, SubscriptionFilter, SubscriptionId},
    protocol::{Credentials, MonthlyCost, NewSubscription, SubscriptionForm},
};
use tracing::{debug, error, info, warn};

use crate::{
    controller::events::{
        alert_text, auth_failure_text, AuthMode, UiEvent, ADD_SUBSCRIPTION_FAILED,
        CANCEL_SUBSCRIPTION_FAILED, CONFIRM_CANCEL, LOAD_SUBSCRIPTIONS_FAILED, SUBSCRIPTION_ADDED,
        SUBSCRIPTION_CANCELLED,
    },
    ui::{AuthTab, Page, Templates},
};

pub struct ClientController<P: Page> {
    api: Arc<dyn SubscriptionApi>,
    sessions: SessionStore,
    session: Option<Session>,
    page: P,
    templates: Templates,
    filter: SubscriptionFilter,
}

impl<P: Page> ClientController<P> {
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        sessions: SessionStore,
        page: P,
        templates: Templates,
    ) -> Self {
        Self {
            api,
            sessions,
            session: None,
            page,
            templates,
            filter: SubscriptionFilter::default(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[cfg(test)]
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Adopts a persisted session without touching the page.
    pub async fn restore_session(&mut self) -> Result<bool> {
        self.session = self.sessions.load().await?;
        Ok(self.session.is_some())
    }

    /// Picks the initial view from persisted state.
    pub async fn start(&mut self) -> Result<()> {
        if self.restore_session().await? {
            self.show_app().await;
        } else {
            self.page.show_auth_view();
        }
        Ok(())
    }

    pub async fn handle(&mut self, event: UiEvent) -> Result<()> {
        debug!(event = event.name(), "controller: handling ui event");
        match event {
            UiEvent::SwitchAuthTab(tab) => self.switch_auth_tab(tab),
            UiEvent::Register(credentials) => self.register(credentials).await?,
            UiEvent::Login(credentials) => self.login(credentials).await?,
            UiEvent::Logout => self.logout().await?,
            UiEvent::ShowSubscriptions(filter) => self.list_subscriptions(filter).await,
            UiEvent::AddSubscription(form) => self.add_subscription(&form).await,
            UiEvent::CancelSubscription(id) => self.cancel_subscription(&id).await,
            UiEvent::RefreshMonthlyCost => self.load_monthly_cost().await,
        }
        Ok(())
    }

    pub fn switch_auth_tab(&mut self, tab: AuthTab) {
        self.page.select_auth_tab(tab);
        self.page.set_auth_error(None);
    }

    pub async fn register(&mut self, credentials: Credentials) -> Result<()> {
        self.authenticate(AuthMode::Register, credentials).await
    }

    pub async fn login(&mut self, credentials: Credentials) -> Result<()> {
        self.authenticate(AuthMode::Login, credentials).await
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.session = None;
        self.filter = SubscriptionFilter::default();
        self.sessions.clear().await?;
        info!("auth: signed out");
        self.page.show_auth_view();
        Ok(())
    }

    pub async fn list_subscriptions(&mut self, filter: SubscriptionFilter) {
        self.filter = filter;
        self.show_loading();
        let result = fetch_subscriptions(self.api.as_ref(), self.token(), filter).await;
        self.apply_subscriptions(result);
    }

    pub async fn add_subscription(&mut self, form: &SubscriptionForm) {
        let request = match NewSubscription::try_from(form) {
            Ok(request) => request,
            Err(err) => {
                warn!("subscriptions: add rejected before sending: {err}");
                self.page.alert(&alert_text(ADD_SUBSCRIPTION_FAILED));
                return;
            }
        };

        let result = match self.token() {
            Some(token) => self.api.add_subscription(token, &request).await,
            None => Err(ClientError::NotAuthenticated),
        };

        match result {
            Ok(created) => {
                info!(
                    subscription_id = %created.subscription_id,
                    "subscriptions: added"
                );
                self.page.reset_subscription_form(today());
                self.refresh_dashboard().await;
                self.page.notify_success(SUBSCRIPTION_ADDED);
            }
            Err(err) => {
                warn!("subscriptions: add failed: {err}");
                self.page.alert(&alert_text(ADD_SUBSCRIPTION_FAILED));
            }
        }
    }

    /// Asks for confirmation first; declining sends nothing.
    pub async fn cancel_subscription(&mut self, subscription_id: &SubscriptionId) {
        if !self.page.confirm(CONFIRM_CANCEL) {
            debug!(%subscription_id, "subscriptions: cancel declined");
            return;
        }

        let result = match self.token() {
            Some(token) => self.api.cancel_subscription(token, subscription_id).await,
            None => Err(ClientError::NotAuthenticated),
        };

        match result {
            Ok(()) => {
                info!(%subscription_id, "subscriptions: cancelled");
                self.refresh_dashboard().await;
                self.page.notify_success(SUBSCRIPTION_CANCELLED);
            }
            Err(err) => {
                warn!(%subscription_id, "subscriptions: cancel failed: {err}");
                self.page.alert(&alert_text(CANCEL_SUBSCRIPTION_FAILED));
            }
        }
    }

    /// Failures are logged only; the cost display keeps its previous value.
    pub async fn load_monthly_cost(&mut self) {
        let result = fetch_monthly_cost(self.api.as_ref(), self.token()).await;
        self.apply_monthly_cost(result);
    }

    async fn authenticate(&mut self, mode: AuthMode, credentials: Credentials) -> Result<()> {
        self.page.set_auth_error(None);

        let result = match mode {
            AuthMode::Register => self.api.register(&credentials).await,
            AuthMode::Login => self.api.login(&credentials).await,
        };

        match result {
            Ok(auth) => {
                let session = Session::from(auth);
                if let Err(err) = self.sessions.save(&session).await {
                    error!(?mode, "auth: failed to persist session: {err:#}");
                    if let Err(err) = self.sessions.clear().await {
                        error!("auth: failed to roll back partial session: {err:#}");
                    }
                    self.page.set_auth_error(Some(mode.fallback_message()));
                    return Ok(());
                }
                info!(?mode, email = session.email(), "auth: signed in");
                self.session = Some(session);
                self.show_app().await;
            }
            Err(err) => {
                warn!(?mode, email = %credentials.email, "auth: rejected: {err}");
                self.page.set_auth_error(Some(&auth_failure_text(mode, &err)));
            }
        }
        Ok(())
    }

    async fn show_app(&mut self) {
        let email = self
            .session
            .as_ref()
            .map(|session| session.email().to_string())
            .unwrap_or_default();
        self.page.show_app_view(&email);
        self.refresh_dashboard().await;
    }

    /// Re-fetches the list (with the last chosen filter) and the monthly
    /// cost. The two requests run concurrently and are applied independently.
    async fn refresh_dashboard(&mut self) {
        self.show_loading();
        let api = self.api.as_ref();
        let token = self.token();
        let (subscriptions, cost) = futures::join!(
            fetch_subscriptions(api, token, self.filter),
            fetch_monthly_cost(api, token),
        );
        self.apply_subscriptions(subscriptions);
        self.apply_monthly_cost(cost);
    }

    fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    fn show_loading(&mut self) {
        match self.templates.render_loading() {
            Ok(markup) => self.page.set_list(&markup),
            Err(err) => error!("templates: failed to render loading placeholder: {err}"),
        }
    }

    fn apply_subscriptions(&mut self, result: Result<Vec<Subscription>, ClientError>) {
        let rendered = match result {
            Ok(subscriptions) => {
                debug!(count = subscriptions.len(), "subscriptions: loaded");
                self.templates.render_list(&subscriptions)
            }
            Err(err) => {
                warn!("subscriptions: load failed: {err}");
                self.templates.render_error(LOAD_SUBSCRIPTIONS_FAILED)
            }
        };

        match rendered {
            Ok(markup) => self.page.set_list(&markup),
            Err(err) => {
                error!("templates: failed to render subscription list: {err}");
                self.page.set_list(&alert_text(LOAD_SUBSCRIPTIONS_FAILED));
            }
        }
    }

    fn apply_monthly_cost(&mut self, result: Result<MonthlyCost, ClientError>) {
        match result {
            Ok(cost) => self
                .page
                .set_monthly_cost(&format!("{:.2}", cost.amount), &cost.currency),
            Err(err) => error!("Error loading monthly cost: {err}"),
        }
    }
}

async fn fetch_subscriptions(
    api: &dyn SubscriptionApi,
    token: Option<&str>,
    filter: SubscriptionFilter,
) -> Result<Vec<Subscription>, ClientError> {
    let token = token.ok_or(ClientError::NotAuthenticated)?;
    api.list_subscriptions(token, filter).await
}

async fn fetch_monthly_cost(
    api: &dyn SubscriptionApi,
    token: Option<&str>,
) -> Result<MonthlyCost, ClientError> {
    let token = token.ok_or(ClientError::NotAuthenticated)?;
    api.monthly_cost(token).await
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
