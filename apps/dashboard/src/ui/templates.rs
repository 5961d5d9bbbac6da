//! List markup rendered through minijinja. `.html` templates auto-escape
//! every interpolated value; `.txt` templates are used by the terminal.

use minijinja::{context, Environment, Error};
use serde::Serialize;
use shared::domain::Subscription;

const LIST_HTML: &str = r#"{% for sub in subscriptions %}
<div class="subscription-item{% if not sub.active %} cancelled{% endif %}">
  <div class="subscription-info">
    <div class="subscription-name">{{ sub.name }}</div>
    <div class="subscription-details">
      <span>{{ sub.price }} {{ sub.currency }}</span>
      <span>{{ sub.next_payment }}</span>
      <span>{{ sub.billing_cycle }}</span>
      <span class="status-badge status-{{ sub.status_class }}">{{ sub.status_label }}</span>
    </div>
  </div>
  <div class="subscription-actions">
    {% if sub.active %}<button class="btn btn-danger" data-action="cancel" data-subscription-id="{{ sub.id }}">Cancel</button>{% endif %}
  </div>
</div>
{% else %}
<div class="loading">{{ empty_message }}</div>
{% endfor %}"#;

const LOADING_HTML: &str = r#"<div class="loading">{{ message }}</div>"#;
const ERROR_HTML: &str = r#"<div class="error-message show">Error: {{ message }}</div>"#;

const LIST_TXT: &str = r#"{% for sub in subscriptions %}
[{{ sub.status_label }}] {{ sub.name }} ({{ sub.id }})
    {{ sub.price }} {{ sub.currency }} / {{ sub.billing_cycle }}, next payment {{ sub.next_payment }}{% if sub.auto_renewal %}, auto-renewal{% endif %}

{% else %}
{{ empty_message }}
{% endfor %}"#;

const LOADING_TXT: &str = "{{ message }}";
const ERROR_TXT: &str = "Error: {{ message }}";

pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_LIST_MESSAGE: &str = "No subscriptions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupFlavor {
    Html,
    Text,
}

impl MarkupFlavor {
    fn extension(self) -> &'static str {
        match self {
            MarkupFlavor::Html => "html",
            MarkupFlavor::Text => "txt",
        }
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionRow {
    id: String,
    name: String,
    price: String,
    currency: String,
    billing_cycle: &'static str,
    next_payment: String,
    auto_renewal: bool,
    active: bool,
    status_class: String,
    status_label: &'static str,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: sub.subscription_id.0.clone(),
            name: sub.name.clone(),
            price: format!("{:.2}", sub.price),
            currency: sub.currency.clone(),
            billing_cycle: sub.billing_cycle.as_str(),
            next_payment: format_payment_date(sub),
            auto_renewal: sub.auto_renewal,
            active: sub.status.is_active(),
            status_class: sub.status.label().to_ascii_lowercase(),
            status_label: sub.status.label(),
        }
    }
}

fn format_payment_date(sub: &Subscription) -> String {
    sub.next_payment_date.format("%-d %B %Y").to_string()
}

pub struct Templates {
    env: Environment<'static>,
    flavor: MarkupFlavor,
}

impl Templates {
    pub fn new(flavor: MarkupFlavor) -> Result<Self, Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_template("list.html", LIST_HTML)?;
        env.add_template("loading.html", LOADING_HTML)?;
        env.add_template("error.html", ERROR_HTML)?;
        env.add_template("list.txt", LIST_TXT)?;
        env.add_template("loading.txt", LOADING_TXT)?;
        env.add_template("error.txt", ERROR_TXT)?;

        Ok(Self { env, flavor })
    }

    pub fn html() -> Result<Self, Error> {
        Self::new(MarkupFlavor::Html)
    }

    pub fn text() -> Result<Self, Error> {
        Self::new(MarkupFlavor::Text)
    }

    pub fn render_list(&self, subscriptions: &[Subscription]) -> Result<String, Error> {
        let rows: Vec<SubscriptionRow> = subscriptions.iter().map(SubscriptionRow::from).collect();
        self.render(
            "list",
            context! { subscriptions => rows, empty_message => EMPTY_LIST_MESSAGE },
        )
    }

    pub fn render_loading(&self) -> Result<String, Error> {
        self.render("loading", context! { message => LOADING_MESSAGE })
    }

    pub fn render_error(&self, message: &str) -> Result<String, Error> {
        self.render("error", context! { message => message })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, Error> {
        let name = format!("{name}.{}", self.flavor.extension());
        let rendered = self.env.get_template(&name)?.render(ctx)?;
        Ok(rendered.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::domain::{BillingCycle, SubscriptionId, SubscriptionStatus};

    fn subscription(name: &str, status: SubscriptionStatus) -> Subscription {
        Subscription {
            subscription_id: SubscriptionId::from("s-1"),
            user_id: None,
            name: name.to_string(),
            price: 43.0,
            currency: "PLN".to_string(),
            billing_cycle: BillingCycle::Monthly,
            next_payment_date: NaiveDate::from_ymd_opt(2025, 3, 5).expect("date"),
            auto_renewal: true,
            status,
        }
    }

    #[test]
    fn html_list_escapes_names() {
        let templates = Templates::html().expect("templates");
        let markup = templates
            .render_list(&[subscription("<script>x</script>", SubscriptionStatus::Active)])
            .expect("render");

        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn html_list_shows_cancel_only_for_active() {
        let templates = Templates::html().expect("templates");
        let active = templates
            .render_list(&[subscription("Netflix", SubscriptionStatus::Active)])
            .expect("render");
        let cancelled = templates
            .render_list(&[subscription("Gym", SubscriptionStatus::Cancelled)])
            .expect("render");

        assert!(active.contains("data-subscription-id=\"s-1\""));
        assert!(active.contains("43.00 PLN"));
        assert!(active.contains("5 March 2025"));
        assert!(!cancelled.contains("data-action=\"cancel\""));
        assert!(cancelled.contains("subscription-item cancelled"));
        assert!(cancelled.contains("status-cancelled"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let html = Templates::html().expect("templates");
        assert_eq!(
            html.render_list(&[]).expect("render"),
            "<div class=\"loading\">No subscriptions</div>"
        );

        let text = Templates::text().expect("templates");
        assert_eq!(text.render_list(&[]).expect("render"), EMPTY_LIST_MESSAGE);
    }

    #[test]
    fn text_templates_do_not_escape() {
        let text = Templates::text().expect("templates");
        let markup = text
            .render_list(&[subscription("Tom & Jerry", SubscriptionStatus::Active)])
            .expect("render");
        assert!(markup.contains("[Active] Tom & Jerry (s-1)"));
        assert!(markup.contains("auto-renewal"));
    }

    #[test]
    fn error_markup_escapes_message() {
        let html = Templates::html().expect("templates");
        let markup = html.render_error("<b>down</b>").expect("render");
        assert!(markup.starts_with("<div class=\"error-message show\">Error: &lt;b&gt;down"));
        assert!(!markup.contains("<b>"));
    }
}
