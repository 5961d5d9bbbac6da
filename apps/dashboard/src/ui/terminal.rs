use std::io::{BufRead, Write};

use chrono::NaiveDate;
use tracing::debug;

use super::page::{AuthTab, Page};

/// Line-oriented page for the CLI. Confirmation prompts read one line from
/// `input` unless `assume_yes` is set.
pub struct TerminalPage<W: Write, R: BufRead> {
    out: W,
    input: R,
    assume_yes: bool,
}

impl<W: Write, R: BufRead> TerminalPage<W, R> {
    pub fn new(out: W, input: R, assume_yes: bool) -> Self {
        Self {
            out,
            input,
            assume_yes,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write, R: BufRead> Page for TerminalPage<W, R> {
    fn show_auth_view(&mut self) {
        let _ = writeln!(self.out, "Not signed in. Use `login` or `register`.");
    }

    fn show_app_view(&mut self, user_email: &str) {
        if user_email.is_empty() {
            let _ = writeln!(self.out, "Signed in.");
        } else {
            let _ = writeln!(self.out, "Signed in as {user_email}");
        }
    }

    fn select_auth_tab(&mut self, tab: AuthTab) {
        debug!(?tab, "terminal: auth tab selected");
    }

    fn set_auth_error(&mut self, message: Option<&str>) {
        if let Some(message) = message {
            let _ = writeln!(self.out, "error: {message}");
        }
    }

    fn set_list(&mut self, markup: &str) {
        let _ = writeln!(self.out, "{markup}");
    }

    fn set_monthly_cost(&mut self, amount: &str, currency: &str) {
        let _ = writeln!(self.out, "Monthly cost: {amount} {currency}");
    }

    fn reset_subscription_form(&mut self, default_payment_date: NaiveDate) {
        debug!(%default_payment_date, "terminal: form reset");
    }

    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let _ = write!(self.out, "{message} [y/N] ");
        let _ = self.out.flush();

        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn notify_success(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn page(input: &str, assume_yes: bool) -> TerminalPage<Vec<u8>, Cursor<Vec<u8>>> {
        TerminalPage::new(Vec::new(), Cursor::new(input.as_bytes().to_vec()), assume_yes)
    }

    #[test]
    fn confirm_accepts_yes_variants_only() {
        assert!(page("y\n", false).confirm("Cancel?"));
        assert!(page("YES\n", false).confirm("Cancel?"));
        assert!(!page("n\n", false).confirm("Cancel?"));
        assert!(!page("", false).confirm("Cancel?"));
    }

    #[test]
    fn assume_yes_skips_prompt() {
        let mut page = page("", true);
        assert!(page.confirm("Cancel?"));
        assert!(page.into_output().is_empty());
    }

    #[test]
    fn writes_cost_and_errors() {
        let mut page = page("", false);
        page.set_monthly_cost("12.50", "PLN");
        page.set_auth_error(None);
        page.set_auth_error(Some("Login failed"));

        let out = String::from_utf8(page.into_output()).expect("utf8");
        assert_eq!(out, "Monthly cost: 12.50 PLN\nerror: Login failed\n");
    }
}
