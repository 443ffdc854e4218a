// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::{ObjectID, SuiAddress};
use crate::config::NetworkVariables;
use crate::execution::{LedgerReader, TransactionExecutor};
use crate::journal::{CreateState, JournalCreator};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLabel {
    Spinner,
    DeployContractFirst,
    CreateJournal,
}

impl Display for ButtonLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ButtonLabel::Spinner => write!(f, "..."),
            ButtonLabel::DeployContractFirst => write!(f, "Deploy Contract First"),
            ButtonLabel::CreateJournal => write!(f, "Create Journal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub disabled: bool,
    pub label: ButtonLabel,
}

/// Control state of the "new journal" form.
#[derive(Debug, Clone)]
pub struct CreateJournalForm {
    title: String,
    package_configured: bool,
    state: CreateState,
    notice: Option<String>,
}

impl CreateJournalForm {
    pub fn new(network: &NetworkVariables) -> Self {
        Self {
            title: String::new(),
            package_configured: network.is_configured(),
            state: CreateState::Idle,
            notice: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn state(&self) -> CreateState {
        self.state
    }

    /// Message left by the last failed attempt, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Mirror a state published by the creator.
    pub fn observe(&mut self, state: CreateState) {
        self.state = state;
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_pending()
            && self.state != CreateState::Succeeded
            && !self.title.trim().is_empty()
            && self.package_configured
    }

    pub fn button(&self) -> ButtonView {
        let label = if self.state.is_pending() || self.state == CreateState::Succeeded {
            ButtonLabel::Spinner
        } else if !self.package_configured {
            ButtonLabel::DeployContractFirst
        } else {
            ButtonLabel::CreateJournal
        };
        ButtonView {
            disabled: !self.can_submit(),
            label,
        }
    }

    /// Run one attempt with the current title. Returns `false` when the form
    /// is not in a submittable state and nothing was attempted.
    pub async fn submit<E, L, F>(
        &mut self,
        creator: &JournalCreator<E, L>,
        account: Option<&SuiAddress>,
        on_created: F,
    ) -> bool
    where
        E: TransactionExecutor,
        L: LedgerReader,
        F: FnOnce(ObjectID),
    {
        if !self.can_submit() {
            return false;
        }
        self.notice = None;
        self.state = CreateState::Building;
        let report = creator.create(&self.title, account).await;
        self.state = report.final_state().unwrap_or(CreateState::Idle);
        self.notice = report.result.report(on_created);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{ScriptedExecutor, ScriptedLedger};
    use crate::metrics::JournalMetrics;
    use std::time::Duration;

    fn network() -> NetworkVariables {
        NetworkVariables::new("http://127.0.0.1:9000").with_journal_package_id("0xpkg")
    }

    fn creator(
        digests: &[&str],
        ledger: ScriptedLedger,
    ) -> JournalCreator<ScriptedExecutor, ScriptedLedger> {
        JournalCreator::new(
            ScriptedExecutor::with_digests(digests),
            ledger,
            network(),
            Duration::from_secs(60),
            JournalMetrics::new_for_tests(),
        )
    }

    #[test]
    fn button_requires_title() {
        let mut form = CreateJournalForm::new(&network());
        assert_eq!(
            form.button(),
            ButtonView {
                disabled: true,
                label: ButtonLabel::CreateJournal
            }
        );
        form.set_title("   ");
        assert!(form.button().disabled);
        form.set_title("My Diary");
        assert!(!form.button().disabled);
    }

    #[test]
    fn button_when_unconfigured() {
        let mut form = CreateJournalForm::new(&NetworkVariables::new("http://127.0.0.1:9000"));
        form.set_title("My Diary");
        let button = form.button();
        assert!(button.disabled);
        assert_eq!(button.label, ButtonLabel::DeployContractFirst);
        assert_eq!(button.label.to_string(), "Deploy Contract First");
    }

    #[test]
    fn button_while_pending() {
        let mut form = CreateJournalForm::new(&network());
        form.set_title("My Diary");
        for state in [
            CreateState::Building,
            CreateState::Submitted,
            CreateState::Confirming,
        ] {
            form.observe(state);
            assert_eq!(
                form.button(),
                ButtonView {
                    disabled: true,
                    label: ButtonLabel::Spinner
                }
            );
        }
    }

    #[tokio::test]
    async fn submit_success_locks_form() {
        let creator = creator(&["d1"], ScriptedLedger::new().created("d1", &["0xobj1"]));
        let mut form = CreateJournalForm::new(creator.network());
        form.set_title("My Diary");

        let mut created = None;
        let account = SuiAddress::new("0xuser1");
        assert!(form.submit(&creator, Some(&account), |id| created = Some(id)).await);
        assert_eq!(created, Some(ObjectID::new("0xobj1")));
        assert_eq!(form.state(), CreateState::Succeeded);
        assert_eq!(form.notice(), None);
        assert!(form.button().disabled);

        assert!(!form.submit(&creator, Some(&account), |_| ()).await);
    }

    #[tokio::test]
    async fn submit_failure_allows_retry() {
        let creator = creator(&["d1"], ScriptedLedger::new().created("d1", &[]));
        let mut form = CreateJournalForm::new(creator.network());
        form.set_title("My Diary");

        let mut called = false;
        assert!(form.submit(&creator, Some(&SuiAddress::new("0xuser1")), |_| called = true).await);
        assert!(!called);
        assert_eq!(form.state(), CreateState::Failed);
        assert_eq!(form.notice(), Some("Failed to get journal ID from transaction"));
        assert_eq!(form.title(), "My Diary");
        assert!(!form.button().disabled);
    }
}
