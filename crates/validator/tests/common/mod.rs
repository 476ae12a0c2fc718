//! Shared test doubles.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rulebook_validator::prelude::*;

/// Installs a test-writer subscriber once so pipeline logs show up on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// One recorded `make` call.
#[derive(Debug, Clone)]
pub struct Call {
    pub attributes: Attributes,
    pub rules: RuleMap,
}

/// Backend returning a fixed verdict and recording what it was asked.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    verdict: Verdict,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl RecordingBackend {
    pub fn passing() -> Self {
        Self::with(Verdict::pass())
    }

    pub fn failing(messages: MessageBag) -> Self {
        Self::with(Verdict::fail(messages))
    }

    pub fn with(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: Rc::default(),
        }
    }

    /// Handle onto the recorded calls, usable after the backend moved.
    pub fn calls(&self) -> Rc<RefCell<Vec<Call>>> {
        Rc::clone(&self.calls)
    }
}

impl Backend for RecordingBackend {
    type Check = Verdict;

    fn make(&self, attributes: &Attributes, rules: &RuleMap) -> Verdict {
        self.calls.borrow_mut().push(Call {
            attributes: attributes.clone(),
            rules: rules.clone(),
        });
        self.verdict.clone()
    }
}

/// Rules shaped like a typical model validator.
pub struct StubRules;

impl StubRules {
    fn create_rules(&self) -> RuleMap {
        rule_map! {
            "foo" => ["foo"],
            "bar" => ["baz"],
        }
    }

    fn dynamic_rules(&self) -> RuleMap {
        rule_map! { "baz" => ["foo:<table>", "bar:<key>"] }
    }

    fn input_rules(&self) -> RuleMap {
        rule_map! { "foo" => ["bar:[input]"] }
    }
}

impl RuleProvider for StubRules {
    fn common_rules(&self) -> RuleMap {
        rule_map! { "foo" => ["bar"] }
    }

    fn register_actions(actions: &mut ActionRegistry<Self>) {
        actions
            .register("create", Self::create_rules)
            .register("dynamic", Self::dynamic_rules)
            .register("input", Self::input_rules);
    }

    fn prepare_rules(&self, mut rules: RuleMap, attributes: &Attributes) -> RuleMap {
        if attributes.contains_key("prepareme") {
            rules.push("prepared", "accepted");
        }
        rules
    }
}

/// Field/rules pairs in order, for order-sensitive assertions.
pub fn ordered(rules: &RuleMap) -> Vec<(String, Vec<Rule>)> {
    rules
        .iter()
        .map(|(field, rules)| (field.to_owned(), rules.to_vec()))
        .collect()
}
