//! Labeled choices presented through the host.
//!
//! A [`Choices`] request collects a prompt, a list of options, actions bound
//! to options (or to cancellation) and, for value-yielding choices, a value
//! producer per outcome. Running it makes exactly one call to the host's
//! choice capability, then runs every action bound to the outcome in
//! registration order.
//!
//! ```
//! # use std::rc::Rc;
//! # use st_core::{HeadlessHost, Session};
//! use st_engine::Choices;
//!
//! # fn ask(session: &Session) -> st_core::StoryResult<u32> {
//! let mut choices = Choices::new("How many coins do you offer?").with_title("Ferryman");
//! let one = choices.choice("One");
//! let two = choices.choice("Two");
//! choices.yields(one, || Ok(1));
//! choices.yields(two, || Ok(2));
//! choices.resolve(session)
//! # }
//! # let session = Session::new(Rc::new(HeadlessHost));
//! # assert!(ask(&session).is_err());
//! ```

use std::fmt;

use st_core::{
    ChoiceIcon, ChoiceOption, ChoiceOutcome, ChoicePrompt, HostError, Session, StoryError,
    StoryResult,
};

/// Identifies an option within one [`Choices`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChoiceKey(usize);

impl ChoiceKey {
    /// Position of the option in the prompt.
    pub fn index(self) -> usize {
        self.0
    }
}

type Action<'a> = Box<dyn FnOnce() -> StoryResult<()> + 'a>;
type Yield<'a, T> = Box<dyn FnOnce() -> StoryResult<T> + 'a>;

/// A choice request, optionally yielding a value of type `T`.
///
/// Actions and yields are bound to `Some(key)` for an option or `None` for
/// cancellation.
pub struct Choices<'a, T = ()> {
    cancellable: bool,
    icon: Option<ChoiceIcon>,
    title: Option<String>,
    text: String,
    options: Vec<ChoiceOption>,
    actions: Vec<(Option<ChoiceKey>, Action<'a>)>,
    yields: Vec<(Option<ChoiceKey>, Yield<'a, T>)>,
}

impl<'a, T> Choices<'a, T> {
    /// Start a request with the given prompt text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            cancellable: false,
            icon: None,
            title: None,
            text: text.into(),
            options: Vec::new(),
            actions: Vec::new(),
            yields: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: ChoiceIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Allow the player to dismiss the prompt.
    pub fn cancellable(mut self) -> Self {
        self.cancellable = true;
        self
    }

    /// Add an option.
    pub fn add_option(&mut self, option: ChoiceOption) -> ChoiceKey {
        self.options.push(option);
        ChoiceKey(self.options.len() - 1)
    }

    /// Add an option with a plain label.
    pub fn choice(&mut self, label: impl Into<String>) -> ChoiceKey {
        self.add_option(ChoiceOption::new(label))
    }

    /// Run `action` when `key` is chosen.
    pub fn on(&mut self, key: ChoiceKey, action: impl FnOnce() -> StoryResult<()> + 'a) {
        self.actions.push((Some(key), Box::new(action)));
    }

    /// Run `action` when the prompt is dismissed.
    pub fn on_cancel(&mut self, action: impl FnOnce() -> StoryResult<()> + 'a) {
        self.actions.push((None, Box::new(action)));
    }

    /// Produce the result with `value` when `key` is chosen.
    pub fn yields(&mut self, key: ChoiceKey, value: impl FnOnce() -> StoryResult<T> + 'a) {
        self.yields.push((Some(key), Box::new(value)));
    }

    /// Produce the result with `value` when the prompt is dismissed.
    pub fn yield_if_cancelled(&mut self, value: impl FnOnce() -> StoryResult<T> + 'a) {
        self.yields.push((None, Box::new(value)));
    }

    /// The options declared so far.
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Present the prompt and run the matching actions.
    ///
    /// Returns the outcome. Yield producers are not consulted.
    pub fn run(mut self, session: &Session) -> StoryResult<ChoiceOutcome> {
        let outcome = self.present(session)?;
        self.run_actions(outcome)?;
        Ok(outcome)
    }

    /// Present the prompt, run the matching actions and produce the value
    /// bound to the outcome.
    ///
    /// Fails with [`StoryError::MissingYieldMapping`] when no value producer
    /// is bound to the outcome.
    pub fn resolve(mut self, session: &Session) -> StoryResult<T> {
        let outcome = self.present(session)?;
        self.run_actions(outcome)?;

        let marker = marker_of(outcome);
        let position = self.yields.iter().position(|(key, _)| *key == marker);
        match position {
            Some(position) => {
                let (_, value) = self.yields.swap_remove(position);
                value()
            }
            None => Err(StoryError::MissingYieldMapping(
                marker.map(|key| self.options[key.0].label.clone()),
            )),
        }
    }

    fn present(&self, session: &Session) -> StoryResult<ChoiceOutcome> {
        let host = session.choices()?;
        let prompt = ChoicePrompt {
            cancellable: self.cancellable,
            icon: self.icon.as_ref(),
            title: self.title.as_deref(),
            text: &self.text,
            options: &self.options,
        };
        let outcome = host.present_choice(&prompt)?;
        if let ChoiceOutcome::Chosen(index) = outcome {
            self.options
                .get(index)
                .ok_or(HostError::InvalidChoice(index))?;
        }
        tracing::debug!(prompt = %self.text, ?outcome, "choice answered");
        Ok(outcome)
    }

    fn run_actions(&mut self, outcome: ChoiceOutcome) -> StoryResult<()> {
        let marker = marker_of(outcome);
        let actions = std::mem::take(&mut self.actions);
        for (key, action) in actions {
            if key == marker {
                action()?;
            }
        }
        Ok(())
    }
}

fn marker_of(outcome: ChoiceOutcome) -> Option<ChoiceKey> {
    match outcome {
        ChoiceOutcome::Chosen(index) => Some(ChoiceKey(index)),
        ChoiceOutcome::Cancelled => None,
    }
}

impl<T> fmt::Debug for Choices<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choices")
            .field("cancellable", &self.cancellable)
            .field("icon", &self.icon)
            .field("title", &self.title)
            .field("text", &self.text)
            .field("options", &self.options)
            .field("actions", &self.actions.len())
            .field("yields", &self.yields.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use st_core::{ChoiceCapability, Host};

    use super::*;

    /// Answers prompts from a queue and records what it was shown.
    #[derive(Default)]
    struct ScriptedHost {
        answers: RefCell<VecDeque<StoryResult<ChoiceOutcome>>>,
        shown: RefCell<Vec<(bool, Option<String>, String, Vec<String>)>>,
    }

    impl ScriptedHost {
        fn answering(answers: impl IntoIterator<Item = ChoiceOutcome>) -> Rc<Self> {
            Rc::new(Self {
                answers: RefCell::new(answers.into_iter().map(Ok).collect()),
                shown: RefCell::default(),
            })
        }
    }

    impl Host for ScriptedHost {
        fn warn(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
        fn close_story(&self) -> StoryResult<()> {
            Err(StoryError::Aborted)
        }
        fn choices(&self) -> Option<&dyn ChoiceCapability> {
            Some(self)
        }
    }

    impl ChoiceCapability for ScriptedHost {
        fn present_choice(&self, prompt: &ChoicePrompt<'_>) -> StoryResult<ChoiceOutcome> {
            self.shown.borrow_mut().push((
                prompt.cancellable,
                prompt.title.map(str::to_string),
                prompt.text.to_string(),
                prompt.options.iter().map(|o| o.label.clone()).collect(),
            ));
            self.answers
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(StoryError::Aborted))
        }
    }

    fn session(host: &Rc<ScriptedHost>) -> Session {
        Session::new(host.clone())
    }

    #[test]
    fn presents_exactly_once() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(1)]);
        let session = session(&host);

        let mut choices: Choices = Choices::new("Which way?").with_title("Crossroads");
        choices.choice("Left");
        choices.add_option(ChoiceOption::new("Right").with_color("green"));
        let outcome = choices.run(&session).unwrap();

        assert_eq!(outcome, ChoiceOutcome::Chosen(1));
        let shown = host.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert_eq!(
            shown[0],
            (
                false,
                Some("Crossroads".to_string()),
                "Which way?".to_string(),
                vec!["Left".to_string(), "Right".to_string()]
            )
        );
    }

    #[test]
    fn all_matching_actions_run_in_order() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(0)]);
        let session = session(&host);
        let log = RefCell::new(Vec::new());

        let mut choices: Choices = Choices::new("Drink the potion?");
        let yes = choices.choice("Yes");
        let no = choices.choice("No");
        choices.on(yes, || {
            log.borrow_mut().push("first");
            Ok(())
        });
        choices.on(no, || {
            log.borrow_mut().push("declined");
            Ok(())
        });
        choices.on(yes, || {
            log.borrow_mut().push("second");
            Ok(())
        });
        choices.on_cancel(|| {
            log.borrow_mut().push("cancelled");
            Ok(())
        });
        choices.run(&session).unwrap();

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn cancellation_runs_cancel_actions() {
        let host = ScriptedHost::answering([ChoiceOutcome::Cancelled]);
        let session = session(&host);
        let log = RefCell::new(Vec::new());

        let mut choices: Choices = Choices::new("Leave?").cancellable();
        let yes = choices.choice("Yes");
        choices.on(yes, || {
            log.borrow_mut().push("left");
            Ok(())
        });
        choices.on_cancel(|| {
            log.borrow_mut().push("stayed");
            Ok(())
        });
        assert_eq!(choices.run(&session).unwrap(), ChoiceOutcome::Cancelled);
        assert_eq!(*log.borrow(), vec!["stayed"]);
        assert!(host.shown.borrow()[0].0);
    }

    #[test]
    fn yields_first_matching_value() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(1)]);
        let session = session(&host);

        let mut choices = Choices::new("Pick a number");
        let one = choices.choice("One");
        let two = choices.choice("Two");
        choices.yields(one, || Ok(1));
        choices.yields(two, || Ok(2));
        choices.yields(two, || Ok(22));
        assert_eq!(choices.resolve(&session).unwrap(), 2);
    }

    #[test]
    fn actions_run_before_yield() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(0)]);
        let session = session(&host);
        let gold = RefCell::new(10);

        let mut choices = Choices::new("Pay the toll?");
        let pay = choices.choice("Pay");
        choices.on(pay, || {
            *gold.borrow_mut() -= 3;
            Ok(())
        });
        choices.yields(pay, || Ok(*gold.borrow()));
        assert_eq!(choices.resolve(&session).unwrap(), 7);
    }

    #[test]
    fn missing_yield_names_the_option() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(1)]);
        let session = session(&host);

        let mut choices = Choices::new("Pick");
        let a = choices.choice("Apple");
        choices.choice("Banana");
        choices.yields(a, || Ok("apple"));
        let err = choices.resolve(&session).unwrap_err();
        assert!(matches!(err, StoryError::MissingYieldMapping(Some(ref l)) if l == "Banana"));
        assert!(err.to_string().contains("\"Banana\""));
    }

    #[test]
    fn missing_cancel_yield() {
        let host = ScriptedHost::answering([ChoiceOutcome::Cancelled]);
        let session = session(&host);

        let mut choices = Choices::new("Pick").cancellable();
        let a = choices.choice("Apple");
        choices.yields(a, || Ok(1));
        let err = choices.resolve(&session).unwrap_err();
        assert!(matches!(err, StoryError::MissingYieldMapping(None)));
        assert!(err.to_string().contains("cancelling"));
    }

    #[test]
    fn cancel_yield() {
        let host = ScriptedHost::answering([ChoiceOutcome::Cancelled]);
        let session = session(&host);

        let mut choices = Choices::new("Pick").cancellable();
        let a = choices.choice("Apple");
        choices.yields(a, || Ok(Some("apple")));
        choices.yield_if_cancelled(|| Ok(None));
        assert_eq!(choices.resolve(&session).unwrap(), None);
    }

    #[test]
    fn host_may_return_cancel_for_non_cancellable() {
        let host = ScriptedHost::answering([ChoiceOutcome::Cancelled]);
        let session = session(&host);
        let mut choices: Choices = Choices::new("Pick");
        choices.choice("Only");
        assert_eq!(choices.run(&session).unwrap(), ChoiceOutcome::Cancelled);
    }

    #[test]
    fn unknown_index_is_a_host_error() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(5)]);
        let session = session(&host);
        let mut choices: Choices = Choices::new("Pick");
        choices.choice("Only");
        let err = choices.run(&session).unwrap_err();
        assert!(matches!(err, StoryError::Host(HostError::InvalidChoice(5))));
    }

    #[test]
    fn abort_from_host_passes_through() {
        let host = ScriptedHost::answering([]);
        let session = session(&host);
        let ran = RefCell::new(false);
        let mut choices: Choices = Choices::new("Pick");
        let only = choices.choice("Only");
        choices.on(only, || {
            *ran.borrow_mut() = true;
            Ok(())
        });
        assert!(choices.run(&session).unwrap_err().is_abort());
        assert!(!*ran.borrow());
    }

    #[test]
    fn action_errors_stop_the_run() {
        let host = ScriptedHost::answering([ChoiceOutcome::Chosen(0)]);
        let session = session(&host);
        let mut choices = Choices::new("Pick");
        let only = choices.choice("Only");
        choices.on(only, || Err(StoryError::failed("trap")));
        choices.yields(only, || Ok(1));
        assert_eq!(choices.resolve(&session).unwrap_err().to_string(), "trap");
    }

    #[test]
    fn requires_choice_capability() {
        let session = Session::new(Rc::new(st_core::HeadlessHost));
        let mut choices: Choices = Choices::new("Pick");
        choices.choice("Only");
        assert!(matches!(
            choices.run(&session).unwrap_err(),
            StoryError::UnsupportedCapability(st_core::Capability::Choice)
        ));
    }
}
