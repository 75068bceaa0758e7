//! Parse a text story, refine it in code and read it through end to end.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use st_core::{
    ChoiceCapability, ChoiceOutcome, ChoicePrompt, Host, InputCapability, Session, StoryError,
    StoryOption, StoryResult,
};
use st_engine::{Choices, StoryReader, build_stories};

const CAVE: &str = "\
title = The Cave
author = Anonymous
initialNode = entrance

[entrance]
You stand before a dark cave.
{Enter} hall
{Leave} outside

[hall]
A hall full of echoes.

Someone left a lantern here.
{Go back} entrance

[outside]
Daylight. The end.
";

/// Answers input and choice prompts from queues.
#[derive(Default)]
struct Player {
    names: RefCell<VecDeque<String>>,
    answers: RefCell<VecDeque<ChoiceOutcome>>,
}

impl Host for Player {
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn close_story(&self) -> StoryResult<()> {
        Err(StoryError::Aborted)
    }
    fn input(&self) -> Option<&dyn InputCapability> {
        Some(self)
    }
    fn choices(&self) -> Option<&dyn ChoiceCapability> {
        Some(self)
    }
}

impl InputCapability for Player {
    fn ask_input(&self, _question: &str) -> StoryResult<String> {
        self.names
            .borrow_mut()
            .pop_front()
            .ok_or(StoryError::Aborted)
    }
}

impl ChoiceCapability for Player {
    fn present_choice(&self, _prompt: &ChoicePrompt<'_>) -> StoryResult<ChoiceOutcome> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or(StoryError::Aborted)
    }
}

#[test]
fn text_story_reads_through() {
    let session = Session::new(Rc::new(Player::default()));
    let stories = build_stories(&session, |b| {
        b.import_text(CAVE, |_| Ok(()))?;
        Ok(())
    })
    .unwrap();
    let story = &stories[0];

    let mut reader = StoryReader::new(story, &session);
    let view = reader.start().unwrap();
    assert_eq!(view.node.as_str(), "entrance");
    assert_eq!(view.text, "You stand before a dark cave.");

    let view = reader.press(0).unwrap();
    assert_eq!(
        view.text,
        "A hall full of echoes.\n\nSomeone left a lantern here."
    );

    reader.press(0).unwrap();
    let view = reader.press(1).unwrap();
    assert_eq!(view.text, "Daylight. The end.");
    assert!(view.options.is_empty());
}

#[test]
fn refined_story_uses_host_and_environment() {
    let player = Rc::new(Player::default());
    player.names.borrow_mut().push_back("Ada".into());
    player.answers.borrow_mut().push_back(ChoiceOutcome::Chosen(1));
    let session = Session::new(player.clone());

    let stories = build_stories(&session, |b| {
        b.import_text(CAVE, |story| {
            story.with_node("entrance", |node| {
                node.set_body("Welcome, {name}. You stand before a dark cave.");
                node.bind("{name}", |scope| scope.env().get("name", String::new()));
                node.on_reached(|scope| {
                    if !scope.env().contains("name") {
                        let name = scope.session().ask_input("What is your name?")?;
                        scope.env().set("name", name)?;
                    }
                    Ok(())
                });
            })?;
            story.with_node("hall", |node| {
                node.add_option(
                    StoryOption::labeled("Pick up the lantern")
                        .with_availability(|scope| {
                            Ok(!scope.env().get("lantern", false)?)
                        })
                        .with_visibility(|_| Ok(true))
                        .does(|scope| {
                            let mut choices = Choices::new("Light it?");
                            let yes = choices.choice("Yes");
                            let no = choices.choice("No");
                            choices.yields(yes, || Ok(true));
                            choices.yields(no, || Ok(false));
                            let lit = choices.resolve(scope.session())?;
                            scope.env().set("lantern", true)?;
                            scope.env().set("lit", lit)?;
                            Ok(None)
                        }),
                );
            })
        })?;
        Ok(())
    })
    .unwrap();
    let story = &stories[0];

    let mut reader = StoryReader::new(story, &session);
    let view = reader.start().unwrap();
    assert_eq!(view.text, "Welcome, Ada. You stand before a dark cave.");

    let view = reader.press(0).unwrap();
    assert_eq!(view.options.len(), 2);
    assert!(view.options[1].available);

    // Stays in the hall, the lantern option is now greyed out.
    let view = reader.press(1).unwrap();
    assert_eq!(view.node.as_str(), "hall");
    assert!(!view.options[1].available);
    assert!(!session.env().get_required::<bool>("lit").unwrap());

    // Unavailable options can still be pressed; the host has no answers
    // left, so the nested choice aborts and the reader stays put.
    let err = reader.press(1).unwrap_err();
    assert!(err.is_abort());
    assert_eq!(reader.current().map(|v| v.node.as_str()), Some("hall"));
}
