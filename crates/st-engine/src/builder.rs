//! Programmatic story construction.
//!
//! A [`StoryBuilder`] collects the stories built within one session. Stories
//! can be written from scratch or imported from the text format and then
//! refined, for example to attach environment-driven behaviour to nodes the
//! text format can only express statically.

use st_core::{
    Capability, ChoiceIcon, ChoiceOption, Environment, HostError, Resource, Session, Story,
    StoryError, StoryResult,
};
use st_text::{ParserConfig, TextParser};

use crate::choice::Choices;

/// Builds stories against a session.
#[derive(Debug)]
pub struct StoryBuilder<'s> {
    session: &'s Session,
    parser: TextParser,
    built: Vec<Story>,
}

impl<'s> StoryBuilder<'s> {
    /// Create a builder for `session`.
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            parser: TextParser::default(),
            built: Vec::new(),
        }
    }

    /// Use `config` when importing text stories.
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser = TextParser::new(config);
        self
    }

    /// The session.
    pub fn session(&self) -> &'s Session {
        self.session
    }

    /// The session's environment.
    pub fn env(&self) -> &'s Environment {
        self.session.env()
    }

    /// The stories built so far.
    pub fn built(&self) -> &[Story] {
        &self.built
    }

    /// Build a story from scratch.
    pub fn story(
        &mut self,
        init: impl FnOnce(&mut Story) -> StoryResult<()>,
    ) -> StoryResult<&mut Story> {
        let mut story = Story::new();
        init(&mut story)?;
        self.register(story)
    }

    /// Import a story from text, then refine it with `init`.
    pub fn import_text(
        &mut self,
        source: &str,
        init: impl FnOnce(&mut Story) -> StoryResult<()>,
    ) -> StoryResult<&mut Story> {
        let mut story = self.parser.parse(source)?.story;
        init(&mut story)?;
        self.register(story)
    }

    /// Import a text story stored as a host resource.
    pub fn import_resource(
        &mut self,
        name: &str,
        init: impl FnOnce(&mut Story) -> StoryResult<()>,
    ) -> StoryResult<&mut Story> {
        let resource = self.resource(name)?;
        let source = String::from_utf8(resource.bytes).map_err(|e| {
            HostError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        self.import_text(&source, init)
    }

    /// Fetch a resource from the host.
    pub fn resource(&self, name: &str) -> StoryResult<Resource> {
        self.session.resources()?.get_resource(name)
    }

    /// Ask the host to load its resources.
    pub fn load_resources(&self) -> StoryResult<()> {
        self.session.resources()?.load_resources()
    }

    /// Fail unless the host provides `capability`.
    pub fn require(&self, capability: Capability) -> StoryResult<()> {
        self.session.require(capability)
    }

    /// Fail immediately.
    pub fn force_fail(&self) -> StoryResult<()> {
        Err(StoryError::invalid(
            "the story was forced to crash by calling force_fail()",
        ))
    }

    /// Ask the player to confirm they accept explicit content.
    ///
    /// Choosing "Exit" closes the story, which unwinds with
    /// [`StoryError::Aborted`].
    pub fn warn_nsfw(&self, problematic_content: &[&str]) -> StoryResult<()> {
        let mut text = String::from(
            "This story contains explicit content that is not appropriate for people under legal age.\n\
             By choosing \"Continue\", you confirm that you are of legal age and willing to read this content.",
        );
        if !problematic_content.is_empty() {
            text.push_str("\n\nPotentially problematic content includes:");
            for content in problematic_content {
                text.push_str("\n- ");
                text.push_str(content);
            }
        }

        let session = self.session;
        let mut choices: Choices<'_> = Choices::new(text)
            .with_title("NSFW Warning")
            .with_icon(ChoiceIcon::Named("do-not-disturb".into()));
        let exit = choices.add_option(
            ChoiceOption::new("Exit")
                .with_color("red")
                .with_white_text(true),
        );
        choices.choice("Continue");
        choices.on(exit, || session.close_story());
        choices.run(session).map(|_| ())
    }

    /// Finish building and hand over the stories.
    pub fn finish(self) -> Vec<Story> {
        self.built
    }

    fn register(&mut self, story: Story) -> StoryResult<&mut Story> {
        if self.built.iter().any(|s| s.id == story.id) {
            return Err(StoryError::DuplicateStoryId(story.id));
        }
        tracing::debug!(id = %story.id, title = %story.title, nodes = story.len(), "story built");
        self.built.push(story);
        let last = self.built.len() - 1;
        Ok(&mut self.built[last])
    }
}

/// Run `build` against a fresh builder and return the stories it built.
pub fn build_stories(
    session: &Session,
    build: impl FnOnce(&mut StoryBuilder<'_>) -> StoryResult<()>,
) -> StoryResult<Vec<Story>> {
    let mut builder = StoryBuilder::new(session);
    build(&mut builder)?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use st_core::{
        ChoiceCapability, ChoiceOutcome, ChoicePrompt, HeadlessHost, Host, ResourceCapability,
        Scope, StoryOption,
    };

    use super::*;

    /// A host with choices and resources, answering every prompt the same way.
    struct StubHost {
        answer: ChoiceOutcome,
        resources: HashMap<String, Vec<u8>>,
        loaded: Cell<bool>,
        closed: Cell<bool>,
        prompts: RefCell<Vec<String>>,
    }

    impl StubHost {
        fn new(answer: ChoiceOutcome) -> Rc<Self> {
            let mut resources = HashMap::new();
            resources.insert(
                "intro.story.txt".to_string(),
                b"title = Intro\n[1]\nWelcome.\n".to_vec(),
            );
            resources.insert("broken.story.txt".to_string(), vec![0xff, 0xfe]);
            Rc::new(Self {
                answer,
                resources,
                loaded: Cell::new(false),
                closed: Cell::new(false),
                prompts: RefCell::default(),
            })
        }
    }

    impl Host for StubHost {
        fn warn(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
        fn close_story(&self) -> StoryResult<()> {
            self.closed.set(true);
            Err(StoryError::Aborted)
        }
        fn choices(&self) -> Option<&dyn ChoiceCapability> {
            Some(self)
        }
        fn resources(&self) -> Option<&dyn ResourceCapability> {
            Some(self)
        }
    }

    impl ChoiceCapability for StubHost {
        fn present_choice(&self, prompt: &ChoicePrompt<'_>) -> StoryResult<ChoiceOutcome> {
            self.prompts.borrow_mut().push(prompt.text.to_string());
            Ok(self.answer)
        }
    }

    impl ResourceCapability for StubHost {
        fn get_resource(&self, name: &str) -> StoryResult<Resource> {
            self.resources
                .get(name)
                .map(|bytes| Resource::new(name, bytes.clone()))
                .ok_or_else(|| HostError::ResourceNotFound(name.to_string()).into())
        }

        fn load_resources(&self) -> StoryResult<()> {
            self.loaded.set(true);
            Ok(())
        }
    }

    #[test]
    fn builds_stories() {
        let session = Session::new(Rc::new(HeadlessHost));
        let stories = build_stories(&session, |b| {
            b.story(|story| {
                story.id = "a".into();
                story.title = "First".into();
                story.create_node("1", |_| Ok("Hi".into()), |_| {})?;
                Ok(())
            })?;
            b.story(|story| {
                story.id = "b".into();
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "First");
    }

    #[test]
    fn story_ids_must_differ() {
        let session = Session::new(Rc::new(HeadlessHost));
        let mut builder = StoryBuilder::new(&session);
        builder.story(|_| Ok(())).unwrap();
        let err = builder.story(|_| Ok(())).unwrap_err();
        assert!(matches!(err, StoryError::DuplicateStoryId(ref id) if id.is_empty()));
        assert_eq!(builder.built().len(), 1);
    }

    #[test]
    fn import_then_refine() {
        let session = Session::new(Rc::new(HeadlessHost));
        let mut builder = StoryBuilder::new(&session);
        builder
            .import_text(
                "
                title = Shop
                [1]
                You have {gold} gold.
                ",
                |story| {
                    story.id = "shop".into();
                    story.with_node("1", |node| {
                        node.bind("{gold}", |scope| Ok(scope.env().get("gold", 3)?.to_string()));
                        node.add_option(StoryOption::labeled("Earn").does(|scope| {
                            let gold: i64 = scope.env().get("gold", 3)?;
                            scope.env().set("gold", gold + 1)?;
                            Ok(None)
                        }));
                    })
                },
            )
            .unwrap();
        let stories = builder.finish();
        let story = &stories[0];
        assert_eq!(story.title, "Shop");

        let scope = Scope::new(story, &session);
        let node = story.require("1").unwrap();
        assert_eq!(node.text(&scope).unwrap(), "You have 3 gold.");
        node.options()[0].select(&scope).unwrap();
        assert_eq!(node.text(&scope).unwrap(), "You have 4 gold.");
    }

    #[test]
    fn import_errors_keep_their_kind() {
        let session = Session::new(Rc::new(HeadlessHost));
        let mut builder = StoryBuilder::new(&session);
        let err = builder
            .import_text("[1]\n[1]\n", |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, StoryError::DuplicateNodeId(_)));
    }

    #[test]
    fn parser_config_applies_to_imports() {
        let session = Session::new(Rc::new(HeadlessHost));
        let mut builder = StoryBuilder::new(&session).with_parser_config(
            ParserConfig::default().with_unknown_metadata(st_text::MetadataPolicy::Reject),
        );
        let err = builder
            .import_text("genre = horror\n[1]\n", |_| Ok(()))
            .unwrap_err();
        assert!(err.to_string().contains("genre"));
        assert_eq!(err.kind(), st_core::ErrorKind::Definition);
    }

    #[test]
    fn resources_need_the_capability() {
        let session = Session::new(Rc::new(HeadlessHost));
        let builder = StoryBuilder::new(&session);
        assert!(matches!(
            builder.load_resources().unwrap_err(),
            StoryError::UnsupportedCapability(Capability::Resources)
        ));
        assert!(builder.require(Capability::Choice).is_err());
    }

    #[test]
    fn import_from_resource() {
        let host = StubHost::new(ChoiceOutcome::Chosen(1));
        let session = Session::new(host.clone());
        let mut builder = StoryBuilder::new(&session);
        builder.load_resources().unwrap();
        assert!(host.loaded.get());

        let story = builder
            .import_resource("intro.story.txt", |_| Ok(()))
            .unwrap();
        assert_eq!(story.title, "Intro");

        let err = builder.resource("missing.png").unwrap_err();
        assert!(matches!(err, StoryError::Host(HostError::ResourceNotFound(_))));

        let err = builder
            .import_resource("broken.story.txt", |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, StoryError::Host(HostError::Io(_))));
    }

    #[test]
    fn nsfw_continue() {
        let host = StubHost::new(ChoiceOutcome::Chosen(1));
        let session = Session::new(host.clone());
        let builder = StoryBuilder::new(&session);
        builder.warn_nsfw(&["violence", "gore"]).unwrap();
        assert!(!host.closed.get());
        let prompts = host.prompts.borrow();
        assert!(prompts[0].contains("- violence\n- gore"));
    }

    #[test]
    fn nsfw_exit_aborts() {
        let host = StubHost::new(ChoiceOutcome::Chosen(0));
        let session = Session::new(host.clone());
        let builder = StoryBuilder::new(&session);
        let err = builder.warn_nsfw(&[]).unwrap_err();
        assert!(err.is_abort());
        assert!(host.closed.get());
        assert!(!host.prompts.borrow()[0].contains("problematic"));
    }

    #[test]
    fn force_fail_is_a_definition_error() {
        let session = Session::new(Rc::new(HeadlessHost));
        let builder = StoryBuilder::new(&session);
        assert_eq!(
            builder.force_fail().unwrap_err().kind(),
            st_core::ErrorKind::Definition
        );
    }
}
