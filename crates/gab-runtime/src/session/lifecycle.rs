use super::*;

pub struct DialogueSessionOptions {
    pub file: GabFile,
    pub command_handlers: Option<Arc<dyn CommandHandlers>>,
    /// History carried over from an earlier session.
    pub visited: Option<BTreeSet<String>>,
}

pub struct DialogueSession {
    pub(super) nodes: BTreeMap<String, ScriptNode>,
    pub(super) speakers: SpeakerTable,
    pub(super) command_handlers: Arc<dyn CommandHandlers>,

    pub(super) state: SessionState,
    pub(super) visited: BTreeSet<String>,
    pub(super) return_stack: Vec<String>,
    pub(super) active_speaker: Option<String>,
}

impl DialogueSession {
    pub fn new(options: DialogueSessionOptions) -> Result<Self, GabError> {
        let GabFile { nodes: list, speakers } = options.file;
        let mut nodes = BTreeMap::new();
        for node in list {
            if nodes.contains_key(&node.title) {
                return Err(GabError::with_line(
                    "ENGINE_DUPLICATE_TITLE",
                    format!("Node '{}' is defined more than once.", node.title),
                    node.line,
                ));
            }
            nodes.insert(node.title.clone(), node);
        }

        let command_handlers: Arc<dyn CommandHandlers> = options
            .command_handlers
            .unwrap_or_else(|| Arc::new(IgnoreCommands));

        Ok(Self {
            nodes,
            speakers,
            command_handlers,
            state: SessionState::Idle,
            visited: options.visited.unwrap_or_default(),
            return_stack: Vec::new(),
            active_speaker: None,
        })
    }

    /// Enters `title` from the top. History is kept so examine sub-dialogues
    /// can be started on a session that already ran; pending detours are not.
    pub fn start(&mut self, title: &str) -> Result<(), GabError> {
        let cursor = self.goto(title, false)?;
        self.return_stack.clear();
        self.state = SessionState::Emitting(cursor);
        info!("dialogue started at {}", title);
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_node(&self) -> Option<&CompiledNode> {
        self.state.cursor().map(|cursor| &cursor.node)
    }

    pub fn is_current_node_examine(&self) -> bool {
        self.current_node().is_some_and(CompiledNode::is_examine)
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    pub fn is_visited(&self, title: &str) -> bool {
        self.visited.contains(title)
    }

    pub fn visited(&self) -> &BTreeSet<String> {
        &self.visited
    }

    pub fn into_visited(self) -> BTreeSet<String> {
        self.visited
    }

    pub fn return_depth(&self) -> usize {
        self.return_stack.len()
    }

    pub fn speakers(&self) -> &SpeakerTable {
        &self.speakers
    }

    /// The last speaker named by an emitted line. Bare lines keep it.
    pub fn active_speaker(&self) -> Option<&str> {
        self.active_speaker.as_deref()
    }

    /// Fails with `SPEAKER_NOT_FOUND` when `name` has no speaker block;
    /// `Ok(None)` means the speaker exists but has no talk animation.
    pub fn get_animation_for_speaker(&self, name: &str) -> Result<Option<&str>, GabError> {
        self.speakers.animation_for(name)
    }

    pub fn node_titles(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub(super) fn goto(&mut self, title: &str, skip_to_choices: bool) -> Result<Cursor, GabError> {
        let node = self.nodes.get(title).ok_or_else(|| {
            GabError::new(
                "ENGINE_NODE_NOT_FOUND",
                format!("Node '{}' does not exist.", title),
            )
        })?;
        let compiled = compile_node(node, &self.visited);
        self.visited.insert(title.to_string());
        debug!("goto {} (skip_to_choices: {})", title, skip_to_choices);

        Ok(if skip_to_choices {
            Cursor::skip_to_choices(compiled)
        } else {
            Cursor::at_start(compiled)
        })
    }

    pub(super) fn push_return(&mut self, title: String) {
        debug!("detour from {} (depth {})", title, self.return_stack.len() + 1);
        self.return_stack.push(title);
    }

    pub(super) fn pop_return(&mut self) -> Option<String> {
        self.return_stack.pop()
    }
}
