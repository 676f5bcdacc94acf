//! Conversation state machine.
//!
//! [`transition`] is pure: given the current state and an inbound event it returns the next
//! state and the [`Action`] the orchestrator has to run. Failures while running an action are
//! not events here; the orchestrator resets the session to [`ConversationState::Idle`].

use serde::{Deserialize, Serialize};

/// Step of a guided multi-turn flow. Exactly one per user; starts at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingTextPrompt,
    AwaitingImagePrompt,
    AwaitingImageUpload,
    AwaitingEditPrompt,
}

impl ConversationState {
    pub const ALL: [ConversationState; 5] = [
        ConversationState::Idle,
        ConversationState::AwaitingTextPrompt,
        ConversationState::AwaitingImagePrompt,
        ConversationState::AwaitingImageUpload,
        ConversationState::AwaitingEditPrompt,
    ];

    pub fn is_idle(self) -> bool {
        self == ConversationState::Idle
    }
}

/// Main menu buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    NewQuestion,
    GenerateImage,
    EditImage,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [
        MenuChoice::NewQuestion,
        MenuChoice::GenerateImage,
        MenuChoice::EditImage,
    ];

    /// Button label as shown on the reply keyboard.
    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::NewQuestion => "new question",
            MenuChoice::GenerateImage => "generate image",
            MenuChoice::EditImage => "edit image",
        }
    }

    /// Matches a button label, ignoring case and surrounding whitespace.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(text))
    }

    pub fn labels() -> [&'static str; 3] {
        Self::ALL.map(MenuChoice::label)
    }

    /// State a user enters when picking this choice.
    fn entry_state(self) -> ConversationState {
        match self {
            MenuChoice::NewQuestion => ConversationState::AwaitingTextPrompt,
            MenuChoice::GenerateImage => ConversationState::AwaitingImagePrompt,
            MenuChoice::EditImage => ConversationState::AwaitingImageUpload,
        }
    }
}

/// Inbound event, already classified by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Menu(MenuChoice),
    Text(String),
    Photo { file_id: String },
    /// `/start`, `/menu`, `/cancel`.
    Cancel,
    /// `/reset`: forget the chat history.
    ResetHistory,
    Unsupported,
}

impl Event {
    /// Classifies free text: a menu label becomes [`Event::Menu`], anything else [`Event::Text`].
    pub fn from_text(text: &str) -> Self {
        match MenuChoice::from_label(text) {
            Some(choice) => Event::Menu(choice),
            None => Event::Text(text.to_string()),
        }
    }
}

/// What the orchestrator must do for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowMenu,
    /// A flow was entered from the menu; ask for its first input.
    StartFlow(MenuChoice),
    /// Input did not match what the current state waits for; ask again.
    Reprompt(ConversationState),
    ClearHistory,
    Complete { prompt: String },
    Generate { prompt: String },
    /// Resolve an uploaded photo to a URL; on success the edit flow continues.
    ResolveUpload { file_id: String },
    Edit { prompt: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ConversationState,
    pub action: Action,
}

impl Transition {
    fn new(next: ConversationState, action: Action) -> Self {
        Self { next, action }
    }

    fn stay(state: ConversationState) -> Self {
        Self::new(state, Action::Reprompt(state))
    }
}

/// Computes the next state and action for `event` in `state`.
pub fn transition(state: ConversationState, event: &Event) -> Transition {
    use ConversationState::*;

    match (state, event) {
        (_, Event::Menu(choice)) => Transition::new(choice.entry_state(), Action::StartFlow(*choice)),
        (_, Event::Cancel) => Transition::new(Idle, Action::ShowMenu),
        (_, Event::ResetHistory) => Transition::new(Idle, Action::ClearHistory),

        (Idle, _) => Transition::new(Idle, Action::ShowMenu),

        (AwaitingTextPrompt, Event::Text(prompt)) => Transition::new(
            Idle,
            Action::Complete {
                prompt: prompt.clone(),
            },
        ),
        (AwaitingImagePrompt, Event::Text(prompt)) => Transition::new(
            Idle,
            Action::Generate {
                prompt: prompt.clone(),
            },
        ),
        (AwaitingImageUpload, Event::Photo { file_id }) => Transition::new(
            AwaitingEditPrompt,
            Action::ResolveUpload {
                file_id: file_id.clone(),
            },
        ),
        (AwaitingEditPrompt, Event::Text(prompt)) => Transition::new(
            Idle,
            Action::Edit {
                prompt: prompt.clone(),
            },
        ),

        (current, _) => Transition::stay(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::Menu(MenuChoice::NewQuestion),
            Event::Menu(MenuChoice::GenerateImage),
            Event::Menu(MenuChoice::EditImage),
            Event::Text("hello".to_string()),
            Event::Photo {
                file_id: "file-1".to_string(),
            },
            Event::Cancel,
            Event::ResetHistory,
            Event::Unsupported,
        ]
    }

    #[test]
    fn test_menu_labels_round_trip() {
        for choice in MenuChoice::ALL {
            assert_eq!(MenuChoice::from_label(choice.label()), Some(choice));
        }
        assert_eq!(
            MenuChoice::from_label("  Generate Image "),
            Some(MenuChoice::GenerateImage)
        );
        assert_eq!(MenuChoice::from_label("generate"), None);
    }

    #[test]
    fn test_event_from_text() {
        assert_eq!(Event::from_text("edit image"), Event::Menu(MenuChoice::EditImage));
        assert_eq!(
            Event::from_text("a red fox"),
            Event::Text("a red fox".to_string())
        );
    }

    #[test]
    fn test_idle_unrecognized_input_shows_menu() {
        for event in [
            Event::Text("hi".to_string()),
            Event::Photo {
                file_id: "f".to_string(),
            },
            Event::Unsupported,
        ] {
            let t = transition(ConversationState::Idle, &event);
            assert_eq!(t.next, ConversationState::Idle);
            assert_eq!(t.action, Action::ShowMenu);
        }
    }

    #[test]
    fn test_menu_choice_enters_flow_from_any_state() {
        for state in ConversationState::ALL {
            let t = transition(state, &Event::Menu(MenuChoice::GenerateImage));
            assert_eq!(t.next, ConversationState::AwaitingImagePrompt);
            assert_eq!(t.action, Action::StartFlow(MenuChoice::GenerateImage));
        }
    }

    #[test]
    fn test_text_flow() {
        let t = transition(ConversationState::AwaitingTextPrompt, &Event::Text("why?".into()));
        assert_eq!(t.next, ConversationState::Idle);
        assert_eq!(
            t.action,
            Action::Complete {
                prompt: "why?".to_string()
            }
        );
    }

    #[test]
    fn test_edit_flow() {
        let t = transition(
            ConversationState::AwaitingImageUpload,
            &Event::Photo {
                file_id: "abc".to_string(),
            },
        );
        assert_eq!(t.next, ConversationState::AwaitingEditPrompt);
        assert_eq!(
            t.action,
            Action::ResolveUpload {
                file_id: "abc".to_string()
            }
        );

        let t = transition(ConversationState::AwaitingEditPrompt, &Event::Text("make it blue".into()));
        assert_eq!(t.next, ConversationState::Idle);
        assert_eq!(
            t.action,
            Action::Edit {
                prompt: "make it blue".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_input_reprompts_and_keeps_state() {
        let t = transition(ConversationState::AwaitingImageUpload, &Event::Text("hi".into()));
        assert_eq!(t.next, ConversationState::AwaitingImageUpload);
        assert_eq!(t.action, Action::Reprompt(ConversationState::AwaitingImageUpload));

        let t = transition(
            ConversationState::AwaitingTextPrompt,
            &Event::Photo {
                file_id: "f".to_string(),
            },
        );
        assert_eq!(t.next, ConversationState::AwaitingTextPrompt);
    }

    #[test]
    fn test_every_pair_yields_known_state_and_cancel_returns_to_idle() {
        for state in ConversationState::ALL {
            for event in sample_events() {
                let t = transition(state, &event);
                assert!(ConversationState::ALL.contains(&t.next));
                assert!(transition(t.next, &Event::Cancel).next.is_idle());
            }
        }
    }

    #[test]
    fn test_every_flow_reaches_idle_with_expected_input() {
        // Feeding each awaiting state the input it waits for ends at Idle within two steps.
        for choice in MenuChoice::ALL {
            let mut state = transition(ConversationState::Idle, &Event::Menu(choice)).next;
            for _ in 0..2 {
                let event = match state {
                    ConversationState::AwaitingImageUpload => Event::Photo {
                        file_id: "f".to_string(),
                    },
                    _ => Event::Text("input".to_string()),
                };
                state = transition(state, &event).next;
            }
            assert!(state.is_idle(), "{choice:?} ended in {state:?}");
        }
    }
}
