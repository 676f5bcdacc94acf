//! User-facing texts.

use conversation::{ConversationState, MenuChoice};

pub const MSG_MENU: &str = "Choose what to do:";
pub const MSG_HISTORY_CLEARED: &str = "Chat history cleared. Choose what to do:";
pub const MSG_ASK_QUESTION: &str = "Send your question.";
pub const MSG_ASK_IMAGE_PROMPT: &str = "Describe the image you want.";
pub const MSG_ASK_UPLOAD: &str = "Send the photo you want to edit.";
pub const MSG_ASK_EDIT_PROMPT: &str = "Got it. Now describe how to change the photo.";
pub const MSG_EXPECT_TEXT: &str = "Please send text.";
pub const MSG_EXPECT_PHOTO: &str = "Please send a photo.";
pub const MSG_GENERATING: &str = "Generating the image, please wait...";
pub const MSG_EDITING: &str = "Editing the photo, please wait...";
pub const MSG_EMPTY_REPLY: &str = "The model returned an empty answer.";

// --- failures ---
pub const MSG_COMPLETION_FAILED: &str = "Sorry, I could not get an answer. Please try again later.";
pub const MSG_IMAGE_FAILED: &str = "Sorry, image generation failed. Please try again later.";
pub const MSG_EDIT_FAILED: &str = "Sorry, editing the photo failed. Please try again later.";
pub const MSG_UPLOAD_FAILED: &str = "Sorry, I could not read that photo. Please start again.";
pub const MSG_SEND_FAILED: &str = "Sorry, sending the image failed.";

/// First prompt of the flow behind a menu choice.
pub fn flow_prompt(choice: MenuChoice) -> &'static str {
    match choice {
        MenuChoice::NewQuestion => MSG_ASK_QUESTION,
        MenuChoice::GenerateImage => MSG_ASK_IMAGE_PROMPT,
        MenuChoice::EditImage => MSG_ASK_UPLOAD,
    }
}

/// Reminder sent when input does not match what `state` waits for.
pub fn reprompt(state: ConversationState) -> &'static str {
    match state {
        ConversationState::AwaitingImageUpload => MSG_EXPECT_PHOTO,
        ConversationState::Idle => MSG_MENU,
        _ => MSG_EXPECT_TEXT,
    }
}

pub fn image_caption(prompt: &str) -> String {
    let preview: String = prompt.chars().take(200).collect();
    format!("Image for: {preview}")
}
