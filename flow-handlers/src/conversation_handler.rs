//! Orchestrator: one inbound message → one state-machine transition → one action.

use std::sync::Arc;

use async_trait::async_trait;
use completion_client::{complete, LlmClient};
use conversation::{Action, Event, HistoryEntry, MenuChoice, Role, Session, SessionStore, UserId};
use image_generation_client::{JobPoller, PredictionRequest};
use studio_core::{Bot, Chat, Handler, HandlerResponse, Message, MessageContent, Result};
use tracing::{error, info, instrument, warn};

use crate::messages::*;

/// Model versions for the two image flows.
#[derive(Debug, Clone)]
pub struct ImageModels {
    pub generation: String,
    pub editing: String,
}

/// Routes messages through per-user sessions.
///
/// The user's session stays locked while its event is handled, remote calls included, so
/// messages from one user are processed strictly one after another.
pub struct ConversationHandler {
    bot: Arc<dyn Bot>,
    sessions: SessionStore,
    llm: Arc<dyn LlmClient>,
    jobs: JobPoller,
    models: ImageModels,
}

/// Classifies message content into a state-machine event.
fn to_event(content: &MessageContent) -> Event {
    match content {
        MessageContent::Text(text) => Event::from_text(text),
        MessageContent::Command { name, .. } => match name.as_str() {
            "start" | "menu" | "cancel" => Event::Cancel,
            "reset" => Event::ResetHistory,
            _ => Event::Unsupported,
        },
        MessageContent::Photo { file_id, .. } => Event::Photo {
            file_id: file_id.clone(),
        },
        MessageContent::Unsupported => Event::Unsupported,
    }
}

impl ConversationHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        sessions: SessionStore,
        llm: Arc<dyn LlmClient>,
        jobs: JobPoller,
        models: ImageModels,
    ) -> Self {
        Self {
            bot,
            sessions,
            llm,
            jobs,
            models,
        }
    }

    /// Shared session store (state, history and flow data of every user).
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn run_action(
        &self,
        session: &mut Session,
        chat: &Chat,
        action: Action,
        source_image: Option<String>,
    ) -> Result<HandlerResponse> {
        match action {
            Action::ShowMenu => {
                self.bot
                    .send_menu(chat, MSG_MENU, &MenuChoice::labels())
                    .await?;
                Ok(HandlerResponse::Stop)
            }
            Action::StartFlow(choice) => {
                self.bot.send_message(chat, flow_prompt(choice)).await?;
                Ok(HandlerResponse::Stop)
            }
            Action::Reprompt(state) => {
                self.bot.send_message(chat, reprompt(state)).await?;
                Ok(HandlerResponse::Stop)
            }
            Action::ClearHistory => {
                session.history.clear();
                self.bot
                    .send_menu(chat, MSG_HISTORY_CLEARED, &MenuChoice::labels())
                    .await?;
                Ok(HandlerResponse::Stop)
            }
            Action::Complete { prompt } => self.answer(session, chat, prompt).await,
            Action::Generate { prompt } => {
                let request = PredictionRequest::text_to_image(&self.models.generation, &prompt);
                self.render(session, chat, request, &prompt, MSG_GENERATING, MSG_IMAGE_FAILED)
                    .await
            }
            Action::ResolveUpload { file_id } => self.accept_upload(session, chat, &file_id).await,
            Action::Edit { prompt } => {
                let Some(image_url) = source_image else {
                    warn!("edit requested without a resolved photo");
                    return self.fail(session, chat, MSG_UPLOAD_FAILED).await;
                };
                let request =
                    PredictionRequest::image_edit(&self.models.editing, &image_url, &prompt);
                self.render(session, chat, request, &prompt, MSG_EDITING, MSG_EDIT_FAILED)
                    .await
            }
        }
    }

    /// Text flow: record the question, ask the model, send the answer.
    async fn answer(
        &self,
        session: &mut Session,
        chat: &Chat,
        prompt: String,
    ) -> Result<HandlerResponse> {
        session.history.push(HistoryEntry::user(prompt));

        match complete(self.llm.as_ref(), &mut session.history).await {
            Ok(reply) if reply.trim().is_empty() => {
                // A blank assistant turn is not sent as context again.
                session.history.pop_last_if(Role::Assistant);
                session.history.pop_last_if(Role::User);
                warn!("completion returned a blank reply");
                self.bot.send_message(chat, MSG_EMPTY_REPLY).await?;
                Ok(HandlerResponse::Stop)
            }
            Ok(reply) => {
                self.bot.send_message(chat, &reply).await?;
                Ok(HandlerResponse::Reply(reply))
            }
            Err(e) => {
                // Keep history alternating: drop the question nobody answered.
                session.history.pop_last_if(Role::User);
                error!(error = %e, "completion failed");
                self.fail(session, chat, MSG_COMPLETION_FAILED).await
            }
        }
    }

    /// Image flows: run the job and send the resulting photo.
    async fn render(
        &self,
        session: &mut Session,
        chat: &Chat,
        request: PredictionRequest,
        prompt: &str,
        notice: &str,
        failure: &str,
    ) -> Result<HandlerResponse> {
        self.bot.send_message(chat, notice).await?;

        let image_url = match self.jobs.run_job(&request).await {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, version = %request.version, "image job failed");
                return self.fail(session, chat, failure).await;
            }
        };

        if let Err(e) = self
            .bot
            .send_photo(chat, &image_url, Some(&image_caption(prompt)))
            .await
        {
            error!(error = %e, image_url = %image_url, "sending photo failed");
            return self.fail(session, chat, MSG_SEND_FAILED).await;
        }

        info!(image_url = %image_url, "image sent");
        Ok(HandlerResponse::Photo(image_url))
    }

    /// Edit flow, first step: turn the uploaded photo into a URL the image model can fetch.
    async fn accept_upload(
        &self,
        session: &mut Session,
        chat: &Chat,
        file_id: &str,
    ) -> Result<HandlerResponse> {
        match self.bot.file_url(file_id).await {
            Ok(url) => {
                session.set_source_image(url);
                self.bot.send_message(chat, MSG_ASK_EDIT_PROMPT).await?;
                Ok(HandlerResponse::Stop)
            }
            Err(e) => {
                error!(error = %e, file_id = %file_id, "resolving uploaded photo failed");
                self.fail(session, chat, MSG_UPLOAD_FAILED).await
            }
        }
    }

    /// Reports a failure once and returns the user to Idle.
    async fn fail(&self, session: &mut Session, chat: &Chat, text: &str) -> Result<HandlerResponse> {
        session.reset();
        self.bot.send_message(chat, text).await?;
        Ok(HandlerResponse::Stop)
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let user_id = UserId(message.user.id);
        let event = to_event(&message.content);

        let session = self.sessions.session(user_id).await;
        let mut session = session.lock().await;

        let previous = session.state();
        // Read before the transition: leaving the edit flow drops it.
        let source_image = session.source_image().map(str::to_string);
        let transition = session.apply(&event);
        info!(
            from = ?previous,
            to = ?transition.next,
            action = ?transition.action,
            "step: transition"
        );

        let result = self
            .run_action(&mut session, &message.chat, transition.action, source_image)
            .await;
        if result.is_err() {
            // Transport failure while replying; do not leave the user mid-flow.
            session.reset();
        }
        result
    }
}
