use tauri::State;

use crate::models::SessionState;
use crate::services::controller::ChatController;
use crate::services::gateway::HttpChatGateway;

/// The concrete controller managed by the Tauri app.
pub type Controller = ChatController<HttpChatGateway>;

#[tauri::command]
pub fn get_session(controller: State<'_, Controller>) -> Result<SessionState, String> {
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn start_new_chat(controller: State<'_, Controller>) -> Result<SessionState, String> {
    controller.start_new_chat().await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn open_chat(
    controller: State<'_, Controller>,
    chat_id: String,
) -> Result<SessionState, String> {
    controller.open_chat(&chat_id).await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn send_message(
    controller: State<'_, Controller>,
    text: String,
) -> Result<SessionState, String> {
    controller.send(&text).await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn request_hint(controller: State<'_, Controller>) -> Result<SessionState, String> {
    controller.hint().await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn request_ideal_answer(
    controller: State<'_, Controller>,
) -> Result<SessionState, String> {
    controller.ideal_answer().await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn finish_interview(controller: State<'_, Controller>) -> Result<SessionState, String> {
    controller.finish().await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn refresh_chat_list(controller: State<'_, Controller>) -> Result<SessionState, String> {
    controller.refresh_chat_list().await;
    Ok(controller.snapshot())
}
