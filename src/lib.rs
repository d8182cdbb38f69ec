mod commands;
mod models;
mod services;

use commands::*;
use services::controller::ChatController;
use services::gateway::HttpChatGateway;
use services::session::SessionStore;
use tauri::{Emitter, Manager};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_log::Builder::new().build())
        .setup(|app| {
            // Every store mutation is mirrored to the webview as one event;
            // the view re-renders from the snapshot it carries.
            let handle = app.handle().clone();
            let store = SessionStore::with_notifier(move |state| {
                let _ = handle.emit("session-changed", state);
            });
            app.manage(ChatController::new(store, HttpChatGateway::new()));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Auth commands
            login,
            register,
            check_auth_status,
            logout,
            // Config commands
            get_server_url,
            set_server_url,
            get_config,
            // Chat commands
            get_session,
            start_new_chat,
            open_chat,
            send_message,
            request_hint,
            request_ideal_answer,
            finish_interview,
            refresh_chat_list,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
