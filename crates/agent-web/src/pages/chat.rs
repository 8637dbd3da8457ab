//! Chat Page
//!
//! The single chat view: sidebar with the Groq API key (password field),
//! message list seeded with the assistant greeting, and an input box that
//! runs one turn per submission. While a turn is in flight the input is
//! disabled and the agent's reasoning streams into a thought panel.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

use crate::api::{self, ChatMessage, StreamFrame};
use crate::components::{MessageBubble, ThoughtPanel};

const GREETING: &str = "Hi 👋 I can search the web, Arxiv, and Wikipedia.";

#[component]
pub fn ChatPage() -> impl IntoView {
    let (messages, set_messages) = signal(vec![ChatMessage::new("assistant", GREETING)]);
    let (input, set_input) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (api_key, set_api_key) = signal(String::new());
    let (session_id, set_session_id) = signal(Option::<String>::None);
    let (steps, set_steps) = signal(Vec::<String>::new());
    let (stream, set_stream) = signal(String::new());

    let send = move || {
        let msg = input.get();
        if msg.trim().is_empty() || loading.get() {
            return;
        }

        // Turn dispatched: record the user message, reset the thought panel
        set_messages.update(|msgs| msgs.push(ChatMessage::new("user", msg.clone())));
        set_input.set(String::new());
        set_steps.set(Vec::new());
        set_stream.set(String::new());
        set_loading.set(true);

        let Ok(ws) = WebSocket::new(&api::stream_url()) else {
            set_messages.update(|msgs| {
                msgs.push(ChatMessage::new("error", "Could not reach the server."));
            });
            set_loading.set(false);
            return;
        };

        let request = api::chat_request(&msg, &api_key.get(), session_id.get().as_deref());

        let ws_open = ws.clone();
        let onopen = Closure::<dyn FnMut()>::new(move || {
            let _ = ws_open.send_with_str(&request);
        });
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        let ws_msg = ws.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            let Ok(frame) = serde_json::from_str::<StreamFrame>(&text) else {
                return;
            };

            match frame {
                StreamFrame::Thought { delta } => {
                    set_stream.update(|s| s.push_str(&delta));
                }
                StreamFrame::ToolCall { tool, input } => {
                    set_steps.update(|s| s.push(format!("Calling {}: {}", tool, input)));
                    set_stream.set(String::new());
                }
                StreamFrame::Observation { tool, output } => {
                    set_steps.update(|s| s.push(format!("{} → {}", tool, output)));
                }
                StreamFrame::Answer { content } => {
                    set_messages.update(|msgs| {
                        msgs.push(ChatMessage::new("assistant", content));
                    });
                }
                StreamFrame::Done { session_id } => {
                    set_session_id.set(Some(session_id));
                    set_steps.set(Vec::new());
                    set_stream.set(String::new());
                    set_loading.set(false);
                    let _ = ws_msg.close();
                }
                StreamFrame::Error { message } => {
                    set_messages.update(|msgs| {
                        msgs.push(ChatMessage::new("error", message));
                    });
                    set_loading.set(false);
                    let _ = ws_msg.close();
                }
            }
        });
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        let onerror = Closure::<dyn FnMut(web_sys::ErrorEvent)>::new(move |_| {
            set_messages.update(|msgs| {
                msgs.push(ChatMessage::new("error", "Connection lost. Please retry."));
            });
            set_loading.set(false);
        });
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    };

    view! {
        <div class="chat">
            <aside class="sidebar">
                <h2>"Settings"</h2>
                <div class="field">
                    <label>"Groq API Key"</label>
                    <input
                        type="password"
                        placeholder="gsk_..."
                        prop:value=move || api_key.get()
                        on:input=move |ev| set_api_key.set(event_target_value(&ev))
                    />
                </div>
            </aside>

            <main class="chat-main">
                <div class="messages">
                    <For
                        each=move || messages.get().into_iter().enumerate()
                        key=|(i, _)| *i
                        children=move |(_, msg)| view! { <MessageBubble message=msg /> }
                    />
                    <Show when=move || loading.get()>
                        <ThoughtPanel steps=steps stream=stream />
                    </Show>
                </div>

                <div class="input-area">
                    <textarea
                        placeholder="Ask me something..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send();
                            }
                        }
                    />
                    <button on:click=move |_| send() disabled=move || loading.get()>
                        {move || if loading.get() { "..." } else { "Send" }}
                    </button>
                </div>
            </main>
        </div>
    }
}
