//! UI Components

use leptos::prelude::*;

use crate::api::ChatMessage;

/// Message bubble component
#[component]
pub fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let class = format!("message message-{}", message.role);

    view! {
        <div class=class>
            <span class="role">{message.role.clone()}</span>
            <p class="content">{message.content.clone()}</p>
        </div>
    }
}

/// Live view of the agent's intermediate reasoning for the turn in flight:
/// tool steps so far plus the streamed thought text.
#[component]
pub fn ThoughtPanel(steps: ReadSignal<Vec<String>>, stream: ReadSignal<String>) -> impl IntoView {
    view! {
        <details class="thoughts" open=false>
            <summary>"Thinking..."</summary>
            <ul class="steps">
                <For
                    each=move || steps.get().into_iter().enumerate()
                    key=|(i, _)| *i
                    children=move |(_, step)| view! { <li>{step}</li> }
                />
            </ul>
            <pre class="stream">{move || stream.get()}</pre>
        </details>
    }
}
