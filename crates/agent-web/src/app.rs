//! Main App Component

use leptos::prelude::*;

use crate::pages::ChatPage;

/// Root application component: a single chat view
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="app">
            <header class="app-header">
                <h1>"🔎 Research Agent (Groq + Tavily)"</h1>
            </header>
            <ChatPage />
        </main>
    }
}
