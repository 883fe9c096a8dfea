//! Interactive chat surface
//!
//! A line-oriented REPL over the orchestrator: plain lines are submitted as
//! queries, slash commands manage conversations. This surface owns query
//! validation for commands (the store itself does not validate titles).

use std::io::{self, BufRead, Write};

use quest_session::{ConversationStore, Role, SearchOrchestrator, Submission};

/// Starter suggestions shown on the welcome screen.
const SUGGESTIONS: [&str; 4] = [
    "What are the latest AI developments?",
    "How does quantum computing work?",
    "Explain climate change solutions",
    "What's happening in space exploration?",
];

/// Run the REPL until EOF or `/quit`.
pub async fn run(orchestrator: &SearchOrchestrator) -> anyhow::Result<()> {
    println!("quest - ask anything. Type /help for commands.");
    println!();
    println!("Try one of:");
    for suggestion in SUGGESTIONS {
        println!("  {suggestion}");
    }

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(orchestrator.store(), command) {
                break;
            }
            continue;
        }

        submit(orchestrator, line).await;
    }

    Ok(())
}

/// Run one query and exit.
pub async fn one_shot(orchestrator: &SearchOrchestrator, query: &str) -> anyhow::Result<()> {
    submit(orchestrator, query).await;
    Ok(())
}

async fn submit(orchestrator: &SearchOrchestrator, query: &str) {
    match orchestrator.submit(query).await {
        Submission::Resolved { conversation_id } => {
            print_answer(orchestrator.store(), &conversation_id);
        }
        Submission::EmptyQuery => {}
        Submission::InFlight => println!("A search is already running."),
    }
}

/// Print the newest assistant message of a conversation, with its sources
/// and follow-up suggestions.
fn print_answer(store: &ConversationStore, conversation_id: &str) {
    let Some(conversation) = store.conversation(conversation_id) else {
        return;
    };
    let Some(message) = conversation
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant && !m.is_loading)
    else {
        return;
    };

    println!("\n{}", message.content);

    if let Some(ref sources) = message.sources {
        if !sources.is_empty() {
            println!("\nSources:");
            for source in sources {
                println!("  [{}] {} ({})", source.id, source.title, source.domain);
            }
        }
    }

    if let Some(ref questions) = message.followup_questions {
        if !questions.is_empty() {
            println!("\nTry asking:");
            for question in questions {
                println!("  - {question}");
            }
        }
    }
}

/// Handle a slash command. Returns false when the REPL should exit.
fn handle_command(store: &ConversationStore, command: &str) -> bool {
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "help" => {
            println!("Commands:");
            println!("  /new              start a new chat");
            println!("  /chats            list conversations");
            println!("  /switch <id>      switch to a conversation");
            println!("  /rename <title>   rename the current conversation");
            println!("  /delete [id]      delete a conversation (current if omitted)");
            println!("  /quit             exit");
        }
        "new" => {
            store.clear_current_conversation();
            println!("Started a new chat.");
        }
        "chats" => {
            let conversations = store.conversations();
            if conversations.is_empty() {
                println!("No conversations yet.");
            }
            let current = store.current_conversation().map(|c| c.id);
            for conversation in conversations {
                let marker = if current.as_deref() == Some(&conversation.id) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {}  {} ({} messages)",
                    conversation.id,
                    conversation.title,
                    conversation.messages.len()
                );
            }
        }
        "switch" => {
            if rest.is_empty() {
                println!("Usage: /switch <id>");
            } else if store.conversation(rest).is_none() {
                println!("No conversation with id {rest}.");
            } else {
                store.set_current_conversation(rest);
                println!("Switched.");
            }
        }
        "rename" => {
            // Empty or whitespace-only titles never reach the store.
            if rest.is_empty() {
                println!("Usage: /rename <title>");
            } else if let Some(conversation) = store.current_conversation() {
                store.rename_conversation(&conversation.id, rest);
                println!("Renamed.");
            } else {
                println!("No active chat to rename.");
            }
        }
        "delete" => {
            let id = if rest.is_empty() {
                store.current_conversation().map(|c| c.id)
            } else {
                Some(rest.to_string())
            };
            match id {
                Some(id) => {
                    store.delete_conversation(&id);
                    println!("Deleted.");
                }
                None => println!("No active chat to delete."),
            }
        }
        "quit" | "exit" => return false,
        _ => println!("Unknown command: /{name} (try /help)"),
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_stops_the_loop() {
        let store = ConversationStore::in_memory();
        assert!(!handle_command(&store, "quit"));
        assert!(!handle_command(&store, "exit"));
        assert!(handle_command(&store, "help"));
    }

    #[test]
    fn test_new_clears_current() {
        let store = ConversationStore::in_memory();
        store.create_conversation("hello");
        assert!(handle_command(&store, "new"));
        assert!(store.current_conversation().is_none());
    }

    #[test]
    fn test_rename_requires_title() {
        let store = ConversationStore::in_memory();
        let id = store.create_conversation("hello");

        handle_command(&store, "rename   ");
        assert_eq!(store.conversation(&id).unwrap().title, "hello");

        handle_command(&store, "rename better name");
        assert_eq!(store.conversation(&id).unwrap().title, "better name");
    }

    #[test]
    fn test_delete_defaults_to_current() {
        let store = ConversationStore::in_memory();
        store.create_conversation("hello");
        handle_command(&store, "delete");
        assert!(store.conversations().is_empty());
    }

    #[test]
    fn test_switch_unknown_id_keeps_current() {
        let store = ConversationStore::in_memory();
        let id = store.create_conversation("hello");
        handle_command(&store, "switch nope");
        assert_eq!(store.current_conversation().unwrap().id, id);
    }
}
