use log::debug;
use std::error::Error;
use std::io::{ self, Write };
use std::path::Path;
use std::sync::Arc;

use crate::api::ChatApi;
use crate::auth::{ AuthContext, AuthSession };
use crate::cli::Args;
use crate::session::ChatSession;
use crate::suggest::{ quick_replies, SuggestionEngine, SuggestionOptions };
use crate::upload::UploadCoordinator;
use crate::validate;

/// Line-oriented front end. Renders whatever state the session exposes and
/// forwards every action; all conversation logic lives in the session
/// manager and its collaborators.
pub struct Repl {
    args: Args,
    api: Arc<dyn ChatApi>,
    auth: Arc<AuthContext>,
    auth_session: AuthSession,
    session: ChatSession,
    uploads: UploadCoordinator,
    suggestions: SuggestionEngine,
}

impl Repl {
    pub fn new(
        args: Args,
        api: Arc<dyn ChatApi>,
        auth: Arc<AuthContext>,
        uploads: UploadCoordinator
    ) -> Self {
        let auth_session = AuthSession::new(Arc::clone(&api), Arc::clone(&auth));
        let session = ChatSession::new(Arc::clone(&api));
        let suggestions = SuggestionEngine::new(SuggestionOptions {
            max_suggestions: args.max_suggestions,
            min_length: args.suggestion_min_length,
        });
        Self {
            args,
            api,
            auth,
            auth_session,
            session,
            uploads,
            suggestions,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("threadchat started. Type /help for commands, /quit to exit.\n");
        if let Some(user) = self.auth.current_user() {
            println!("Signed in as {}.\n", user.username);
        }

        loop {
            print!("You: ");
            io::stdout().flush()?;

            let mut line = String::new();
            if io::stdin().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("/quit") || line.eq_ignore_ascii_case("quit") {
                println!("Goodbye!");
                break;
            }

            if let Err(e) = self.dispatch(line).await {
                eprintln!("Error: {}\n", e);
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, line: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();

        match command {
            "/help" => {
                print_help();
                Ok(())
            }
            "/login" => {
                let (email, password) = (words.next(), words.next());
                match (email, password) {
                    (Some(email), Some(password)) => self.login(email, password).await,
                    _ => {
                        println!("Usage: /login EMAIL PASSWORD");
                        Ok(())
                    }
                }
            }
            "/register" => {
                match (words.next(), words.next(), words.next()) {
                    (Some(email), Some(username), Some(password)) =>
                        self.register(email, username, password).await,
                    _ => {
                        println!("Usage: /register EMAIL USERNAME PASSWORD");
                        Ok(())
                    }
                }
            }
            "/logout" => {
                self.auth_session.logout().await?;
                println!("Logged out.\n");
                Ok(())
            }
            "/whoami" => {
                match self.auth.current_user() {
                    Some(user) => println!("{} <{}>\n", user.username, user.email),
                    None => println!("Not signed in.\n"),
                }
                Ok(())
            }
            "/threads" => {
                let page = words.next().and_then(|w| w.parse().ok());
                self.list_threads(page).await
            }
            "/open" => {
                match words.next() {
                    Some(thread_id) => self.open_thread(thread_id).await,
                    None => {
                        println!("Usage: /open THREAD_ID");
                        Ok(())
                    }
                }
            }
            "/delete" => {
                match words.next() {
                    Some(thread_id) => self.delete_thread(thread_id).await,
                    None => {
                        println!("Usage: /delete THREAD_ID");
                        Ok(())
                    }
                }
            }
            "/attach" => {
                match words.next() {
                    Some(path) => self.attach(path).await,
                    None => {
                        println!("Usage: /attach FILE");
                        Ok(())
                    }
                }
            }
            "/detach" => {
                self.uploads.discard_image();
                println!("Attachment removed.\n");
                Ok(())
            }
            "/suggest" => {
                let partial = line.trim_start_matches("/suggest").trim();
                for suggestion in self.suggestions.suggest(partial) {
                    println!("  {}", suggestion);
                }
                println!();
                Ok(())
            }
            other if other.starts_with('/') => {
                println!("Unknown command: {}. Type /help.\n", other);
                Ok(())
            }
            _ => self.send(line).await,
        }
    }

    async fn login(
        &mut self,
        email: &str,
        password: &str
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        validate::validate_email(email)?;
        validate::validate_password(password)?;
        let user = self.auth_session.login(email, password).await?;
        println!("Login successful! Welcome back, {}.\n", user.username);
        Ok(())
    }

    async fn register(
        &mut self,
        email: &str,
        username: &str,
        password: &str
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        validate::validate_email(email)?;
        validate::validate_username(username)?;
        validate::validate_password(password)?;
        let user = self.auth_session.register(email, username, password).await?;
        println!("Registration successful! Welcome, {}.\n", user.username);
        Ok(())
    }

    async fn send(&mut self, content: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.uploads.pending_image().is_none() {
            validate::validate_message(content)?;
        }
        let image_url = self.uploads.take_image();

        let exchange = self.session.submit(content, image_url).await?;
        if !content.trim().is_empty() {
            self.suggestions.record(content);
        }

        if let Some(assistant) = &exchange.assistant {
            println!("\nAI: {}\n", assistant.content);
            let replies = quick_replies(&assistant.content).join(" | ");
            println!("Quick replies: {}\n", replies);
        }
        if let Some(usage) = exchange.usage {
            debug!(
                "Token usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }
        Ok(())
    }

    async fn list_threads(
        &mut self,
        page: Option<u32>
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let reply = self.api.list_threads(page, Some(self.args.page_size)).await?;
        if reply.threads.is_empty() {
            println!("No threads yet.\n");
            return Ok(());
        }
        for thread in &reply.threads {
            let title = thread.title.as_deref().unwrap_or("(untitled)");
            let latest = thread.latest_message.as_deref().unwrap_or("");
            println!("  {}  {}  {}", thread.id, title, latest);
        }
        let info = &reply.page_info;
        println!("Page {}/{} ({} threads)\n", info.page, info.total_pages, info.total);
        Ok(())
    }

    async fn open_thread(&mut self, thread_id: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let reply = self.api.get_thread(thread_id).await?;
        let thread = reply.thread.ok_or("Thread not found")?;

        for message in thread.messages.iter().flatten() {
            let speaker = match message.sender {
                crate::models::chat::Sender::User => "You",
                crate::models::chat::Sender::Assistant => "AI",
            };
            println!("{}: {}", speaker, message.content);
        }
        println!();

        // A fresh session: in-flight state of the previous conversation is
        // left behind with the previous session object.
        self.session = ChatSession::with_thread(Arc::clone(&self.api), thread);
        self.suggestions.reset_history(&self.session.user_contents());
        Ok(())
    }

    async fn delete_thread(&mut self, thread_id: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let reply = self.api.delete_thread(thread_id).await?;
        println!("{}\n", reply.message);

        if self.session.thread_id().as_deref() == Some(thread_id) {
            self.session = ChatSession::new(Arc::clone(&self.api));
            self.suggestions.reset_history(&[]);
        }
        Ok(())
    }

    async fn attach(&mut self, path: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let result = self.uploads.attach(Path::new(path)).await?;
        println!(
            "Image uploaded ({} {}x{}). It will be sent with your next message.\n",
            result.format,
            result.width,
            result.height
        );
        Ok(())
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /login EMAIL PASSWORD            Sign in");
    println!("  /register EMAIL USER PASSWORD    Create an account");
    println!("  /logout                          Sign out");
    println!("  /whoami                          Show the signed-in user");
    println!("  /threads [PAGE]                  List threads");
    println!("  /open THREAD_ID                  Resume a thread");
    println!("  /delete THREAD_ID                Delete a thread");
    println!("  /attach FILE                     Upload an image for the next message");
    println!("  /detach                          Remove the pending image");
    println!("  /suggest TEXT                    Show completions for TEXT");
    println!("  /quit                            Exit");
    println!("Anything else is sent as a message.\n");
}
