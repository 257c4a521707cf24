use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Remote Service Args ---
    /// GraphQL endpoint of the chat service.
    #[arg(long, env = "CHAT_API_URL", default_value = "http://localhost:3000/graphql")]
    pub api_url: String,

    /// Page size used when listing threads.
    #[arg(long, env = "CHAT_PAGE_SIZE", default_value = "10")]
    pub page_size: u32,

    // --- Credential Store Args ---
    /// Where the signed-in session is persisted (file, memory).
    #[arg(long, env = "CREDENTIAL_STORE", default_value = "file")]
    pub credential_store: String,

    /// Path of the credential file for the file store.
    #[arg(long, env = "CREDENTIAL_PATH", default_value = ".threadchat/credentials.json")]
    pub credential_path: String,

    // --- Media Host Args ---
    /// Cloudinary account identifier for image attachments.
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME", default_value = "")]
    pub cloudinary_cloud_name: String,

    /// Unsigned upload preset for image attachments.
    #[arg(long, env = "CLOUDINARY_UPLOAD_PRESET", default_value = "")]
    pub cloudinary_upload_preset: String,

    /// Destination folder on the media host.
    #[arg(long, env = "CLOUDINARY_FOLDER", default_value = "chat-bot")]
    pub cloudinary_folder: String,

    // --- Suggestion Args ---
    /// Maximum number of autocomplete suggestions shown.
    #[arg(long, env = "MAX_SUGGESTIONS", default_value = "5")]
    pub max_suggestions: usize,

    /// Minimum input length before suggestions appear.
    #[arg(long, env = "SUGGESTION_MIN_LENGTH", default_value = "2")]
    pub suggestion_min_length: usize,

    // --- General App Args ---
    /// Enable debug logging/output.
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
