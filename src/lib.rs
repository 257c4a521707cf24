pub mod api;
pub mod auth;
pub mod cli;
pub mod models;
pub mod repl;
pub mod session;
pub mod store;
pub mod suggest;
pub mod upload;
pub mod validate;

use cli::Args;
use log::info;
use std::error::Error;
use std::sync::Arc;

use auth::AuthContext;
use repl::Repl;
use store::create_credential_store;
use upload::{ CloudinaryHost, UploadConfig, UploadCoordinator };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Chat Service: {}", args.api_url);
    info!("Credential Store: {}", args.credential_store);
    info!("Media Host Configured: {}", !args.cloudinary_cloud_name.is_empty());
    info!("Page Size: {}", args.page_size);
    info!("-------------------------");

    let store = create_credential_store(&args)?;
    let auth = Arc::new(AuthContext::new(store));
    if auth.restore()? {
        info!("Previous session restored");
    }

    let api = api::new_client(&args.api_url, Arc::clone(&auth))?;

    let uploads = UploadCoordinator::new(
        Arc::new(
            CloudinaryHost::new(UploadConfig {
                cloud_name: args.cloudinary_cloud_name.clone(),
                upload_preset: args.cloudinary_upload_preset.clone(),
                folder: args.cloudinary_folder.clone(),
                ..UploadConfig::default()
            })
        )
    );

    let mut repl = Repl::new(args, api, auth, uploads);
    repl.run().await
}
