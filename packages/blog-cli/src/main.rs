// Command-line authoring front-end for the Inkpost blog.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appwrite_client::AppwriteClient;
use blog_core::{BlogKernel, ImageUpload, PostDraft, PostId, PostStatus, SlugSync};

mod config;
use config::Config;

#[derive(Parser)]
#[command(name = "blog", about = "Author blog posts against an Appwrite project")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post
    Create {
        #[arg(long)]
        title: String,
        /// Path to the post body (rich text)
        #[arg(long)]
        content: PathBuf,
        /// Featured image file (required for new posts)
        #[arg(long)]
        image: PathBuf,
        /// Override the slug derived from the title
        #[arg(long)]
        slug: Option<String>,
        /// "active" or "inactive"
        #[arg(long, default_value = "active")]
        status: String,
    },
    /// Update an existing post
    Update {
        /// Identity of the post to update
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Path to a replacement post body
        #[arg(long)]
        content: Option<PathBuf>,
        /// Replacement featured image; the previous one is released
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        slug: Option<String>,
        /// "active" or "inactive"
        #[arg(long)]
        status: Option<String>,
    },
    /// Show a stored post
    Show {
        /// Identity of the post to show
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,blog_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(endpoint = %config.endpoint, "Configuration loaded");

    let mut client = AppwriteClient::new(
        config.endpoint.clone(),
        config.project_id.clone(),
        config.api_key.clone(),
    );
    if let Some(jwt) = &config.jwt {
        client = client.with_jwt(jwt.clone());
    }
    let kernel = BlogKernel::appwrite(Arc::new(client), config.targets());

    match cli.command {
        Commands::Create {
            title,
            content,
            image,
            slug,
            status,
        } => create(&kernel, title, &content, &image, slug, &status).await,
        Commands::Update {
            id,
            title,
            content,
            image,
            slug,
            status,
        } => update(&kernel, &id, title, content, image, slug, status).await,
        Commands::Show { id } => show(&kernel, &id).await,
    }
}

async fn create(
    kernel: &BlogKernel,
    title: String,
    content: &Path,
    image: &Path,
    slug: Option<String>,
    status: &str,
) -> Result<()> {
    let content = fs::read_to_string(content)
        .with_context(|| format!("Failed to read content from {}", content.display()))?;
    let status: PostStatus = status.parse().map_err(|e: String| anyhow!(e))?;

    let mut sync = SlugSync::new("");
    sync.on_title_change(&title);
    if let Some(slug) = &slug {
        sync.on_slug_edit(slug);
    }

    let draft = PostDraft {
        title,
        slug: sync.slug().to_string(),
        content,
        status,
        image: Some(read_image(image)?),
    };

    let owner = kernel
        .session
        .current_user()
        .await
        .context("Failed to resolve the authenticated user (is APPWRITE_JWT set?)")?;

    let workflow = kernel.workflow();
    let id = workflow.submit(draft, None, &owner).await?;
    println!("{} post {}", "Created".bright_green().bold(), id);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn update(
    kernel: &BlogKernel,
    id: &str,
    title: Option<String>,
    content: Option<PathBuf>,
    image: Option<PathBuf>,
    slug: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let post_id = PostId::new(id);
    let existing = kernel
        .documents
        .get(&post_id)
        .await?
        .with_context(|| format!("No post with identity {post_id}"))?;

    // Title changes re-derive the slug; an explicit --slug wins for this
    // submission.
    let mut sync = SlugSync::new(&existing.slug);
    if let Some(title) = &title {
        sync.on_title_change(title);
    }
    if let Some(slug) = &slug {
        sync.on_slug_edit(slug);
    }

    let content = match content {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read content from {}", path.display()))?,
        None => existing.content.clone(),
    };
    let status = match status {
        Some(s) => s.parse().map_err(|e: String| anyhow!(e))?,
        None => existing.status,
    };
    let image = image.as_deref().map(read_image).transpose()?;

    let draft = PostDraft {
        title: title.unwrap_or_else(|| existing.title.clone()),
        slug: sync.slug().to_string(),
        content,
        status,
        image,
    };

    let workflow = kernel.workflow();
    let id = workflow
        .submit(draft, Some(&existing), &existing.owner_id)
        .await?;
    println!("{} post {}", "Updated".bright_green().bold(), id);
    Ok(())
}

async fn show(kernel: &BlogKernel, id: &str) -> Result<()> {
    let post_id = PostId::new(id);
    let post = kernel
        .documents
        .get(&post_id)
        .await?
        .with_context(|| format!("No post with identity {post_id}"))?;

    println!("{}  ({})", post.title.bold(), post.id);
    println!("slug:   {}", post.slug);
    println!("status: {}", post.status);
    println!("owner:  {}", post.owner_id);
    if let Some(image) = &post.featured_image_id {
        println!("image:  {}", kernel.files.preview_url(image));
    }
    println!();
    println!("{}", post.content);
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image from {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageUpload { file_name, bytes })
}
