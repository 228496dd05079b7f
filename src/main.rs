use std::path::PathBuf;

use clap::Parser;
use time::OffsetDateTime;
use uuid::Uuid;

use facemosaic::{
    ArtifactKeying, ArtifactPipeline, FsObjectStore, MosaicError, MosaicStyle,
    PreferenceRepository, RetryPolicy, SidecarDetector, SqlitePreferenceStore, ensure_user,
};

#[derive(Parser)]
#[command(name = "facemosaic")]
#[command(about = "Blur or pixelate detected faces in a photograph")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON file with detected face boxes
    /// (array of {left, top, width, height} fractions)
    #[arg(long, value_name = "FILE")]
    faces: PathBuf,

    /// Root directory of the artifact store
    #[arg(long, value_name = "DIR", default_value = "mosaic-out")]
    store_root: PathBuf,

    /// Base address used when printing artifact locations
    #[arg(long, default_value = "file://mosaic-out")]
    base_address: String,

    /// User identifier for preference lookup and artifact keying
    #[arg(long, default_value = "local")]
    user: String,

    /// Display name recorded on first contact
    #[arg(long, default_value = "Local User")]
    display_name: String,

    /// Select and remember a mosaic style before processing
    /// (GaussianBlur_L, GaussianBlur_S, Tile_L, Tile_S)
    #[arg(long, value_name = "STYLE")]
    style: Option<MosaicStyle>,

    /// SQLite file holding user preferences (in-memory if omitted)
    #[arg(long, value_name = "FILE")]
    prefs_db: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let image_bytes = tokio::fs::read(&args.image_path).await?;

    let prefs = match &args.prefs_db {
        Some(path) => SqlitePreferenceStore::open(path).await?,
        None => SqlitePreferenceStore::open_in_memory().await?,
    };

    let retry = RetryPolicy::default();
    let user = ensure_user(&prefs, &retry, &args.user, &args.display_name, None).await?;

    // An explicit style acts like the user picking one from the menu:
    // it is remembered before this image is processed.
    let style = match args.style {
        Some(style) => {
            retry
                .run(|| prefs.update_style(&args.user, style))
                .await
                .map_err(|cause| MosaicError::Preference {
                    attempts: retry.max_attempts,
                    cause,
                })?;
            if args.verbose {
                println!("Selected {}", style.label());
            }
            style
        }
        None => user.style(),
    };

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let message_id = Uuid::new_v4().simple().to_string();
    let keying = ArtifactKeying::new("local", args.user.as_str(), message_id, now)?;

    let pipeline = ArtifactPipeline::new(
        SidecarDetector::new(&args.faces),
        FsObjectStore::new(&args.store_root, args.base_address.as_str()),
    )
    .with_retry(retry)
    .with_verbose(args.verbose);

    let outcome = pipeline.run(&image_bytes, style, &keying).await?;
    prefs.close().await;

    if !outcome.found {
        println!("No faces found in {}", args.image_path.display());
        return Ok(());
    }

    println!("Applied {}", style.label());
    if let Some(address) = &outcome.work_address {
        println!("Work image:    {}", address);
    }
    if let Some(address) = &outcome.preview_address {
        println!("Preview image: {}", address);
    }

    Ok(())
}
