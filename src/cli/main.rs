use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use shinobooru_meta::{Post, read_post_from_image, write_post_to_image};

#[derive(Parser, Debug)]
#[command(
    name = "shino-meta",
    version,
    about = "Embed and extract booru post metadata in PNG and JPEG files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the embedded post record of each image
    Show {
        /// Image files or directories to inspect
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Output records as JSON, one per line
        #[arg(long)]
        json: bool,
    },
    /// Embed a post record into an image
    Write {
        /// Source image (PNG or JPEG)
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Destination path (default: overwrite the source in place)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Origin board, e.g. yande.re
        #[arg(long)]
        board: String,

        /// Post id on the board
        #[arg(long)]
        id: String,

        #[arg(long, default_value = "")]
        author: String,

        /// Source URL of the post
        #[arg(long, default_value = "")]
        source: String,

        /// Rating letter (s/q/e)
        #[arg(long, default_value = "")]
        rating: String,

        /// Space-separated tag string
        #[arg(long, default_value = "")]
        tags: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Show { paths, json } => show(&paths, json),
        Command::Write {
            image,
            out,
            board,
            id,
            author,
            source,
            rating,
            tags,
        } => {
            let post = Post::new(board, id, author, source, rating, tags);
            let destination = out.unwrap_or_else(|| image.clone());
            write_post_to_image(&post, &image, &destination)?;
            log::info!("Wrote post metadata to {}", destination.display());
            Ok(())
        }
    }
}

fn show(paths: &[PathBuf], json: bool) -> Result<()> {
    let images = collect_images(paths);
    if images.is_empty() {
        anyhow::bail!("No image files found in the specified paths.");
    }

    let mut failures = 0usize;
    for path in &images {
        match read_post_from_image(path) {
            Ok(post) => {
                if json {
                    println!("{}", serde_json::to_string(&post)?);
                } else {
                    println!("{}:", path.display());
                    println!("  board:  {}", post.board);
                    println!("  id:     {}", post.id);
                    println!("  author: {}", post.author);
                    println!("  source: {}", post.source);
                    println!("  rating: {}", post.rating);
                    println!("  tags:   {}", post.tags);
                }
            }
            Err(e) => {
                log::error!("{}: {e}", path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} file(s) could not be read");
    }
    Ok(())
}

/// Collect image files from the given paths. Directories are walked
/// recursively (following symlinks) and filtered by extension; explicitly
/// named files are taken as-is, since the library detects the container
/// from the signature anyway.
fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            images.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && has_image_extension(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            matches!(ext.as_str(), "png" | "jpg" | "jpeg")
        })
        .unwrap_or(false)
}
