/// Resolve the format of files and exploded publications.
///
/// ```text
/// cargo run --example sniff -- book.epub comic.cbz exploded-book/
/// RUST_LOG=longan=debug cargo run --example sniff -- --media-type application/pdf file
/// ```
///
/// ZIP archives are resolved twice: first from their bytes, then from
/// their entries, so package formats (EPUB, comics, audiobooks) are found.
use std::path::{Path, PathBuf};

use clap::Parser;
use longan::{
    Blob, Container, DefaultFormatSniffer, DirectoryContainer, Format, FormatHints,
    Specification, ZipContainer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sniff")]
#[command(about = "Resolve the format of publication assets")]
struct Cli {
    /// Files or directories to resolve
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Declared media type, added to the hints of every path
    #[arg(short, long)]
    media_type: Option<String>,

    /// Print the encryption map of protected EPUB packages
    #[arg(long)]
    encryption: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let sniffer = DefaultFormatSniffer::new();
    for path in &cli.paths {
        let mut hints = FormatHints::from_path(path);
        if let Some(media_type) = &cli.media_type {
            hints = hints.with_media_type(media_type);
        }

        match resolve(&sniffer, &hints, path, cli.encryption).await {
            Ok(Some(format)) => println!("{}: {}", path.display(), describe(&format)),
            Ok(None) => println!("{}: unknown", path.display()),
            Err(e) => eprintln!("{}: {}", path.display(), e),
        }
    }
    Ok(())
}

async fn resolve(
    sniffer: &DefaultFormatSniffer,
    hints: &FormatHints,
    path: &Path,
    show_encryption: bool,
) -> longan::Result<Option<Format>> {
    if path.is_dir() {
        let container = DirectoryContainer::open(path).await?;
        return resolve_package(sniffer, hints, &container, show_encryption).await;
    }

    let blob = Blob::from_path(path);
    let Some(format) = sniffer.resolve_blob(hints, &blob).await? else {
        return Ok(None);
    };
    if !format.conforms_to(Specification::Zip) {
        return Ok(Some(format));
    }

    let container = ZipContainer::open(path).await?;
    let format = sniffer.refine(format, None, Some(&container)).await?;
    if show_encryption {
        print_encryption(sniffer, hints, &container).await?;
    }
    Ok(Some(format))
}

async fn resolve_package(
    sniffer: &DefaultFormatSniffer,
    hints: &FormatHints,
    container: &dyn Container,
    show_encryption: bool,
) -> longan::Result<Option<Format>> {
    if show_encryption {
        print_encryption(sniffer, hints, container).await?;
    }
    sniffer.resolve_container(hints, container).await
}

async fn print_encryption(
    sniffer: &DefaultFormatSniffer,
    hints: &FormatHints,
    container: &dyn Container,
) -> longan::Result<()> {
    let Some(resolution) = sniffer
        .resolve_container_with_encryption(hints, container)
        .await?
    else {
        return Ok(());
    };
    for (path, encryption) in resolution.encryption.iter().flatten() {
        println!(
            "  {} [{}] scheme={} compression={}",
            path,
            encryption.algorithm,
            encryption.scheme.as_deref().unwrap_or("-"),
            encryption.compression.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn describe(format: &Format) -> String {
    let specifications: Vec<&str> = format
        .specifications()
        .iter()
        .map(Specification::as_str)
        .collect();
    format!(
        "{} (.{}) [{}]",
        format.media_type(),
        format.file_extension(),
        specifications.join(", ")
    )
}
