use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

mod error;
mod html;
mod logging;
mod media;
mod server;
mod session;
mod state;

use error::{Error, Result};
use session::controller::EditSession;
use session::gate::{PasswordGate, DEFAULT_DIGEST};
use state::data::Gallery;
use state::edit::{ContactField, EditStore, SharedField};
use state::site::Site;

#[derive(Parser)]
#[command(name = "folio", version, about = "Edit a static art portfolio and save the edits into its pages")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SiteArgs {
    /// Directory holding index.html, contact.html and photography.html
    #[arg(long, env = "FOLIO_ROOT", default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site and accept saves on /api/save
    Serve {
        #[command(flatten)]
        site: SiteArgs,

        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,
    },

    /// Fold an edit store file into the pages, exactly as a save would
    Apply {
        #[arg(long)]
        store: PathBuf,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Make one edit-mode change to an edit store file
    Edit(EditArgs),

    /// Re-encode gallery images without EXIF and other metadata
    StripMetadata {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Print the gate digest for a password
    HashPassword {
        password: String,

        #[arg(long, default_value = "")]
        salt: String,
    },
}

#[derive(Args)]
struct EditArgs {
    /// Edit store file; created when missing
    #[arg(long)]
    store: PathBuf,

    #[arg(long, env = "FOLIO_PASSWORD")]
    password: String,

    /// Expected hex digest of salt + password
    #[arg(long, default_value = DEFAULT_DIGEST)]
    digest: String,

    #[arg(long, default_value = "")]
    salt: String,

    #[command(flatten)]
    site: SiteArgs,

    /// Leave edit mode afterwards and save the store into the pages
    #[arg(long)]
    done: bool,

    #[command(subcommand)]
    action: EditAction,
}

#[derive(Subcommand)]
enum EditAction {
    /// Set an image title ("Unnamed" hides it)
    Title { src: String, value: String },
    /// Set an artwork price ("SOLD" styles it as sold)
    Price { src: String, value: String },
    /// Mark an artwork as sold
    Sold {
        src: String,
        /// Clear the sold mark instead
        #[arg(long)]
        clear: bool,
    },
    /// Turn an image a quarter clockwise (display only, never saved)
    Rotate { src: String },
    /// Set a header or footer text shown on every page
    Shared { field: SharedField, value: String },
    /// Set a contact page field
    Contact { field: ContactField, value: String },
    /// Set a gallery heading
    Heading { gallery: Gallery, value: String },
    /// Move an image to a position in its gallery
    Move {
        gallery: Gallery,
        src: String,
        index: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve { site, host, port } => {
            server::app::serve(Site::new(site.root), SocketAddr::new(host, port)).await
        }
        Command::Apply { store, site } => apply(&store, Site::new(site.root)).await,
        Command::Edit(args) => edit(args).await,
        Command::StripMetadata { site } => {
            let report = media::strip::strip_site(site.root).await?;
            println!(
                "Done. Processed {} images ({} artworks, {} photography), {} failed.",
                report.processed(),
                report.artworks.processed,
                report.photography.processed,
                report.errors()
            );
            Ok(())
        }
        Command::HashPassword { password, salt } => {
            println!("{}", PasswordGate::digest_of(&salt, &password));
            Ok(())
        }
    }
}

async fn apply(store_path: &std::path::Path, site: Site) -> Result<()> {
    let json = tokio::fs::read_to_string(store_path)
        .await
        .map_err(|e| Error::io(store_path, e))?;
    let store = EditStore::from_json(&json)?;
    let report = site.apply(&store).await?;
    info!(
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        "applied {}",
        store_path.display()
    );
    Ok(())
}

async fn edit(args: EditArgs) -> Result<()> {
    let gate = PasswordGate::new(args.salt, &args.digest);
    let mut session = EditSession::load(&args.store, gate).await?;
    session.enter(&args.password)?;
    let site = Site::new(args.site.root);

    match args.action {
        EditAction::Title { src, value } => session.commit_title(&src, &value)?,
        EditAction::Price { src, value } => session.commit_price(&src, &value)?,
        EditAction::Sold { src, clear } => session.set_sold(&src, !clear)?,
        EditAction::Rotate { src } => {
            let rotation = session.rotate(&src)?;
            println!("{src}: {rotation}°");
        }
        EditAction::Shared { field, value } => session.commit_shared(field, &value)?,
        EditAction::Contact { field, value } => session.commit_contact(field, &value)?,
        EditAction::Heading { gallery, value } => session.commit_heading(gallery, &value)?,
        EditAction::Move {
            gallery,
            src,
            index,
        } => {
            let current = site.display_order(gallery, session.store()).await?;
            for entry in session.move_entry(gallery, &current, &src, index)? {
                println!("{entry}");
            }
        }
    }

    if args.done {
        let report = site.apply(session.exit()).await?;
        info!(written = report.written.len(), "edit mode closed, pages saved");
    }
    session.persist(&args.store).await
}
