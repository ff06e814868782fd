mod image;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sketch_core::infrastructure::config::AppConfig;
use sketch_core::infrastructure::logging::init_logging;
use sketch_core::{
    DomainError, FileSketchStore, Sketch, SketchDraft, SketchId, SketchRepository, SortKey,
};
use tracing::debug;

use crate::image::encode_image;

#[derive(Parser, Debug)]
#[clap(name = "sketch", about = "Local sketch gallery")]
struct Cli {
    /// Gallery file; overrides SKETCH_STORE_PATH.
    #[clap(short, long)]
    store: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Create {
        #[clap(long)]
        title: String,
        #[clap(long)]
        description: String,
        /// Comma-separated, e.g. "animal, cute".
        #[clap(long)]
        tags: String,
        #[clap(long)]
        image: PathBuf,
    },
    /// Omitted fields keep their stored value.
    Update {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        tags: Option<String>,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
        /// Deleting cannot be undone.
        #[clap(long)]
        yes: bool,
    },
    Like {
        id: String,
    },
    Comment {
        id: String,
        text: String,
    },
    Show {
        id: String,
    },
    List {
        /// Case-insensitive tag substring.
        #[clap(long, default_value = "")]
        tag: String,
        /// latest | likes | alphabetical
        #[clap(long, default_value = "latest")]
        sort: String,
    },
    Favorites,
    Tags,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = args.store.clone() {
        config.store_path = path;
    }
    init_logging(config.log_json);
    debug!(store = %config.store_path.display(), "using gallery file");

    let mut repo = SketchRepository::open(config.open_store());

    match run(args.command, &mut repo) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, repo: &mut SketchRepository<FileSketchStore>) -> anyhow::Result<()> {
    match command {
        Command::Create {
            title,
            description,
            tags,
            image,
        } => {
            let draft = SketchDraft {
                title,
                description,
                tags_raw: tags,
                image: encode_image(&image)?,
            };
            let sketch = repo.create(&draft)?;
            println!("Sketch created! ID: {}", sketch.id);
        }
        Command::Update {
            id,
            title,
            description,
            tags,
            image,
        } => {
            let id = SketchId::from(id);
            let existing = repo
                .get(&id)
                .ok_or_else(|| DomainError::SketchNotFound(id.clone()))?;
            let mut draft = SketchDraft::from(existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(tags) = tags {
                draft.tags_raw = tags;
            }
            if let Some(path) = image {
                draft.image = encode_image(&path)?;
            }
            let sketch = repo.update(&id, &draft)?;
            println!("Sketch updated: {}", sketch);
        }
        Command::Delete { id, yes } => {
            let id = SketchId::from(id);
            if !yes {
                let sketch = repo
                    .get(&id)
                    .ok_or_else(|| DomainError::SketchNotFound(id.clone()))?;
                println!("Delete \"{}\"? Re-run with --yes to confirm.", sketch.title);
                return Ok(());
            }
            let removed = repo.delete(&id)?;
            println!("Sketch \"{}\" deleted!", removed.title);
        }
        Command::Like { id } => {
            let likes = repo.like(&SketchId::from(id))?;
            println!("Liked! {} like(s)", likes);
        }
        Command::Comment { id, text } => {
            let comments = repo.add_comment(&SketchId::from(id), &text)?;
            println!("Comment added ({} total)", comments.len());
        }
        Command::Show { id } => {
            let id = SketchId::from(id);
            let sketch = repo
                .get(&id)
                .ok_or_else(|| DomainError::SketchNotFound(id.clone()))?;
            print_detail(sketch);
        }
        Command::List { tag, sort } => {
            let sketches = repo.list_filtered(&tag, SortKey::parse(&sort));
            print_list(&sketches);
        }
        Command::Favorites => print_list(&repo.favorites()),
        Command::Tags => {
            for tag in repo.distinct_tags() {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}

fn print_list(sketches: &[&Sketch]) {
    if sketches.is_empty() {
        println!("No sketches yet.");
        return;
    }
    println!("Sketches ({})", sketches.len());
    for sketch in sketches {
        println!(
            "- [{}] {} ({} like(s), {}) #{}",
            sketch.id,
            sketch.title,
            sketch.likes,
            sketch.created_at.format("%Y-%m-%d %H:%M"),
            sketch.tags.join(" #")
        );
    }
}

fn print_detail(sketch: &Sketch) {
    println!("{}", sketch.title);
    println!("  id:       {}", sketch.id);
    println!("  created:  {}", sketch.created_at.format("%Y-%m-%d %H:%M"));
    println!("  likes:    {}", sketch.likes);
    println!("  tags:     {}", sketch.tags_raw());
    println!("  image:    {} bytes", sketch.image.decoded_len());
    println!();
    println!("{}", sketch.description);
    if !sketch.comments.is_empty() {
        println!();
        for comment in &sketch.comments {
            println!(
                "  {} ({}): {}",
                comment.user,
                comment.date.format("%Y-%m-%d %H:%M"),
                comment.text
            );
        }
    }
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::Validation(errors)) => {
            eprintln!("Please fix the following:");
            for field_error in errors {
                eprintln!("  {}: {}", field_error.field, field_error.reason);
            }
        }
        Some(DomainError::NotPersisted { source }) => {
            eprintln!("warning: the change was applied but could not be saved: {source}");
        }
        _ => eprintln!("error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_command() {
        let cli = Cli::try_parse_from([
            "sketch",
            "--store",
            "/tmp/g.json",
            "create",
            "--title",
            "Cat",
            "--description",
            "A cute cat",
            "--tags",
            "animal, cute",
            "--image",
            "cat.png",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("/tmp/g.json")));
        assert!(matches!(cli.command, Command::Create { ref tags, .. } if tags == "animal, cute"));
    }

    #[test]
    fn list_defaults_to_latest_without_filter() {
        let cli = Cli::try_parse_from(["sketch", "list"]).unwrap();
        match cli.command {
            Command::List { tag, sort } => {
                assert_eq!(tag, "");
                assert_eq!(SortKey::parse(&sort), SortKey::Latest);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn delete_without_confirmation_keeps_the_sketch() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cat.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
        let mut repo = SketchRepository::open(FileSketchStore::new(dir.path().join("g.json")));

        run(
            Command::Create {
                title: "Cat".into(),
                description: "A cute cat".into(),
                tags: "animal".into(),
                image,
            },
            &mut repo,
        )
        .unwrap();
        let id = repo.sketches()[0].id.to_string();

        run(Command::Delete { id: id.clone(), yes: false }, &mut repo).unwrap();
        assert_eq!(repo.len(), 1);

        run(Command::Delete { id, yes: true }, &mut repo).unwrap();
        assert!(repo.is_empty());
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cat.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
        let mut repo = SketchRepository::open(FileSketchStore::new(dir.path().join("g.json")));
        run(
            Command::Create {
                title: "Cat".into(),
                description: "A cute cat".into(),
                tags: "animal, cute".into(),
                image,
            },
            &mut repo,
        )
        .unwrap();
        let before = repo.sketches()[0].clone();

        run(
            Command::Update {
                id: before.id.to_string(),
                title: Some("Tabby".into()),
                description: None,
                tags: None,
                image: None,
            },
            &mut repo,
        )
        .unwrap();

        let after = &repo.sketches()[0];
        assert_eq!(after.title, "Tabby");
        assert_eq!(after.description, before.description);
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.image, before.image);
    }

    #[test]
    fn validation_failures_surface_as_domain_errors() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cat.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();
        let mut repo = SketchRepository::open(FileSketchStore::new(dir.path().join("g.json")));

        let err = run(
            Command::Create {
                title: "A".into(),
                description: "A cute cat".into(),
                tags: "animal".into(),
                image,
            },
            &mut repo,
        )
        .unwrap_err();

        let domain = err.downcast_ref::<DomainError>().unwrap();
        assert!(domain.validation_errors().is_some());
        assert!(repo.is_empty());
    }
}
