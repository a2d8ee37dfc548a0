use std::path::Path;

use spool_format::article::{sample_articles, Article};
use spool_format::fs::{read_json, write_json};
use spool_format::EncodeOptions;

use crate::cli::{ArticlesArgs, ArticlesCommands};
use crate::error::{Error, Result};

pub fn run(args: ArticlesArgs) -> Result<()> {
    match args.command {
        ArticlesCommands::Write { path, compact } => write(&path, compact),
        ArticlesCommands::Read { path } => read(&path),
    }
}

fn write(path: &Path, compact: bool) -> Result<()> {
    let articles = sample_articles();
    let options = if compact {
        EncodeOptions::compact()
    } else {
        EncodeOptions::pretty("    ")
    };

    write_json(path, &articles, &options).map_err(|source| Error::SaveDocument {
        path: path.to_path_buf(),
        source,
    })?;

    println!("Wrote {} article(s) to {}", articles.len(), path.display());
    Ok(())
}

fn read(path: &Path) -> Result<()> {
    let articles: Vec<Article> = read_json(path).map_err(|source| Error::LoadDocument {
        path: path.to_path_buf(),
        source,
    })?;

    for article in &articles {
        println!("#{} {}", article.id, article.title);
        println!("  by {} <{}>", article.author.name, article.author.email);
        println!("  {}", article.content);
        if !article.recommends.is_empty() {
            println!("  recommended by {}", article.recommends.join(", "));
        }
        for comment in &article.comments {
            println!(
                "  comment #{} from {}: {}",
                comment.id, comment.author.name, comment.content
            );
        }
    }

    tracing::debug!(count = articles.len(), "read articles");
    Ok(())
}
